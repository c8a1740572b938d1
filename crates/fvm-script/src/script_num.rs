//! Script number encoding.
//!
//! Numbers embedded in scripts (gas limits and gas prices in contract
//! outputs) are encoded as minimal little-endian byte arrays with a sign
//! bit in the most significant bit of the last byte. Zero encodes as an
//! empty array.

use crate::ScriptError;

/// Encode an integer as a minimal script number.
///
/// The result is little-endian; if the most significant byte would have
/// its high bit set, an extra sign byte is appended so the value is not
/// read back as negative.
///
/// # Arguments
/// * `value` - The (non-negative in practice) value to encode.
///
/// # Returns
/// The minimal script number bytes; empty for zero.
pub fn encode(value: i64) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }

    let is_negative = value < 0;
    let mut abs = value.unsigned_abs();

    let mut result = Vec::new();
    while abs > 0 {
        result.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    // Handle the sign bit.
    let last = result.len() - 1;
    if result[last] & 0x80 != 0 {
        result.push(if is_negative { 0x80 } else { 0x00 });
    } else if is_negative {
        result[last] |= 0x80;
    }

    result
}

/// Decode a minimal script number back to an integer.
///
/// # Arguments
/// * `bytes` - The little-endian script number bytes.
///
/// # Returns
/// `Ok(value)` on success, or an error if the encoding exceeds 8 bytes.
pub fn decode(bytes: &[u8]) -> Result<i64, ScriptError> {
    if bytes.is_empty() {
        return Ok(0);
    }
    if bytes.len() > 8 {
        return Err(ScriptError::InvalidScriptNumber(format!(
            "encoding is {} bytes, max 8",
            bytes.len()
        )));
    }

    let mut value: u64 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        value |= (b as u64) << (8 * i);
    }

    // If the most significant byte has the sign bit set, the number is negative.
    let last = bytes.len() - 1;
    if bytes[last] & 0x80 != 0 {
        let mask = !(0x80u64 << (8 * last));
        value &= mask;
        Ok(-(value as i64))
    } else {
        Ok(value as i64)
    }
}
