//! Script opcode constants.
//!
//! Defines the subset of script opcodes used by the FVM SDK: push data
//! operations, the P2PKH opcodes, OP_RETURN for data outputs, and the
//! contract execution opcodes OP_CREATE and OP_CALL that mark outputs
//! carrying EVM bytecode or call data.

/// Push an empty array onto the stack.
pub const OP_0: u8 = 0x00;
/// Alias for OP_0.
pub const OP_FALSE: u8 = 0x00;
/// Smallest direct data push (1 byte).
pub const OP_DATA_1: u8 = 0x01;
/// Direct push of 20 bytes (a public key hash).
pub const OP_DATA_20: u8 = 0x14;
/// Largest direct data push (75 bytes).
pub const OP_DATA_75: u8 = 0x4b;
/// The next byte holds the push length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// The next 2 bytes (LE) hold the push length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// The next 4 bytes (LE) hold the push length.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number 1 onto the stack.
pub const OP_1: u8 = 0x51;
/// Push the number 16 onto the stack.
pub const OP_16: u8 = 0x60;
/// Mark the output as unspendable; the remainder of the script is data.
pub const OP_RETURN: u8 = 0x6a;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Check the top two stack items for equality.
pub const OP_EQUAL: u8 = 0x87;
/// OP_EQUAL followed by OP_VERIFY.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// Hash the top stack item with RIPEMD160(SHA256(x)).
pub const OP_HASH160: u8 = 0xa9;
/// Verify an ECDSA signature against a public key.
pub const OP_CHECKSIG: u8 = 0xac;
/// Create a smart contract from the preceding bytecode push.
pub const OP_CREATE: u8 = 0xc1;
/// Call a smart contract at the preceding address push.
pub const OP_CALL: u8 = 0xc2;

/// Map an opcode byte to its canonical name.
///
/// Push data opcodes in the direct range (0x01-0x4b) have no individual
/// names and render as "OP_DATA_n".
///
/// # Arguments
/// * `op` - The opcode byte.
///
/// # Returns
/// The canonical opcode name, or "OP_UNKNOWN" for bytes outside the
/// supported set.
pub fn opcode_to_string(op: u8) -> String {
    match op {
        OP_0 => "OP_FALSE".to_string(),
        OP_PUSHDATA1 => "OP_PUSHDATA1".to_string(),
        OP_PUSHDATA2 => "OP_PUSHDATA2".to_string(),
        OP_PUSHDATA4 => "OP_PUSHDATA4".to_string(),
        OP_RETURN => "OP_RETURN".to_string(),
        OP_DUP => "OP_DUP".to_string(),
        OP_EQUAL => "OP_EQUAL".to_string(),
        OP_EQUALVERIFY => "OP_EQUALVERIFY".to_string(),
        OP_HASH160 => "OP_HASH160".to_string(),
        OP_CHECKSIG => "OP_CHECKSIG".to_string(),
        OP_CREATE => "OP_CREATE".to_string(),
        OP_CALL => "OP_CALL".to_string(),
        _ if (OP_1..=OP_16).contains(&op) => format!("OP_{}", op - OP_1 + 1),
        _ if (OP_DATA_1..=OP_DATA_75).contains(&op) => format!("OP_DATA_{}", op),
        _ => "OP_UNKNOWN".to_string(),
    }
}

/// Map a canonical opcode name back to its byte value.
///
/// # Arguments
/// * `name` - The opcode name (e.g. "OP_DUP").
///
/// # Returns
/// `Some(opcode)` for recognized names, otherwise `None`.
pub fn string_to_opcode(name: &str) -> Option<u8> {
    match name {
        "OP_0" | "OP_FALSE" => Some(OP_0),
        "OP_PUSHDATA1" => Some(OP_PUSHDATA1),
        "OP_PUSHDATA2" => Some(OP_PUSHDATA2),
        "OP_PUSHDATA4" => Some(OP_PUSHDATA4),
        "OP_RETURN" => Some(OP_RETURN),
        "OP_DUP" => Some(OP_DUP),
        "OP_EQUAL" => Some(OP_EQUAL),
        "OP_EQUALVERIFY" => Some(OP_EQUALVERIFY),
        "OP_HASH160" => Some(OP_HASH160),
        "OP_CHECKSIG" => Some(OP_CHECKSIG),
        "OP_CREATE" => Some(OP_CREATE),
        "OP_CALL" => Some(OP_CALL),
        _ => {
            // OP_1 .. OP_16
            let n: u8 = name.strip_prefix("OP_")?.parse().ok()?;
            if (1..=16).contains(&n) {
                Some(OP_1 + n - 1)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_names_roundtrip() {
        for op in [
            OP_0, OP_RETURN, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_HASH160, OP_CHECKSIG,
            OP_CREATE, OP_CALL,
        ] {
            let name = opcode_to_string(op);
            assert_eq!(string_to_opcode(&name), Some(op), "roundtrip for {}", name);
        }
    }

    #[test]
    fn test_small_int_names() {
        assert_eq!(opcode_to_string(OP_1), "OP_1");
        assert_eq!(opcode_to_string(OP_16), "OP_16");
        assert_eq!(string_to_opcode("OP_7"), Some(OP_1 + 6));
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(opcode_to_string(0xfe), "OP_UNKNOWN");
        assert_eq!(string_to_opcode("OP_NOPE"), None);
    }
}
