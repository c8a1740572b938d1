//! Transaction output with value and locking script.
//!
//! Defines the spending conditions for the output's value. Provides
//! binary serialization/deserialization following the standard wire
//! format.

use fvm_primitives::util::{ByteReader, ByteWriter, VarInt};
use fvm_script::Script;

use crate::TransactionError;

/// A single output in a transaction.
///
/// Each output specifies a `value` in the smallest unit and a
/// `locking_script` (scriptPubKey) that defines the conditions under
/// which the funds may be spent. Contract outputs carry a zero value and
/// a contract script. The `change` flag is a local-only annotation used
/// during fee handling to identify the output that received the leftover
/// input value; it is not serialized.
///
/// # Wire format
///
/// | Field          | Size           |
/// |----------------|----------------|
/// | value          | 8 bytes (LE)   |
/// | script length  | VarInt         |
/// | locking_script | variable       |
#[derive(Clone, Debug)]
pub struct TransactionOutput {
    /// The number of smallest units locked by this output.
    pub value: u64,

    /// The locking script (scriptPubKey) that defines spending conditions.
    pub locking_script: Script,

    /// Local-only flag marking this output as a change output.
    /// Not serialized on the wire.
    pub change: bool,
}

impl TransactionOutput {
    /// Create a new `TransactionOutput` with zero value and an empty script.
    ///
    /// # Returns
    /// A default `TransactionOutput`.
    pub fn new() -> Self {
        TransactionOutput {
            value: 0,
            locking_script: Script::new(),
            change: false,
        }
    }

    /// Deserialize a `TransactionOutput` from a `ByteReader`.
    ///
    /// Reads 8-byte LE value, a varint script length, and the script bytes.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded output.
    ///
    /// # Returns
    /// `Ok(TransactionOutput)` on success, or a `TransactionError` if the
    /// data is truncated or malformed.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let value = reader.read_u64_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading value: {}", e))
        })?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading script length: {}", e))
        })?;

        let script_bytes = reader.read_bytes(script_len.value() as usize).map_err(|e| {
            TransactionError::SerializationError(format!("reading locking script: {}", e))
        })?;

        Ok(TransactionOutput {
            value,
            locking_script: Script::from_bytes(script_bytes),
            change: false,
        })
    }

    /// Serialize this `TransactionOutput` into a `ByteWriter`.
    ///
    /// Writes 8-byte LE value, a varint script length, and the script.
    ///
    /// # Arguments
    /// * `writer` - The writer to append serialized bytes to.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.value);
        let script_bytes = self.locking_script.to_bytes();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(script_bytes);
    }

    /// Serialize this output to a byte vector.
    ///
    /// # Returns
    /// A `Vec<u8>` containing the wire-format bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Return the locking script as a hex-encoded string.
    ///
    /// # Returns
    /// A lowercase hex string of the locking script bytes.
    pub fn locking_script_hex(&self) -> String {
        self.locking_script.to_hex()
    }
}

impl Default for TransactionOutput {
    fn default() -> Self {
        Self::new()
    }
}
