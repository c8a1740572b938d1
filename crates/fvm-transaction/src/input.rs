//! Transaction input referencing a previous output.
//!
//! Contains the source transaction ID, output index, unlocking script,
//! sequence number, and an optional copy of the source output being
//! spent (its value and locking script), which is required for signing
//! and fee computation. Provides binary serialization/deserialization
//! following the standard wire format.

use fvm_primitives::util::{ByteReader, ByteWriter, VarInt};
use fvm_script::Script;

use crate::output::TransactionOutput;
use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative
/// lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single input in a transaction.
///
/// Each input references an output from a previous transaction by its
/// transaction ID (`source_txid`) and output index (`source_index`).
/// The `unlocking_script` (scriptSig) supplies the data required to
/// satisfy the referenced output's locking script; it is `None` until
/// the input is signed and serializes as a zero-length script.
///
/// # Wire format
///
/// | Field            | Size             |
/// |------------------|------------------|
/// | source_txid      | 32 bytes (LE)    |
/// | source_index     | 4 bytes (LE)     |
/// | script length    | VarInt           |
/// | unlocking_script | variable         |
/// | sequence_number  | 4 bytes (LE)     |
#[derive(Clone, Debug)]
pub struct TransactionInput {
    /// The 32-byte transaction ID of the output being spent, in internal
    /// (little-endian) byte order.
    pub source_txid: [u8; 32],

    /// Index of the output within the source transaction.
    pub source_index: u32,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence_number: u32,

    /// The unlocking script (scriptSig) that proves authorization.
    /// `None` when the input has not yet been signed.
    pub unlocking_script: Option<Script>,

    /// Optional copy of the source output being spent (value and locking
    /// script). Required for signing and fee computation; not serialized.
    source_output: Option<TransactionOutput>,
}

impl TransactionInput {
    /// Create a new `TransactionInput` with default values.
    ///
    /// The source txid is zeroed, output index is 0, sequence is
    /// finalized, and no unlocking script or source output is set.
    ///
    /// # Returns
    /// A default `TransactionInput`.
    pub fn new() -> Self {
        TransactionInput {
            source_txid: [0u8; 32],
            source_index: 0,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            unlocking_script: None,
            source_output: None,
        }
    }

    /// Deserialize a `TransactionInput` from a `ByteReader`.
    ///
    /// Reads the standard wire format: 32-byte txid, 4-byte output index,
    /// varint-prefixed unlocking script, and 4-byte sequence number.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded input.
    ///
    /// # Returns
    /// `Ok(TransactionInput)` on success, or a `TransactionError` if the
    /// data is truncated or malformed.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let txid_bytes = reader.read_bytes(32).map_err(|e| {
            TransactionError::SerializationError(format!("reading source txid: {}", e))
        })?;
        let mut source_txid = [0u8; 32];
        source_txid.copy_from_slice(txid_bytes);

        let source_index = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading output index: {}", e))
        })?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading script length: {}", e))
        })?;

        let script_bytes = reader.read_bytes(script_len.value() as usize).map_err(|e| {
            TransactionError::SerializationError(format!("reading unlocking script: {}", e))
        })?;

        let sequence_number = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        let unlocking_script = if script_bytes.is_empty() {
            None
        } else {
            Some(Script::from_bytes(script_bytes))
        };

        Ok(TransactionInput {
            source_txid,
            source_index,
            sequence_number,
            unlocking_script,
            source_output: None,
        })
    }

    /// Serialize this `TransactionInput` into a `ByteWriter`.
    ///
    /// Writes the standard wire format: txid, output index, varint script
    /// length, script bytes, and sequence number.
    ///
    /// # Arguments
    /// * `writer` - The writer to append serialized bytes to.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.source_txid);
        writer.write_u32_le(self.source_index);

        match &self.unlocking_script {
            Some(script) => {
                let script_bytes = script.to_bytes();
                writer.write_varint(VarInt::from(script_bytes.len()));
                writer.write_bytes(script_bytes);
            }
            None => {
                writer.write_varint(VarInt::from(0u64));
            }
        }

        writer.write_u32_le(self.sequence_number);
    }

    /// Set the source output on this input.
    ///
    /// This provides the value and locking script of the output being
    /// spent, without needing the full source transaction.
    ///
    /// # Arguments
    /// * `output` - The source output, or `None` to clear.
    pub fn set_source_output(&mut self, output: Option<TransactionOutput>) {
        self.source_output = output;
    }

    /// Look up the source transaction output, if available.
    ///
    /// # Returns
    /// `Some(&TransactionOutput)` if source info is available, otherwise
    /// `None`.
    pub fn source_output(&self) -> Option<&TransactionOutput> {
        self.source_output.as_ref()
    }

    /// Return the value of the source output, if available.
    ///
    /// # Returns
    /// `Some(value)` if the source output info is available, otherwise
    /// `None`.
    pub fn source_value(&self) -> Option<u64> {
        self.source_output.as_ref().map(|o| o.value)
    }

    /// Return the locking script of the source output, if available.
    ///
    /// # Returns
    /// `Some(&Script)` if the source output info is available, otherwise
    /// `None`.
    pub fn source_script(&self) -> Option<&Script> {
        self.source_output.as_ref().map(|o| &o.locking_script)
    }
}

impl Default for TransactionInput {
    fn default() -> Self {
        Self::new()
    }
}
