//! Signature hash computation for transaction signing.
//!
//! Computes the hash that is signed by ECDSA to authorize spending a
//! transaction input. The FVM chain uses the original (legacy) sighash
//! algorithm: the transaction is serialized with every input's unlocking
//! script blanked except the one being signed, which carries the locking
//! script of the output it spends, followed by the 4-byte sighash type.

use fvm_primitives::hash::sha256d;
use fvm_primitives::util::{ByteWriter, VarInt};

use crate::transaction::Transaction;
use crate::TransactionError;

/// Sign all inputs and all outputs (the default and only mode used by
/// the transaction builder).
pub const SIGHASH_ALL: u32 = 0x01;

/// Compute the legacy signature hash for a given input.
///
/// # Arguments
/// * `tx`                 - The transaction being signed.
/// * `input_index`        - Index of the input being signed.
/// * `prev_output_script` - The locking script of the output being spent.
/// * `sighash_type`       - The sighash flags (`SIGHASH_ALL`).
///
/// # Returns
/// A 32-byte double-SHA256 hash to be signed by ECDSA.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    let preimage = calc_preimage(tx, input_index, prev_output_script, sighash_type)?;
    Ok(sha256d(&preimage))
}

/// Compute the pre-image bytes for the legacy sighash before
/// double-hashing.
///
/// The preimage is the transaction serialized with modified input
/// scripts:
/// 1. nVersion (4 bytes LE)
/// 2. input count (VarInt), then for each input: outpoint (32+4 bytes),
///    script (empty for all inputs except the one being signed, which
///    carries `prev_output_script`), and sequence (4 bytes LE)
/// 3. output count (VarInt) and all serialized outputs
/// 4. nLocktime (4 bytes LE)
/// 5. sighashType (4 bytes LE)
///
/// # Arguments
/// * `tx`                 - The transaction being signed.
/// * `input_index`        - Index of the input being signed.
/// * `prev_output_script` - The locking script of the output being spent.
/// * `sighash_type`       - The sighash flags.
///
/// # Returns
/// The raw preimage bytes (not yet hashed).
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }

    let mut writer = ByteWriter::with_capacity(256);

    // Version
    writer.write_u32_le(tx.version);

    // Inputs with blanked scripts; the signed input carries the
    // locking script of the output it spends.
    writer.write_varint(VarInt::from(tx.inputs.len()));
    for (i, input) in tx.inputs.iter().enumerate() {
        writer.write_bytes(&input.source_txid);
        writer.write_u32_le(input.source_index);
        if i == input_index {
            writer.write_varint(VarInt::from(prev_output_script.len()));
            writer.write_bytes(prev_output_script);
        } else {
            writer.write_varint(VarInt::from(0u64));
        }
        writer.write_u32_le(input.sequence_number);
    }

    // Outputs
    writer.write_varint(VarInt::from(tx.outputs.len()));
    for output in &tx.outputs {
        writer.write_bytes(&output.to_bytes());
    }

    // nLocktime
    writer.write_u32_le(tx.lock_time);

    // Sighash type
    writer.write_u32_le(sighash_type);

    Ok(writer.into_bytes())
}
