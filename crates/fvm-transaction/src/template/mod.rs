//! Script templates for the output types the builder produces.
//!
//! Provides the `UnlockingScriptTemplate` trait with a P2PKH
//! implementation used for signing value-transfer inputs, and the
//! contract script template that encodes gas parameters, call data, and
//! the contract opcode into an output script.

pub mod p2pkh;
pub mod contract;

use fvm_script::Script;

use crate::transaction::Transaction;
use crate::TransactionError;

/// Trait for script templates that produce unlocking scripts.
///
/// Any signing strategy (P2PKH, custom scripts) should implement this
/// trait. The `sign` method receives the full transaction and the input
/// index, computes the appropriate signature hash, signs it, and returns
/// the unlocking script.
pub trait UnlockingScriptTemplate {
    /// Produce an unlocking script for the given input.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - The index of the input to sign.
    ///
    /// # Returns
    /// `Ok(Script)` containing the unlocking script, or an error on
    /// failure.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError>;

    /// Estimate the byte length of the unlocking script.
    ///
    /// Used for fee calculation before the actual signature is computed.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - The index of the input.
    ///
    /// # Returns
    /// The estimated byte length of the unlocking script.
    fn estimate_length(&self, tx: &Transaction, input_index: usize) -> usize;
}
