//! Standard-policy rules applied at strict serialization time.
//!
//! Mirrors the node's relay policy on the client side: outputs below the
//! dust threshold and fees far above the estimate are almost certainly
//! mistakes, so the strict serialization path rejects them. Both checks
//! can be bypassed with the caller's explicit unsafe flag.
//!
//! This module also provides the fee estimation used by the builder:
//! a size-based component at a per-kilobyte rate, plus the full gas
//! budget of every contract output (the node collects contract gas
//! through the transaction fee).

use crate::template::contract::ContractScript;
use crate::template::p2pkh::UNLOCKING_SCRIPT_ESTIMATE;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Minimum economically spendable output value in smallest units.
pub const DUST_AMOUNT: u64 = 546;

/// Default fee rate in smallest units per 1000 bytes.
pub const DEFAULT_FEE_PER_KB: u64 = 100_000;

/// Strict serialization rejects fees above this multiple of the
/// estimated fee.
pub const FEE_SECURITY_MARGIN: u64 = 150;

/// Estimate the final serialized size of a transaction in bytes.
///
/// Unsigned inputs are counted as if they carried a standard P2PKH
/// unlocking script.
///
/// # Arguments
/// * `tx` - The transaction to measure.
///
/// # Returns
/// The estimated byte length after signing.
pub fn estimate_size(tx: &Transaction) -> usize {
    let unsigned = tx
        .inputs
        .iter()
        .filter(|i| i.unlocking_script.is_none())
        .count();
    tx.size() + unsigned * UNLOCKING_SCRIPT_ESTIMATE
}

/// Sum the gas budgets of every contract output in the transaction.
///
/// Outputs whose scripts do not decode as contract scripts contribute
/// nothing.
///
/// # Arguments
/// * `tx` - The transaction to scan.
///
/// # Returns
/// The total `gas_price * gas_limit` across contract outputs.
pub fn total_gas(tx: &Transaction) -> u64 {
    tx.outputs
        .iter()
        .filter(|o| o.locking_script.is_contract())
        .filter_map(|o| ContractScript::from_script(&o.locking_script).ok())
        .map(|c| c.gas_budget())
        .fold(0u64, |acc, g| acc.saturating_add(g))
}

/// Estimate the fee for a transaction at the given rate.
///
/// The estimate is the size-based component (rounded up per byte at the
/// per-KB rate) plus the gas budget of every contract output.
///
/// # Arguments
/// * `tx` - The transaction to estimate.
/// * `fee_per_kb` - Fee rate in smallest units per 1000 bytes.
///
/// # Returns
/// The estimated fee in smallest units.
pub fn estimate_fee(tx: &Transaction, fee_per_kb: u64) -> u64 {
    let size = estimate_size(tx) as u64;
    let size_fee = (size * fee_per_kb).div_ceil(1000);
    size_fee.saturating_add(total_gas(tx))
}

/// Run the strict pre-serialization policy checks.
///
/// Two conditions are rejected, in order, each with a fixed message that
/// callers and tests rely on:
/// - a fee above [`FEE_SECURITY_MARGIN`] times the estimate ("Fee is too
///   large"). The fee is `inputs - outputs` and is only checked when
///   every input carries its source value;
/// - an output below [`DUST_AMOUNT`] that is neither a data output nor a
///   contract output ("Dust amount detected in one output").
///
/// # Arguments
/// * `tx` - The transaction about to be serialized.
/// * `fee_per_kb` - The fee rate used for the estimate.
///
/// # Returns
/// `Ok(())` when the transaction passes, or the first violated check.
pub fn pre_serialize_checks(tx: &Transaction, fee_per_kb: u64) -> Result<(), TransactionError> {
    if let Ok(input_total) = tx.total_input_value() {
        let output_total = tx.total_output_value();
        if input_total > output_total {
            let fee = input_total - output_total;
            let ceiling = FEE_SECURITY_MARGIN.saturating_mul(estimate_fee(tx, fee_per_kb));
            if fee > ceiling {
                return Err(TransactionError::FeeTooLarge);
            }
        }
    }

    for output in &tx.outputs {
        if output.value < DUST_AMOUNT
            && !output.locking_script.is_data()
            && !output.locking_script.is_contract()
        {
            return Err(TransactionError::DustOutput);
        }
    }

    Ok(())
}
