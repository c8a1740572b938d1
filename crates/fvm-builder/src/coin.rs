//! The unspent-output record consumed by the builder.
//!
//! Coins are produced by an external UTXO index and passed into
//! `TxBuilder::build` as the funding pool; the builder never fetches
//! them itself. The serde derives map the index's JSON response
//! directly onto the struct.

use serde::{Deserialize, Serialize};

/// An unspent transaction output usable as a transaction input.
///
/// Immutable once observed; the builder consumes a given transaction id
/// at most once per transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    /// The Base58Check address holding this output.
    pub address: String,

    /// The transaction id of the output, in display (big-endian) hex.
    pub txid: String,

    /// The index of the output within its transaction.
    pub output_index: u32,

    /// The hex-encoded locking script of the output.
    pub script: String,

    /// The output value in smallest units.
    #[serde(alias = "satoshis")]
    pub value: u64,

    /// The block height the output was confirmed at.
    pub height: u64,
}
