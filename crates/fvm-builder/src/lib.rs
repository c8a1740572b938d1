/// FVM SDK - Transaction-construction engine.
///
/// Provides the `TxBuilder`, which assembles a transaction from
/// UTXO-funded inputs and transfer or contract-call outputs, enforces
/// gas safety bounds, performs coin selection against a required spend,
/// designates a change destination, and signs with one or more accounts.

pub mod builder;
pub mod coin;
pub mod safety;
pub mod selection;

mod error;


pub use builder::{Phase, TxBuilder};
pub use coin::Coin;
pub use error::BuilderError;
pub use safety::SafetyParams;
pub use selection::{CoinSelector, FirstFit};
