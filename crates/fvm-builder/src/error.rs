use crate::builder::Phase;

/// Error types for transaction building.
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    /// The requested gas price exceeds the configured ceiling.
    #[error("gas price {gas_price} exceeds limit {max}")]
    GasPriceExceeded {
        /// The requested gas price.
        gas_price: u64,
        /// The configured maximum.
        max: u64,
    },

    /// The requested gas limit exceeds the configured ceiling.
    #[error("gas limit {gas_limit} exceeds limit {max}")]
    GasLimitExceeded {
        /// The requested gas limit.
        gas_limit: u64,
        /// The configured maximum.
        max: u64,
    },

    /// The product of gas price and gas limit exceeds the budget ceiling.
    #[error("gas budget {budget} exceeds limit {max}")]
    GasBudgetExceeded {
        /// The requested `gas_price * gas_limit`.
        budget: u128,
        /// The configured maximum.
        max: u64,
    },

    /// The available coins cannot fund the required spend plus fee.
    /// The message is part of the public contract.
    #[error("Not enough funds to create transaction")]
    InsufficientFunds,

    /// No signing accounts were supplied to `build`.
    #[error("at least one signing account is required")]
    NoSigners,

    /// The operation is not valid in the builder's current phase.
    #[error("operation not valid in the {0:?} phase")]
    InvalidPhase(Phase),

    /// An underlying script error (bad address, bad hex).
    #[error("script error: {0}")]
    Script(#[from] fvm_script::ScriptError),

    /// An underlying transaction codec error.
    #[error(transparent)]
    Transaction(#[from] fvm_transaction::TransactionError),
}
