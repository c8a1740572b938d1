/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. missing inputs or outputs).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// An error occurred during input signing (e.g. missing source output).
    #[error("signing error: {0}")]
    SigningError(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// An output below the dust threshold was found during strict
    /// serialization. The message is part of the public contract.
    #[error("Dust amount detected in one output")]
    DustOutput,
    /// The transaction fee exceeds the security margin over the estimated
    /// fee. The message is part of the public contract.
    #[error("Fee is too large")]
    FeeTooLarge,
    /// An underlying script error (forwarded from `fvm-script`).
    #[error("script error: {0}")]
    Script(#[from] fvm_script::ScriptError),
    /// An underlying primitives error (forwarded from `fvm-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] fvm_primitives::PrimitivesError),
}
