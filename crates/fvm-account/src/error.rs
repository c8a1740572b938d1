/// Error types for account construction and export.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The mnemonic failed wordlist or checksum validation. The message
    /// is part of the public contract.
    #[error("Invalid mnemonic")]
    InvalidMnemonic,

    /// A mnemonic export was requested from an account that has none.
    /// The message is part of the public contract.
    #[error("No mnemonic to export")]
    NoMnemonicToExport,

    /// The derivation path string could not be parsed.
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    /// Hierarchical key derivation produced an invalid scalar.
    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    /// A WIF-encoded key carries a prefix for a different network.
    #[error("WIF prefix {got:#04x} does not match network prefix {expected:#04x}")]
    WifNetworkMismatch {
        /// The prefix byte found in the WIF encoding.
        got: u8,
        /// The prefix byte required by the account's network.
        expected: u8,
    },

    /// The supplied secret is not a valid key in any accepted encoding.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] fvm_primitives::PrimitivesError),
}
