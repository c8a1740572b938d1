/// FVM SDK - Key-bearing accounts.
///
/// Provides `KeyMaterial` (a private key bound to a network, with both
/// address encodings), the tagged-union `Account` over direct private
/// keys and mnemonic-derived keys, and the BIP-39/BIP-32 hierarchical
/// derivation used by the mnemonic variant.

pub mod key_material;
pub mod derivation;
pub mod account;

mod error;
pub use error::AccountError;
pub use account::Account;
pub use derivation::{DerivationPath, ExtendedKey};
pub use key_material::KeyMaterial;
