//! Elliptic curve cryptography over secp256k1.
//!
//! Provides private keys (with WIF encoding and BIP-32 tweak addition),
//! public keys, and ECDSA signatures with RFC6979 deterministic nonces.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
