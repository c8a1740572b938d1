/// FVM SDK - Cryptographic primitives, hashing, and utilities.
///
/// This crate provides the foundational building blocks for the FVM SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Keccak-256, HMAC)
/// - Chain hash type for transaction identification
/// - Elliptic curve cryptography (secp256k1 keys and signatures)
/// - Variable-length integer encoding and binary readers/writers

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod ec;

mod error;
pub use error::PrimitivesError;
