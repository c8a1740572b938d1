/// FVM SDK - Message signing and verification.
///
/// Produces and verifies deterministic signatures over arbitrary byte
/// messages using the same key material as the transaction engine. The
/// message is hashed once with SHA-256 (no double-hashing) and signed
/// with RFC6979 deterministic ECDSA; signatures use the 64-byte compact
/// (r||s) encoding.

mod error;
mod message;

pub use error::MessageError;
pub use message::Message;
