//! A byte message to sign or verify.

use fvm_account::Account;
use fvm_primitives::ec::{PublicKey, Signature};
use fvm_primitives::hash::sha256;

use crate::MessageError;

/// An arbitrary byte message with signing and verification over its
/// SHA-256 digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    message: Vec<u8>,
}

impl Message {
    /// Wrap a message for signing or verification.
    ///
    /// # Arguments
    /// * `message` - The message bytes (or anything convertible to them).
    ///
    /// # Returns
    /// A new `Message`.
    pub fn new(message: impl Into<Vec<u8>>) -> Self {
        Message {
            message: message.into(),
        }
    }

    /// The digest that is signed: a single SHA-256 of the message.
    ///
    /// # Returns
    /// The 32-byte digest.
    pub fn hash(&self) -> [u8; 32] {
        sha256(&self.message)
    }

    /// Sign the message digest with the given account's key.
    ///
    /// Signing is deterministic (RFC6979 nonces): the same message and
    /// key always produce the same signature.
    ///
    /// # Arguments
    /// * `account` - The account whose private key signs.
    ///
    /// # Returns
    /// `Ok(Signature)` on success.
    pub fn sign(&self, account: &Account) -> Result<Signature, MessageError> {
        Ok(account.private_key().sign(&self.hash())?)
    }

    /// Verify a signature over the message digest.
    ///
    /// # Arguments
    /// * `signature` - The signature to check.
    /// * `public_key` - The signer's public key.
    ///
    /// # Returns
    /// `true` iff the signature validates against the digest and key.
    pub fn verify(&self, signature: &Signature, public_key: &PublicKey) -> bool {
        signature.verify(&self.hash(), public_key)
    }

    /// The raw message bytes.
    ///
    /// # Returns
    /// A slice of the message.
    pub fn as_bytes(&self) -> &[u8] {
        &self.message
    }
}
