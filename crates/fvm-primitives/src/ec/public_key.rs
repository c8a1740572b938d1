//! secp256k1 public key.
//!
//! Supports compressed SEC1 serialization, Hash160 computation for
//! address generation, and ECDSA signature verification.

use std::fmt;

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::ec::signature::Signature;
use crate::hash::hash160;
use crate::PrimitivesError;

/// Length of a compressed public key in bytes (prefix + 32 byte x-coordinate).
const COMPRESSED_LEN: usize = 33;

/// A secp256k1 public key for verification and address derivation.
///
/// Wraps a k256 `VerifyingKey` and provides compressed serialization,
/// Hash160 computation, and ECDSA verification.
#[derive(Clone, Debug)]
pub struct PublicKey {
    /// The underlying k256 verifying key.
    inner: VerifyingKey,
}

impl PublicKey {
    /// Create a PublicKey from raw SEC1 encoded bytes.
    ///
    /// Accepts both compressed (33-byte) and uncompressed (65-byte) formats.
    ///
    /// # Arguments
    /// * `bytes` - SEC1-encoded public key bytes.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or an error if the bytes don't represent
    /// a valid point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.is_empty() {
            return Err(PrimitivesError::InvalidPublicKey(
                "pubkey string is empty".to_string(),
            ));
        }
        let vk = VerifyingKey::from_sec1_bytes(bytes)?;
        Ok(PublicKey { inner: vk })
    }

    /// Create a PublicKey from a hex-encoded SEC1 string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of a compressed (66 chars) or uncompressed
    ///   (130 chars) key.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or an error if the hex or point is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the public key in compressed SEC1 format (33 bytes).
    ///
    /// The first byte is 0x02 (even Y) or 0x03 (odd Y), followed by the
    /// 32-byte X coordinate.
    ///
    /// # Returns
    /// A 33-byte array containing the compressed public key.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize the public key as a lowercase hexadecimal string
    /// (compressed format).
    ///
    /// # Returns
    /// A 66-character hex string of the compressed public key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Compute the Hash160 of the compressed public key.
    ///
    /// Hash160 = RIPEMD160(SHA256(compressed_pubkey)).
    ///
    /// # Returns
    /// A 20-byte hash digest.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// Verify an ECDSA signature against a message hash using this public key.
    ///
    /// # Arguments
    /// * `hash` - The message hash that was signed.
    /// * `sig` - The ECDSA signature to verify.
    ///
    /// # Returns
    /// `true` if the signature is valid for this hash and public key.
    pub fn verify(&self, hash: &[u8], sig: &Signature) -> bool {
        sig.verify(hash, self)
    }

    /// Build a PublicKey from a k256 verifying key reference.
    ///
    /// # Arguments
    /// * `vk` - The verifying key to wrap.
    ///
    /// # Returns
    /// A new `PublicKey`.
    pub(crate) fn from_k256_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: *vk }
    }

    /// Access the underlying k256 `VerifyingKey`.
    ///
    /// # Returns
    /// A reference to the inner `VerifyingKey`.
    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl fmt::Display for PublicKey {
    /// Display the public key as its compressed hex encoding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for PublicKey {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::PrivateKey;

    /// Known vector from the reference implementation: private key scalar
    /// to compressed public key.
    #[test]
    fn test_pub_key_from_private() {
        let priv_key = PrivateKey::from_hex(
            "5f2ab36d89d20bdd14d65173208872b52913f37eac19dcd6921c72c80b5ecf2a",
        )
        .unwrap();
        assert_eq!(
            priv_key.pub_key().to_hex(),
            "0266e01a4fddfbbe8f2e65fca56726587794eff69a67102b29c0e765bbdb7aea66"
        );
    }

    #[test]
    fn test_from_hex_roundtrip() {
        let hex_str = "0266e01a4fddfbbe8f2e65fca56726587794eff69a67102b29c0e765bbdb7aea66";
        let pub_key = PublicKey::from_hex(hex_str).unwrap();
        assert_eq!(pub_key.to_hex(), hex_str);
    }

    #[test]
    fn test_from_bytes_invalid() {
        assert!(PublicKey::from_bytes(&[]).is_err());
        assert!(PublicKey::from_bytes(&[0x02; 10]).is_err());
        // x-coordinate not on the curve
        assert!(PublicKey::from_bytes(&[0xff; 33]).is_err());
    }

    #[test]
    fn test_hash160() {
        let pub_key = PublicKey::from_hex(
            "0266e01a4fddfbbe8f2e65fca56726587794eff69a67102b29c0e765bbdb7aea66",
        )
        .unwrap();
        assert_eq!(pub_key.hash160().len(), 20);
    }
}
