//! A private key bound to a network.
//!
//! `KeyMaterial` pairs a secp256k1 private key with the network it
//! operates on. The network selects the WIF prefix and the address
//! version byte; everything derived from the pair (public key, both
//! address encodings) is a pure function of it. The network is fixed at
//! construction.

use fvm_primitives::ec::{PrivateKey, PublicKey};
use fvm_script::{Address, Network};

use crate::AccountError;

/// A private key plus the active network selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyMaterial {
    network: Network,
    key: PrivateKey,
}

impl KeyMaterial {
    /// Create key material from an optional secret string.
    ///
    /// When `secret` is `None`, a fresh random key is generated. When
    /// present, the string is parsed as a 64-character hex scalar first
    /// and as a WIF string second; a WIF whose prefix does not match the
    /// network is rejected.
    ///
    /// # Arguments
    /// * `network` - The network this key operates on.
    /// * `secret` - Optional hex or WIF encoding of the private key.
    ///
    /// # Returns
    /// `Ok(KeyMaterial)` on success, or an error if the secret is not a
    /// valid key in either encoding.
    pub fn new(network: Network, secret: Option<&str>) -> Result<Self, AccountError> {
        let key = match secret {
            None => PrivateKey::new(),
            Some(s) => match PrivateKey::from_hex(s) {
                Ok(key) => key,
                Err(hex_err) => {
                    // Fall back to WIF; surface the hex error when the
                    // string is not WIF either.
                    let (key, prefix) =
                        PrivateKey::from_wif(s).map_err(|_| AccountError::InvalidKey(hex_err))?;
                    if prefix != network.wif_prefix() {
                        return Err(AccountError::WifNetworkMismatch {
                            got: prefix,
                            expected: network.wif_prefix(),
                        });
                    }
                    key
                }
            },
        };

        Ok(KeyMaterial { network, key })
    }

    /// Create key material from an already-parsed private key.
    ///
    /// # Arguments
    /// * `network` - The network this key operates on.
    /// * `key` - The private key.
    ///
    /// # Returns
    /// A new `KeyMaterial`.
    pub fn from_private_key(network: Network, key: PrivateKey) -> Self {
        KeyMaterial { network, key }
    }

    /// The network this key material is bound to.
    ///
    /// # Returns
    /// The network selector.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Export the private key as a lowercase hex string.
    ///
    /// # Returns
    /// A 64-character hex string of the 32-byte scalar.
    pub fn export_private_key(&self) -> String {
        self.key.to_hex()
    }

    /// Export the private key in Wallet Import Format.
    ///
    /// The WIF prefix byte is selected by the bound network.
    ///
    /// # Returns
    /// A Base58Check-encoded WIF string.
    pub fn export_private_key_wif(&self) -> String {
        self.key.to_wif_prefix(self.network.wif_prefix())
    }

    /// The public key corresponding to this private key.
    ///
    /// # Returns
    /// The secp256k1 public key.
    pub fn public_key(&self) -> PublicKey {
        self.key.pub_key()
    }

    /// The native Base58Check address for this key on the bound network.
    ///
    /// # Returns
    /// The P2PKH address.
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key(), self.network)
    }

    /// The EIP-55 checksummed hex address for this key.
    ///
    /// Encodes the same identity as `address()`: both resolve to the
    /// Hash160 of the compressed public key.
    ///
    /// # Returns
    /// A "0x"-prefixed checksummed hex string.
    pub fn hex_address(&self) -> String {
        self.address().to_hex_string()
    }

    /// Borrow the underlying private key for signing.
    ///
    /// # Returns
    /// A reference to the private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVKEY_HEX: &str = "2b20f3e0b759aa353a20db5f29f081d946b77f3cb7f7fa80865c9fecc2846189";
    const PRIVKEY_WIF_REGTEST: &str = "cP2YAtVuis5cuQgtaZcePEyQ3MemRjT85U6UoMbMXkQzGK89feAi";

    /// Generated key material produces non-empty exports on every surface.
    #[test]
    fn test_generate() {
        let km = KeyMaterial::new(Network::Regtest, None).unwrap();
        assert_eq!(km.export_private_key().len(), 64);
        assert!(!km.export_private_key_wif().is_empty());
        assert!(!km.address().address_string.is_empty());
        assert!(km.hex_address().starts_with("0x"));
    }

    /// The known hex key recovers the expected WIF and addresses per
    /// network (vectors from the reference implementation).
    #[test]
    fn test_recovery_from_hex() {
        let cases = [
            (Network::Regtest, "TUU94f2PAjH5j3cjmmVxBCQYBcvWwfbJ8F", PRIVKEY_WIF_REGTEST),
            (
                Network::Testnet,
                "TUU94f2PAjH5j3cjmmVxBCQYBcvWwfbJ8F",
                "UPiVJB3LGZcCHTyQiUJRPqs6btoYM8osHcTSaptF1uiZ4SS4NnaM",
            ),
            (
                Network::Mainnet,
                "aKDPoW6HEo9ydQzDBuANRL2utCJZ1bFvH1",
                "Y6DFbD3peQWdeQJcYNAkJCEGpkprDbb3Mf2haBYcHsZM6iNLR183",
            ),
        ];

        for (network, address, wif) in cases {
            let km = KeyMaterial::new(network, Some(PRIVKEY_HEX)).unwrap();
            assert_eq!(km.address().address_string, address);
            assert_eq!(km.export_private_key_wif(), wif);
            assert_eq!(km.export_private_key(), PRIVKEY_HEX);
            assert_eq!(
                km.hex_address(),
                "0xcaEB0a2c9C12a4adAe8876B121EEF6451BDc710f"
            );
        }
    }

    /// A WIF secret recovers the same key as its hex form.
    #[test]
    fn test_recovery_from_wif() {
        let km = KeyMaterial::new(Network::Regtest, Some(PRIVKEY_WIF_REGTEST)).unwrap();
        assert_eq!(km.export_private_key(), PRIVKEY_HEX);
        assert_eq!(km.export_private_key_wif(), PRIVKEY_WIF_REGTEST);
    }

    /// A WIF for another network is rejected.
    #[test]
    fn test_wif_network_mismatch() {
        let result = KeyMaterial::new(Network::Mainnet, Some(PRIVKEY_WIF_REGTEST));
        assert!(matches!(
            result,
            Err(AccountError::WifNetworkMismatch { got: 0xef, expected: 0xd2 })
        ));
    }

    /// Garbage secrets are rejected with the invalid-key condition.
    #[test]
    fn test_invalid_secret() {
        assert!(KeyMaterial::new(Network::Regtest, Some("not a key")).is_err());
        assert!(KeyMaterial::new(Network::Regtest, Some("abcd")).is_err());
    }

    /// Both address encodings resolve to the same public key hash.
    #[test]
    fn test_address_encodings_agree() {
        let km = KeyMaterial::new(Network::Regtest, Some(PRIVKEY_HEX)).unwrap();
        let from_hex = Address::hash_from_hex_string(&km.hex_address()).unwrap();
        assert_eq!(from_hex, km.address().public_key_hash);
        assert_eq!(from_hex, km.public_key().hash160());
    }
}
