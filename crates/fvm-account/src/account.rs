//! The account abstraction consumed by the transaction builder.
//!
//! An `Account` is either a direct private key or a key derived from a
//! BIP-39 mnemonic along a BIP-44 path. Both variants expose the same
//! capability set (key export, both address encodings, public key);
//! only the derived variant can export a mnemonic.

use bip39::{Language, Mnemonic};
use fvm_primitives::ec::{PrivateKey, PublicKey};
use fvm_script::{Address, Network};

use crate::derivation::{DerivationPath, ExtendedKey};
use crate::key_material::KeyMaterial;
use crate::AccountError;

/// Number of words in a generated mnemonic (128 bits of entropy).
const GENERATED_MNEMONIC_WORDS: usize = 12;

/// A key-bearing account, direct or mnemonic-derived.
///
/// The derived variant keeps the mnemonic and the path it was derived
/// along; the key itself is derived once at construction and immutable
/// thereafter.
#[derive(Clone, Debug)]
pub enum Account {
    /// Wraps a single private key. Has no mnemonic.
    Direct(KeyMaterial),
    /// Derived from a mnemonic phrase along a hierarchical path.
    Derived {
        /// The mnemonic phrase the key was derived from.
        mnemonic: String,
        /// The derivation path that was walked.
        hd_path: String,
        /// The derived key material.
        key: KeyMaterial,
    },
}

impl Account {
    /// Create a direct account from an optional secret string.
    ///
    /// When `secret` is `None` a fresh random key is generated; otherwise
    /// the string is parsed as hex or WIF (see [`KeyMaterial::new`]).
    ///
    /// # Arguments
    /// * `network` - The network the account operates on.
    /// * `secret` - Optional hex or WIF private key encoding.
    ///
    /// # Returns
    /// `Ok(Account::Direct)` on success.
    pub fn from_private_key(
        network: Network,
        secret: Option<&str>,
    ) -> Result<Self, AccountError> {
        Ok(Account::Direct(KeyMaterial::new(network, secret)?))
    }

    /// Create a derived account from a mnemonic phrase.
    ///
    /// When `hd_path` is given it is used verbatim and `account_index`
    /// is ignored; otherwise the BIP-44 template is expanded with the
    /// network's default coin type and the index (default 0). When
    /// `mnemonic` is `None` a fresh 12-word English phrase is generated.
    /// A supplied mnemonic is validated against the wordlist and
    /// checksum before any derivation work.
    ///
    /// # Arguments
    /// * `network` - The network the account operates on.
    /// * `mnemonic` - Optional mnemonic phrase to recover.
    /// * `account_index` - Optional address index for the path template.
    /// * `hd_path` - Optional explicit derivation path.
    ///
    /// # Returns
    /// `Ok(Account::Derived)` on success, or `InvalidMnemonic` if the
    /// phrase fails validation.
    pub fn from_mnemonic(
        network: Network,
        mnemonic: Option<&str>,
        account_index: Option<u32>,
        hd_path: Option<&str>,
    ) -> Result<Self, AccountError> {
        let hd_path = match hd_path {
            Some(path) => path.to_string(),
            None => {
                let index = account_index.unwrap_or(0);
                DerivationPath::bip44(network.coin_type(), index).to_string()
            }
        };

        // Validate (or generate) the phrase before any derivation work.
        let (phrase, parsed) = match mnemonic {
            Some(phrase) => {
                let parsed = Mnemonic::parse_in_normalized(Language::English, phrase)
                    .map_err(|_| AccountError::InvalidMnemonic)?;
                (phrase.to_string(), parsed)
            }
            None => {
                let generated = Mnemonic::generate_in(Language::English, GENERATED_MNEMONIC_WORDS)
                    .map_err(|_| AccountError::InvalidMnemonic)?;
                (generated.to_string(), generated)
            }
        };

        let seed = parsed.to_seed("");
        let leaf = ExtendedKey::from_seed(&seed)?.derive_path(&hd_path)?;
        let key = KeyMaterial::from_private_key(network, leaf.private_key().clone());

        Ok(Account::Derived {
            mnemonic: phrase,
            hd_path,
            key,
        })
    }

    /// The key material backing this account.
    ///
    /// # Returns
    /// A reference to the `KeyMaterial`.
    pub fn key_material(&self) -> &KeyMaterial {
        match self {
            Account::Direct(key) => key,
            Account::Derived { key, .. } => key,
        }
    }

    /// Export the private key as a lowercase hex string.
    ///
    /// # Returns
    /// A 64-character hex string.
    pub fn export_private_key(&self) -> String {
        self.key_material().export_private_key()
    }

    /// Export the private key in Wallet Import Format.
    ///
    /// # Returns
    /// A Base58Check-encoded WIF string with the network's prefix.
    pub fn export_private_key_wif(&self) -> String {
        self.key_material().export_private_key_wif()
    }

    /// Export the mnemonic phrase.
    ///
    /// # Returns
    /// The original phrase for derived accounts; the no-mnemonic
    /// condition for direct accounts.
    pub fn export_mnemonic(&self) -> Result<&str, AccountError> {
        match self {
            Account::Direct(_) => Err(AccountError::NoMnemonicToExport),
            Account::Derived { mnemonic, .. } => Ok(mnemonic),
        }
    }

    /// Whether the private key may be exported.
    ///
    /// # Returns
    /// `true` for both variants.
    pub fn exportable(&self) -> bool {
        true
    }

    /// Whether this account carries a mnemonic.
    ///
    /// # Returns
    /// `true` for the derived variant only.
    pub fn has_mnemonic(&self) -> bool {
        matches!(self, Account::Derived { .. })
    }

    /// The derivation path of a derived account.
    ///
    /// # Returns
    /// `Some(path)` for derived accounts, `None` for direct ones.
    pub fn hd_path(&self) -> Option<&str> {
        match self {
            Account::Direct(_) => None,
            Account::Derived { hd_path, .. } => Some(hd_path),
        }
    }

    /// The native Base58Check address.
    ///
    /// # Returns
    /// The P2PKH address on the account's network.
    pub fn address(&self) -> Address {
        self.key_material().address()
    }

    /// The EIP-55 checksummed hex address.
    ///
    /// # Returns
    /// A "0x"-prefixed checksummed hex string for the same identity as
    /// `address()`.
    pub fn hex_address(&self) -> String {
        self.key_material().hex_address()
    }

    /// The public key, usable for message verification without access to
    /// the secret.
    ///
    /// # Returns
    /// The secp256k1 public key.
    pub fn public_key(&self) -> PublicKey {
        self.key_material().public_key()
    }

    /// The network this account operates on.
    ///
    /// # Returns
    /// The network selector.
    pub fn network(&self) -> Network {
        self.key_material().network()
    }

    /// Borrow the private key for signing.
    ///
    /// # Returns
    /// A reference to the private key.
    pub fn private_key(&self) -> &PrivateKey {
        self.key_material().private_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MNEMONIC: &str =
        "sand home split purity total soap solar predict talent enroll nut unable";

    // -----------------------------------------------------------------------
    // Direct accounts
    // -----------------------------------------------------------------------

    /// A generated direct account exports everything except a mnemonic.
    #[test]
    fn test_direct_generate() {
        let account = Account::from_private_key(Network::Regtest, None).unwrap();

        assert_eq!(account.export_private_key().len(), 64);
        assert!(!account.export_private_key_wif().is_empty());
        assert!(account.exportable());
        assert!(!account.has_mnemonic());
        assert!(account.hd_path().is_none());
        assert!(matches!(
            account.export_mnemonic(),
            Err(AccountError::NoMnemonicToExport)
        ));

        // Recovering from the exported hex yields the same address.
        let hex = account.export_private_key();
        let recovered = Account::from_private_key(Network::Regtest, Some(&hex)).unwrap();
        assert_eq!(
            recovered.address().address_string,
            account.address().address_string
        );
    }

    /// Recovery vectors: the same secret in hex and WIF forms produces
    /// identical accounts.
    #[test]
    fn test_direct_recovery() {
        let hex_privkey = "2b20f3e0b759aa353a20db5f29f081d946b77f3cb7f7fa80865c9fecc2846189";
        let wif_privkey = "cP2YAtVuis5cuQgtaZcePEyQ3MemRjT85U6UoMbMXkQzGK89feAi";

        for secret in [hex_privkey, wif_privkey] {
            let account = Account::from_private_key(Network::Regtest, Some(secret)).unwrap();
            assert_eq!(account.export_private_key(), hex_privkey);
            assert_eq!(account.export_private_key_wif(), wif_privkey);
            assert_eq!(
                account.address().address_string,
                "TUU94f2PAjH5j3cjmmVxBCQYBcvWwfbJ8F"
            );
            assert_eq!(
                account.hex_address(),
                "0xcaEB0a2c9C12a4adAe8876B121EEF6451BDc710f"
            );
            assert!(account.exportable());
            assert!(!account.has_mnemonic());
        }
    }

    // -----------------------------------------------------------------------
    // Derived accounts
    // -----------------------------------------------------------------------

    /// A generated mnemonic account has a phrase and all export surfaces.
    #[test]
    fn test_derived_generate() {
        let account = Account::from_mnemonic(Network::Regtest, None, None, None).unwrap();

        assert!(!account.export_private_key().is_empty());
        assert!(!account.export_private_key_wif().is_empty());
        assert!(!account.export_mnemonic().unwrap().is_empty());
        assert!(account.exportable());
        assert!(account.has_mnemonic());
        assert_eq!(account.hd_path(), Some("m/44'/1'/0'/0/0"));
        assert!(!account.address().address_string.is_empty());
        assert!(account.hex_address().starts_with("0x"));
    }

    /// Mnemonic recovery vectors across all three networks (from the
    /// reference implementation's test suite).
    #[test]
    fn test_derived_recovery() {
        let regtest = Account::from_mnemonic(Network::Regtest, Some(MNEMONIC), None, None).unwrap();
        assert_eq!(
            regtest.export_private_key_wif(),
            "cQmhB4tfXbJ7C1E8pvavAzTgC1PTcnYvnwXwhC1esVuFk5hkVQas"
        );
        assert_eq!(
            regtest.address().address_string,
            "TRskDGsnMSH6ZAw9unjQS3Z3yQzjN4Pwxp"
        );
        assert_eq!(
            regtest.hex_address(),
            "0xAe7991F092D19e1D4753173AB9f8C9F307C9f542"
        );
        assert_eq!(
            regtest.export_private_key(),
            "5f2ab36d89d20bdd14d65173208872b52913f37eac19dcd6921c72c80b5ecf2a"
        );

        let testnet = Account::from_mnemonic(Network::Testnet, Some(MNEMONIC), None, None).unwrap();
        assert_eq!(
            testnet.export_private_key_wif(),
            "URTeJMS65Hpga4WexqGhBbMNkYYEYBug15tuUfJYMfCpYCyTHE8u"
        );
        assert_eq!(
            testnet.address().address_string,
            "TRskDGsnMSH6ZAw9unjQS3Z3yQzjN4Pwxp"
        );
        assert_eq!(
            testnet.export_private_key(),
            "5f2ab36d89d20bdd14d65173208872b52913f37eac19dcd6921c72c80b5ecf2a"
        );

        // Mainnet derives along a different coin type, so the key differs.
        let mainnet = Account::from_mnemonic(Network::Mainnet, Some(MNEMONIC), None, None).unwrap();
        assert_eq!(
            mainnet.export_private_key_wif(),
            "Y9yAVZhCvvqZKEsZnLQTjd7rQ7j4wcshxAeJTpqwkk8jiVkxfWLM"
        );
        assert_eq!(
            mainnet.address().address_string,
            "aAHsrSLUhq2XKaASRisXfx7AvPiqQT5h4N"
        );
        assert_eq!(
            mainnet.hex_address(),
            "0x690aFCaC550E839538dB4Ee81DF9eDE6789437D2"
        );
        assert_eq!(
            mainnet.export_private_key(),
            "9b3b209a8157bfa0ea68685d25d096997c432e2e86557692c929b764b60e0ba6"
        );
    }

    /// Account index 1 derives a different key (vector from the
    /// reference implementation).
    #[test]
    fn test_derived_recovery_index_1() {
        let account =
            Account::from_mnemonic(Network::Regtest, Some(MNEMONIC), Some(1), None).unwrap();
        assert_eq!(
            account.export_private_key_wif(),
            "cTwBQj77yezXzio2HBSvTyowzCNAPDVbkJtbj4xp5pvepYxZmxqt"
        );
        assert_eq!(
            account.address().address_string,
            "TJLot9Xyw1KFtuEvrtniU9vBzapgzFnYJt"
        );
        assert_eq!(
            account.hex_address(),
            "0x5bd6Dbc8A1698ED5c89E4439B0f4B1d65A64b237"
        );
        assert_eq!(
            account.export_private_key(),
            "bd8f32cfea868a8bfc0dd10df096b792321cc52e6bbe38b76a28fe41ab790892"
        );
    }

    /// An explicit path equal to the template expansion of an index
    /// yields byte-identical key material, and the path wins over the
    /// index argument.
    #[test]
    fn test_explicit_path_equals_index() {
        let by_index =
            Account::from_mnemonic(Network::Regtest, Some(MNEMONIC), Some(2), None).unwrap();
        let by_path = Account::from_mnemonic(
            Network::Regtest,
            Some(MNEMONIC),
            Some(0),
            Some("m/44'/1'/0'/0/2"),
        )
        .unwrap();

        assert_eq!(by_index.hd_path(), by_path.hd_path());
        assert_eq!(by_index.export_private_key(), by_path.export_private_key());
        assert_eq!(
            by_index.export_private_key_wif(),
            by_path.export_private_key_wif()
        );
        assert_eq!(
            by_index.address().address_string,
            by_path.address().address_string
        );
        assert_eq!(by_index.hex_address(), by_path.hex_address());
    }

    /// A phrase with a bad checksum fails with exactly "Invalid mnemonic"
    /// and never substitutes a generated one.
    #[test]
    fn test_invalid_mnemonic() {
        // "soa" replaces "soap": not on the wordlist.
        let bad = "sand home split purity total soa solar predict talent enroll nut unable";
        let err = Account::from_mnemonic(Network::Regtest, Some(bad), None, None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid mnemonic");

        // Valid words, broken checksum: twelve times "abandon" (the
        // valid phrase ends in "about").
        let bad_checksum = "abandon abandon abandon abandon abandon abandon \
                            abandon abandon abandon abandon abandon abandon";
        assert!(Account::from_mnemonic(Network::Regtest, Some(bad_checksum), None, None).is_err());
    }

    /// Derivation is deterministic: the same inputs always produce the
    /// same key, addresses, and hex address.
    #[test]
    fn test_derivation_deterministic() {
        let a = Account::from_mnemonic(Network::Regtest, Some(MNEMONIC), None, None).unwrap();
        let b = Account::from_mnemonic(Network::Regtest, Some(MNEMONIC), None, None).unwrap();
        assert_eq!(a.export_private_key(), b.export_private_key());
        assert_eq!(a.address().address_string, b.address().address_string);
        assert_eq!(a.hex_address(), b.hex_address());
    }

    /// The derived account's public key matches the reference vector.
    #[test]
    fn test_derived_public_key() {
        let account =
            Account::from_mnemonic(Network::Regtest, Some(MNEMONIC), None, None).unwrap();
        assert_eq!(
            account.public_key().to_hex(),
            "0266e01a4fddfbbe8f2e65fca56726587794eff69a67102b29c0e765bbdb7aea66"
        );
    }
}
