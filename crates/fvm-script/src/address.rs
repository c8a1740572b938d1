/// Address handling for the FVM chain.
///
/// Every key identity has two interchangeable encodings derived from the
/// Hash160 of the compressed public key: a Base58Check string with a
/// per-network version byte, and an EIP-55 checksummed "0x" hex string
/// used by the contract layer. Both decode to the same 20-byte hash.

use std::fmt;

use fvm_primitives::ec::PublicKey;
use fvm_primitives::hash::{keccak256, sha256d};

use crate::ScriptError;

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x52;
/// Testnet/regtest P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x41;

/// Mainnet WIF prefix byte.
const MAINNET_WIF: u8 = 0xd2;
/// Testnet WIF prefix byte.
const TESTNET_WIF: u8 = 0xb9;
/// Regtest WIF prefix byte.
const REGTEST_WIF: u8 = 0xef;

/// Network type for address and key encoding parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Production chain (addresses start with 'a').
    Mainnet,
    /// Public test chain (addresses start with 'T').
    Testnet,
    /// Local regression-test chain (shares the testnet address prefix).
    Regtest,
}

impl Network {
    /// The P2PKH address version byte for this network.
    ///
    /// # Returns
    /// The version byte prepended to the public key hash.
    pub fn p2pkh_prefix(&self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet | Network::Regtest => TESTNET_P2PKH,
        }
    }

    /// The WIF private key prefix byte for this network.
    ///
    /// # Returns
    /// The version byte used in Wallet Import Format encoding.
    pub fn wif_prefix(&self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_WIF,
            Network::Testnet => TESTNET_WIF,
            Network::Regtest => REGTEST_WIF,
        }
    }

    /// The default BIP-44 coin type for hierarchical derivation.
    ///
    /// # Returns
    /// 88 on mainnet, 1 on the test networks.
    pub fn coin_type(&self) -> u32 {
        match self {
            Network::Mainnet => 88,
            Network::Testnet | Network::Regtest => 1,
        }
    }
}

/// A P2PKH address.
///
/// Contains the 20-byte public key hash and the network it belongs to.
/// Can be serialized to/from the Base58Check string format and to the
/// EIP-55 checksummed hex format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The human-readable Base58Check address string.
    pub address_string: String,
    /// The 20-byte RIPEMD-160(SHA-256(pubkey)) hash.
    pub public_key_hash: [u8; 20],
    /// The network this address belongs to.
    pub network: Network,
}

impl Address {
    /// Parse a Base58Check-encoded address string.
    ///
    /// Decodes the string, validates the checksum, and detects the network
    /// from the version byte. The testnet version byte maps to `Testnet`
    /// (regtest shares it).
    ///
    /// # Arguments
    /// * `addr` - The Base58Check address string.
    ///
    /// # Returns
    /// An `Address` or an error if the string is invalid.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let decoded = bs58::decode(addr)
            .into_vec()
            .map_err(|_| ScriptError::InvalidAddress(format!("bad char for '{}'", addr)))?;

        if decoded.len() != 25 {
            return Err(ScriptError::InvalidAddressLength(addr.to_string()));
        }

        // Verify checksum: last 4 bytes should equal sha256d of first 21 bytes.
        let checksum = sha256d(&decoded[..21]);
        if decoded[21..25] != checksum[..4] {
            return Err(ScriptError::EncodingChecksumFailed);
        }

        let network = match decoded[0] {
            MAINNET_P2PKH => Network::Mainnet,
            TESTNET_P2PKH => Network::Testnet,
            _ => return Err(ScriptError::UnsupportedAddress(addr.to_string())),
        };

        let mut pkh = [0u8; 20];
        pkh.copy_from_slice(&decoded[1..21]);

        Ok(Address {
            address_string: addr.to_string(),
            public_key_hash: pkh,
            network,
        })
    }

    /// Create an address from a 20-byte public key hash.
    ///
    /// # Arguments
    /// * `hash` - The 20-byte hash160 of the public key.
    /// * `network` - The target network.
    ///
    /// # Returns
    /// A new `Address` with the encoded Base58Check string.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        let mut payload = Vec::with_capacity(25);
        payload.push(network.p2pkh_prefix());
        payload.extend_from_slice(hash);
        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);

        let address_string = bs58::encode(&payload).into_string();

        Address {
            address_string,
            public_key_hash: *hash,
            network,
        }
    }

    /// Create an address from a public key.
    ///
    /// Computes Hash160 of the compressed public key bytes.
    ///
    /// # Arguments
    /// * `pub_key` - The public key.
    /// * `network` - The target network.
    ///
    /// # Returns
    /// A new `Address`.
    pub fn from_public_key(pub_key: &PublicKey, network: Network) -> Self {
        Self::from_public_key_hash(&pub_key.hash160(), network)
    }

    /// Render the address in EIP-55 checksummed hex format.
    ///
    /// This is the contract-layer encoding of the same identity: the
    /// 20-byte public key hash as "0x"-prefixed hex, with letter casing
    /// derived from the Keccak-256 hash of the lowercase hex string.
    ///
    /// # Returns
    /// The checksummed hex address string.
    pub fn to_hex_string(&self) -> String {
        to_checksum_hex(&self.public_key_hash)
    }

    /// Parse an EIP-55 hex address into a 20-byte public key hash.
    ///
    /// The checksum casing is not enforced; a plain lowercase address is
    /// accepted.
    ///
    /// # Arguments
    /// * `hex_addr` - A "0x"-prefixed or bare 40-character hex string.
    ///
    /// # Returns
    /// The 20-byte hash, or an error for invalid input.
    pub fn hash_from_hex_string(hex_addr: &str) -> Result<[u8; 20], ScriptError> {
        let stripped = hex_addr.strip_prefix("0x").unwrap_or(hex_addr);
        let bytes = hex::decode(stripped.to_lowercase())
            .map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(ScriptError::InvalidAddressLength(hex_addr.to_string()));
        }
        let mut pkh = [0u8; 20];
        pkh.copy_from_slice(&bytes);
        Ok(pkh)
    }
}

impl fmt::Display for Address {
    /// Display the address as its Base58Check string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

/// Encode a 20-byte hash as an EIP-55 checksummed "0x" hex address.
///
/// Letters in the hex encoding are uppercased when the corresponding
/// nibble of Keccak-256(lowercase_hex) is 8 or above.
///
/// # Arguments
/// * `hash` - The 20-byte public key hash.
///
/// # Returns
/// The checksummed hex address string.
pub fn to_checksum_hex(hash: &[u8; 20]) -> String {
    let lower = hex::encode(hash);
    let digest = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            digest[i / 2] >> 4
        } else {
            digest[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    //! Tests for address parsing, generation, and the two encodings.
    //!
    //! Test vectors come from the reference implementation's account suite:
    //! the same public key hash must render as the 'T'-prefixed string on
    //! the test networks, the 'a'-prefixed string on mainnet, and the
    //! EIP-55 hex form for the contract layer.

    use super::*;
    use fvm_primitives::ec::PrivateKey;

    const TEST_PRIVKEY_HEX: &str =
        "2b20f3e0b759aa353a20db5f29f081d946b77f3cb7f7fa80865c9fecc2846189";

    fn test_pubkey() -> PublicKey {
        PrivateKey::from_hex(TEST_PRIVKEY_HEX).unwrap().pub_key()
    }

    // -----------------------------------------------------------------------
    // from_public_key
    // -----------------------------------------------------------------------

    /// The known private key produces the expected regtest address string.
    #[test]
    fn test_from_public_key_regtest() {
        let addr = Address::from_public_key(&test_pubkey(), Network::Regtest);
        assert_eq!(addr.address_string, "TUU94f2PAjH5j3cjmmVxBCQYBcvWwfbJ8F");
    }

    /// Testnet shares the regtest version byte, so the string is identical.
    #[test]
    fn test_from_public_key_testnet() {
        let addr = Address::from_public_key(&test_pubkey(), Network::Testnet);
        assert_eq!(addr.address_string, "TUU94f2PAjH5j3cjmmVxBCQYBcvWwfbJ8F");
    }

    /// Mainnet uses its own version byte and produces an 'a' address.
    #[test]
    fn test_from_public_key_mainnet() {
        let addr = Address::from_public_key(&test_pubkey(), Network::Mainnet);
        assert_eq!(addr.address_string, "aKDPoW6HEo9ydQzDBuANRL2utCJZ1bFvH1");
    }

    /// The hex encoding is network independent and EIP-55 checksummed.
    #[test]
    fn test_hex_address() {
        for network in [Network::Mainnet, Network::Testnet, Network::Regtest] {
            let addr = Address::from_public_key(&test_pubkey(), network);
            assert_eq!(
                addr.to_hex_string(),
                "0xcaEB0a2c9C12a4adAe8876B121EEF6451BDc710f"
            );
        }
    }

    /// Both encodings resolve to the same public key hash.
    #[test]
    fn test_encodings_share_identity() {
        let addr = Address::from_public_key(&test_pubkey(), Network::Regtest);
        let from_hex = Address::hash_from_hex_string(&addr.to_hex_string()).unwrap();
        let from_b58 = Address::from_string(&addr.address_string).unwrap();
        assert_eq!(from_hex, from_b58.public_key_hash);
        assert_eq!(from_hex, test_pubkey().hash160());
    }

    // -----------------------------------------------------------------------
    // from_string
    // -----------------------------------------------------------------------

    /// Parse a known testnet-prefix address and verify the hash and network.
    #[test]
    fn test_from_string_testnet() {
        let addr = Address::from_string("TMZZPF9Rzow8pt2RAqumTWRXo2AkKaYgaE")
            .expect("should parse");
        assert_eq!(
            hex::encode(addr.public_key_hash),
            "7f288a70fea402dcf5ddbadd155ae7545af4fae0"
        );
        assert_eq!(addr.network, Network::Testnet);
    }

    /// Parse a mainnet address and verify the network.
    #[test]
    fn test_from_string_mainnet() {
        let addr = Address::from_string("aKDPoW6HEo9ydQzDBuANRL2utCJZ1bFvH1")
            .expect("should parse");
        assert_eq!(addr.network, Network::Mainnet);
    }

    /// A corrupted character breaks the checksum.
    #[test]
    fn test_from_string_bad_checksum() {
        assert!(Address::from_string("TMZZPF9Rzow8pt2RAqumTWRXo2AkKaYgaF").is_err());
    }

    /// Short strings are rejected on length.
    #[test]
    fn test_from_string_short() {
        assert!(Address::from_string("ADD8E55").is_err());
    }

    /// Round-trip through from_public_key_hash and from_string.
    #[test]
    fn test_roundtrip() {
        let addr = Address::from_public_key(&test_pubkey(), Network::Regtest);
        let parsed = Address::from_string(&addr.address_string).unwrap();
        assert_eq!(parsed.public_key_hash, addr.public_key_hash);
        assert_eq!(format!("{}", parsed), addr.address_string);
    }

    // -----------------------------------------------------------------------
    // hex parsing
    // -----------------------------------------------------------------------

    #[test]
    fn test_hash_from_hex_string() {
        let pkh = Address::hash_from_hex_string("0xcaEB0a2c9C12a4adAe8876B121EEF6451BDc710f")
            .unwrap();
        assert_eq!(hex::encode(pkh), "caeb0a2c9c12a4adae8876b121eef6451bdc710f");

        // Bare form without the prefix also parses.
        let bare = Address::hash_from_hex_string("caeb0a2c9c12a4adae8876b121eef6451bdc710f")
            .unwrap();
        assert_eq!(pkh, bare);

        assert!(Address::hash_from_hex_string("0x1234").is_err());
        assert!(Address::hash_from_hex_string("zz").is_err());
    }

    // -----------------------------------------------------------------------
    // network parameters
    // -----------------------------------------------------------------------

    #[test]
    fn test_network_parameters() {
        assert_eq!(Network::Mainnet.p2pkh_prefix(), 0x52);
        assert_eq!(Network::Testnet.p2pkh_prefix(), 0x41);
        assert_eq!(Network::Regtest.p2pkh_prefix(), 0x41);
        assert_eq!(Network::Mainnet.wif_prefix(), 0xd2);
        assert_eq!(Network::Testnet.wif_prefix(), 0xb9);
        assert_eq!(Network::Regtest.wif_prefix(), 0xef);
        assert_eq!(Network::Mainnet.coin_type(), 88);
        assert_eq!(Network::Regtest.coin_type(), 1);
    }
}
