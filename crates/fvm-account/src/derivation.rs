//! Hierarchical key derivation (BIP-32) and the BIP-44 path template.
//!
//! The mnemonic account derives its key by walking a BIP-44 path over
//! the BIP-39 seed: `m/purpose'/coinType'/account'/change/index`.
//! Hardened children commit to the parent private key, normal children
//! to the parent public key; in both cases the child scalar is
//! `(parent + IL) mod n` where IL is the left half of an HMAC-SHA512.

use std::fmt;

use fvm_primitives::ec::PrivateKey;
use fvm_primitives::hash::sha512_hmac;

use crate::AccountError;

/// Index offset marking a hardened derivation step.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for the BIP-32 master node, fixed by the standard.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

// ---------------------------------------------------------------------------
// DerivationPath
// ---------------------------------------------------------------------------

/// A BIP-44 style derivation path template.
///
/// Renders as `m/purpose'/coinType'/account'/change/index` with the
/// first three segments hardened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivationPath {
    /// BIP-43 purpose field, 44 for BIP-44 wallets.
    pub purpose: u32,
    /// Registered coin type of the target network.
    pub coin_type: u32,
    /// Account number within the wallet.
    pub account: u32,
    /// 0 for external (receiving) addresses, 1 for change.
    pub change: u32,
    /// Address index within the chain.
    pub index: u32,
}

impl DerivationPath {
    /// Build the standard BIP-44 path for a coin type and address index.
    ///
    /// Purpose, account, and change take their defaults (44, 0, 0).
    ///
    /// # Arguments
    /// * `coin_type` - The network's registered coin type.
    /// * `index` - The address index.
    ///
    /// # Returns
    /// The path template.
    pub fn bip44(coin_type: u32, index: u32) -> Self {
        DerivationPath {
            purpose: 44,
            coin_type,
            account: 0,
            change: 0,
            index,
        }
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/{}'/{}'/{}'/{}/{}",
            self.purpose, self.coin_type, self.account, self.change, self.index
        )
    }
}

// ---------------------------------------------------------------------------
// ExtendedKey
// ---------------------------------------------------------------------------

/// A BIP-32 extended private key: the key scalar plus its chain code.
#[derive(Clone, Debug)]
pub struct ExtendedKey {
    key: PrivateKey,
    chain_code: [u8; 32],
    depth: u8,
    child_index: u32,
}

impl ExtendedKey {
    /// Build the master extended key from a seed.
    ///
    /// Computes HMAC-SHA512 over the seed with the fixed master key;
    /// the left half becomes the key scalar and the right half the
    /// chain code.
    ///
    /// # Arguments
    /// * `seed` - The BIP-39 seed bytes (typically 64 bytes).
    ///
    /// # Returns
    /// `Ok(ExtendedKey)` at depth 0, or an error if the left half is not
    /// a valid scalar.
    pub fn from_seed(seed: &[u8]) -> Result<Self, AccountError> {
        let digest = sha512_hmac(MASTER_HMAC_KEY, seed);
        let (key_bytes, chain_code) = digest.split_at(32);

        let key = PrivateKey::from_bytes(key_bytes)
            .map_err(|e| AccountError::DerivationFailed(e.to_string()))?;

        let mut chain_code_arr = [0u8; 32];
        chain_code_arr.copy_from_slice(chain_code);

        Ok(ExtendedKey {
            key,
            chain_code: chain_code_arr,
            depth: 0,
            child_index: 0,
        })
    }

    /// Derive a single child key at the given index.
    ///
    /// Indices at or above [`HARDENED_OFFSET`] are hardened and commit
    /// to the parent private key; lower indices commit to the parent
    /// public key. The child scalar is `(parent + IL) mod n`.
    ///
    /// # Arguments
    /// * `index` - The child index, including the hardened offset if any.
    ///
    /// # Returns
    /// `Ok(ExtendedKey)` one level deeper, or an error for the (vanishing
    /// rare) invalid child scalar.
    pub fn derive_child(&self, index: u32) -> Result<Self, AccountError> {
        let mut data = Vec::with_capacity(37);
        if index >= HARDENED_OFFSET {
            data.push(0u8);
            data.extend_from_slice(&self.key.to_bytes());
        } else {
            data.extend_from_slice(&self.key.pub_key().to_compressed());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let digest = sha512_hmac(&self.chain_code, &data);
        let (tweak, chain_code) = digest.split_at(32);

        let key = self
            .key
            .tweak_add(tweak)
            .map_err(|e| AccountError::DerivationFailed(e.to_string()))?;

        let mut chain_code_arr = [0u8; 32];
        chain_code_arr.copy_from_slice(chain_code);

        Ok(ExtendedKey {
            key,
            chain_code: chain_code_arr,
            depth: self.depth + 1,
            child_index: index,
        })
    }

    /// Walk a full derivation path string from this key.
    ///
    /// The path must start with `m`; segments are separated by `/` and
    /// may carry a trailing `'` or `h` for hardened derivation.
    ///
    /// # Arguments
    /// * `path` - The path string, e.g. `m/44'/88'/0'/0/0`.
    ///
    /// # Returns
    /// The extended key at the end of the path, or an error if the path
    /// is malformed.
    pub fn derive_path(&self, path: &str) -> Result<Self, AccountError> {
        if !path.starts_with('m') {
            return Err(AccountError::InvalidPath(path.to_string()));
        }

        let path_part = &path[1..];
        if path_part.is_empty() {
            return Ok(self.clone());
        }

        let indices: Vec<u32> = path_part
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.ends_with('\'') || s.ends_with('h') {
                    let num: u32 = s
                        .trim_end_matches('\'')
                        .trim_end_matches('h')
                        .parse()
                        .map_err(|_| AccountError::InvalidPath(path.to_string()))?;
                    Ok(num + HARDENED_OFFSET)
                } else {
                    s.parse()
                        .map_err(|_| AccountError::InvalidPath(path.to_string()))
                }
            })
            .collect::<Result<Vec<_>, AccountError>>()?;

        let mut current = self.clone();
        for index in indices {
            current = current.derive_child(index)?;
        }

        Ok(current)
    }

    /// The private key of this node.
    ///
    /// # Returns
    /// A reference to the key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }

    /// The depth of this node below the master key.
    ///
    /// # Returns
    /// 0 for the master key.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The index this node was derived at.
    ///
    /// # Returns
    /// The raw child index, including the hardened offset if any.
    pub fn child_index(&self) -> u32 {
        self.child_index
    }
}
