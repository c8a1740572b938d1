//! Pay-to-Public-Key-Hash (P2PKH) script template.
//!
//! Creates standard P2PKH locking scripts (`OP_DUP OP_HASH160 <hash>
//! OP_EQUALVERIFY OP_CHECKSIG`) and unlocking scripts (`<sig> <pubkey>`).

use fvm_primitives::ec::PrivateKey;
use fvm_script::opcodes::*;
use fvm_script::{Address, Script};

use crate::sighash::{self, SIGHASH_ALL};
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Estimated byte length of a P2PKH unlocking script:
/// 1 (push len) + 72 (DER sig + sighash byte) + 1 (push len) + 33
/// (compressed pubkey).
pub const UNLOCKING_SCRIPT_ESTIMATE: usize = 107;

/// Create a P2PKH locking script from an address.
///
/// Produces: `OP_DUP OP_HASH160 <20-byte pubkey hash> OP_EQUALVERIFY
/// OP_CHECKSIG`
///
/// # Arguments
/// * `address` - The address whose public key hash to lock to.
///
/// # Returns
/// The 25-byte P2PKH locking script.
pub fn lock(address: &Address) -> Script {
    let pkh = &address.public_key_hash;

    let mut bytes = Vec::with_capacity(25);
    bytes.push(OP_DUP);
    bytes.push(OP_HASH160);
    bytes.push(OP_DATA_20);
    bytes.extend_from_slice(pkh);
    bytes.push(OP_EQUALVERIFY);
    bytes.push(OP_CHECKSIG);

    Script::from_bytes(&bytes)
}

/// Create a P2PKH unlocker for signing transaction inputs.
///
/// # Arguments
/// * `private_key` - The private key used to sign.
/// * `sighash_flag` - Optional sighash flag. Defaults to `SIGHASH_ALL`.
///
/// # Returns
/// A `P2pkhUnlocker` instance implementing `UnlockingScriptTemplate`.
pub fn unlock(private_key: PrivateKey, sighash_flag: Option<u32>) -> P2pkhUnlocker {
    P2pkhUnlocker {
        private_key,
        sighash_flag: sighash_flag.unwrap_or(SIGHASH_ALL),
    }
}

/// P2PKH signing template holding a private key and sighash flag.
///
/// Implements `UnlockingScriptTemplate` to produce unlocking scripts
/// of the form `<DER_signature + sighash_byte> <compressed_pubkey>`.
pub struct P2pkhUnlocker {
    /// The private key used for ECDSA signing.
    private_key: PrivateKey,

    /// The sighash flag to use.
    sighash_flag: u32,
}

impl UnlockingScriptTemplate for P2pkhUnlocker {
    /// Sign the specified input and produce the unlocking script.
    ///
    /// Computes the legacy signature hash for the input, signs it with
    /// the private key using RFC6979 deterministic ECDSA, and constructs
    /// the unlocking script: `<DER_sig || sighash_byte>
    /// <compressed_pubkey>`.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - The index of the input to sign.
    ///
    /// # Returns
    /// `Ok(Script)` containing the P2PKH unlocking script.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError> {
        if input_index >= tx.inputs.len() {
            return Err(TransactionError::SigningError(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                tx.inputs.len()
            )));
        }

        // The locking script of the output being spent is required.
        let input = &tx.inputs[input_index];
        let source_script = input.source_script().ok_or_else(|| {
            TransactionError::SigningError(
                "missing source output on input (no previous tx info)".to_string(),
            )
        })?;
        let script_bytes = source_script.to_bytes().to_vec();

        // Compute the signature hash.
        let sig_hash =
            sighash::signature_hash(tx, input_index, &script_bytes, self.sighash_flag)?;

        // Sign the hash with the private key (RFC6979 deterministic ECDSA).
        let signature = self.private_key.sign(&sig_hash)?;

        // Get the compressed public key (33 bytes).
        let pub_key_bytes = self.private_key.pub_key().to_compressed();

        // Build the DER signature with sighash flag byte appended.
        let der_sig = signature.to_der();
        let mut sig_buf = Vec::with_capacity(der_sig.len() + 1);
        sig_buf.extend_from_slice(&der_sig);
        sig_buf.push(self.sighash_flag as u8);

        // Build the unlocking script: PUSHDATA(sig) PUSHDATA(pubkey).
        let mut script = Script::new();
        script.append_push_data(&sig_buf)?;
        script.append_push_data(&pub_key_bytes)?;

        Ok(script)
    }

    /// Estimate the byte length of a P2PKH unlocking script.
    ///
    /// # Returns
    /// The standard 107-byte estimate.
    fn estimate_length(&self, _tx: &Transaction, _input_index: usize) -> usize {
        UNLOCKING_SCRIPT_ESTIMATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TransactionOutput;
    use fvm_script::Network;

    const PRIVKEY_HEX: &str = "aad2ac52013d42dcdc5df1856b434ebf4a683be5c503df28da91bb2ea7e4b40e";

    #[test]
    fn test_lock_matches_address_hash() {
        let key = PrivateKey::from_hex(PRIVKEY_HEX).unwrap();
        let address = Address::from_public_key(&key.pub_key(), Network::Regtest);
        let script = lock(&address);

        assert!(script.is_p2pkh());
        assert_eq!(
            script.public_key_hash().unwrap(),
            address.public_key_hash.to_vec()
        );
    }

    #[test]
    fn test_lock_known_vector() {
        // Address from the reference test suite with a known locking script.
        let address = Address::from_string("TGo5JGp3ryt6d78pqDL3BudYbfC7UhLqPV").unwrap();
        let script = lock(&address);
        assert_eq!(
            script.to_hex(),
            "76a9144ade4a623ac92d1746f24f391b89997e6372b90b88ac"
        );
    }

    #[test]
    fn test_unlock_produces_sig_and_pubkey() {
        let key = PrivateKey::from_hex(PRIVKEY_HEX).unwrap();
        let address = Address::from_public_key(&key.pub_key(), Network::Regtest);
        let locking = lock(&address);

        let mut tx = Transaction::new();
        tx.add_input_from(
            "150077feae1366b7abded0864bcdaef881313a6115c7870dcda755757d1d4dba",
            1,
            &locking.to_hex(),
            4801235000,
        )
        .unwrap();
        tx.add_output(TransactionOutput {
            value: 100_000_000,
            locking_script: locking.clone(),
            change: false,
        });

        let unlocker = unlock(key.clone(), None);
        let script = unlocker.sign(&tx, 0).unwrap();

        let chunks = script.chunks().unwrap();
        assert_eq!(chunks.len(), 2);
        // First push: DER signature with trailing SIGHASH_ALL byte.
        let sig = chunks[0].data.as_ref().unwrap();
        assert_eq!(*sig.last().unwrap(), SIGHASH_ALL as u8);
        assert_eq!(sig[0], 0x30);
        // Second push: the compressed public key.
        assert_eq!(
            chunks[1].data.as_ref().unwrap().as_slice(),
            key.pub_key().to_compressed().as_slice()
        );
    }

    #[test]
    fn test_unlock_requires_source_output() {
        let key = PrivateKey::from_hex(PRIVKEY_HEX).unwrap();
        let mut tx = Transaction::new();
        tx.add_input(crate::input::TransactionInput::new());

        let unlocker = unlock(key, None);
        assert!(unlocker.sign(&tx, 0).is_err());
        assert!(unlocker.sign(&tx, 5).is_err());
    }
}
