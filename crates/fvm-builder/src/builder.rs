//! The transaction builder.
//!
//! `TxBuilder` accumulates inputs (coins) and outputs (value transfers,
//! contract calls, data), enforces gas safety bounds, performs coin
//! selection against the required spend, resolves the change output,
//! and signs with one or more accounts.
//!
//! The builder moves through an explicit one-directional phase machine:
//!
//! ```text
//! Empty -> Populated -> Built -> Serialized
//! ```
//!
//! Structural mutation is rejected once the transaction is built. Coin
//! selection runs against a staged copy and commits atomically: a build
//! that fails for insufficient funds leaves the builder unchanged.

use std::collections::HashSet;

use fvm_account::Account;
use fvm_primitives::chainhash::Hash;
use fvm_script::opcodes::OP_RETURN;
use fvm_script::{Address, Script};
use fvm_transaction::policy;
use fvm_transaction::template::contract::ContractScript;
use fvm_transaction::template::p2pkh;
use fvm_transaction::template::UnlockingScriptTemplate;
use fvm_transaction::{Transaction, TransactionInput, TransactionOutput};

use crate::coin::Coin;
use crate::safety::SafetyParams;
use crate::selection::{CoinSelector, FirstFit};
use crate::BuilderError;

/// Lifecycle phase of a `TxBuilder`.
///
/// Transitions are one-directional; there is no supported path back to
/// `Populated` after `Built`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No inputs or outputs added yet.
    Empty,
    /// Outputs or explicit inputs have been added.
    Populated,
    /// Change resolved, inputs selected, signatures applied.
    Built,
    /// The final hex has been produced.
    Serialized,
}

/// Fee policy delegated to the codec's estimation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FeePolicy {
    /// Size-based estimation at the given rate per 1000 bytes (plus the
    /// gas budget of contract outputs).
    PerKb(u64),
    /// A caller-fixed fee.
    Fixed(u64),
}

/// The transaction-construction engine.
///
/// Owns its pending transaction exclusively; independent builders share
/// nothing and accounts may be reused across builders concurrently.
pub struct TxBuilder {
    tx: Transaction,
    phase: Phase,
    safety: SafetyParams,
    fee_policy: FeePolicy,
    change_address: Option<Address>,
    change_set: bool,
    selector: Box<dyn CoinSelector>,
}

impl std::fmt::Debug for TxBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxBuilder")
            .field("tx", &self.tx)
            .field("phase", &self.phase)
            .field("safety", &self.safety)
            .field("fee_policy", &self.fee_policy)
            .field("change_address", &self.change_address)
            .field("change_set", &self.change_set)
            .field("selector", &"<dyn CoinSelector>")
            .finish()
    }
}

impl TxBuilder {
    /// Create an empty builder with default safety bounds and fee rate.
    ///
    /// # Returns
    /// A `TxBuilder` in the `Empty` phase.
    pub fn new() -> Self {
        Self::with_safety(SafetyParams::default())
    }

    /// Create an empty builder with explicit safety bounds.
    ///
    /// # Arguments
    /// * `safety` - The gas ceilings applied to contract-call outputs.
    ///
    /// # Returns
    /// A `TxBuilder` in the `Empty` phase.
    pub fn with_safety(safety: SafetyParams) -> Self {
        TxBuilder {
            tx: Transaction::new(),
            phase: Phase::Empty,
            safety,
            fee_policy: FeePolicy::PerKb(policy::DEFAULT_FEE_PER_KB),
            change_address: None,
            change_set: false,
            selector: Box::new(FirstFit),
        }
    }

    /// Seed a builder from a serialized transaction.
    ///
    /// # Arguments
    /// * `hex_str` - The hex-encoded transaction to continue from.
    ///
    /// # Returns
    /// A `TxBuilder` in the `Populated` phase, or an error if the hex
    /// does not parse.
    pub fn from_hex(hex_str: &str) -> Result<Self, BuilderError> {
        Self::from_hex_with_safety(hex_str, SafetyParams::default())
    }

    /// Seed a builder from a serialized transaction with explicit
    /// safety bounds.
    ///
    /// # Arguments
    /// * `hex_str` - The hex-encoded transaction to continue from.
    /// * `safety` - The gas ceilings applied to contract-call outputs.
    ///
    /// # Returns
    /// A `TxBuilder` in the `Populated` phase, or an error if the hex
    /// does not parse.
    pub fn from_hex_with_safety(
        hex_str: &str,
        safety: SafetyParams,
    ) -> Result<Self, BuilderError> {
        let mut builder = Self::with_safety(safety);
        builder.tx = Transaction::from_hex(hex_str)?;
        builder.phase = Phase::Populated;
        Ok(builder)
    }

    /// Replace the coin selection strategy.
    ///
    /// # Arguments
    /// * `selector` - The strategy used by subsequent `build` calls.
    ///
    /// # Returns
    /// The builder, for chaining at construction time.
    pub fn with_selector(mut self, selector: Box<dyn CoinSelector>) -> Self {
        self.selector = selector;
        self
    }

    // -----------------------------------------------------------------
    // Structural mutation (Empty / Populated phases only)
    // -----------------------------------------------------------------

    /// Append a coin as a spendable input.
    ///
    /// No balance check happens at this point; funding sufficiency is
    /// enforced by `build`.
    ///
    /// # Arguments
    /// * `coin` - The unspent output to spend.
    ///
    /// # Returns
    /// The builder for chaining, or an error if the coin record is
    /// malformed or the phase forbids mutation.
    pub fn add_input(&mut self, coin: &Coin) -> Result<&mut Self, BuilderError> {
        self.ensure_mutable()?;
        self.tx
            .add_input_from(&coin.txid, coin.output_index, &coin.script, coin.value)?;
        self.phase = Phase::Populated;
        Ok(self)
    }

    /// Append a value-transfer output.
    ///
    /// # Arguments
    /// * `address` - The Base58Check destination address.
    /// * `amount` - The amount in smallest units.
    ///
    /// # Returns
    /// The builder for chaining, or an error if the address is invalid
    /// or the phase forbids mutation.
    pub fn add_output(&mut self, address: &str, amount: u64) -> Result<&mut Self, BuilderError> {
        self.ensure_mutable()?;
        let address = Address::from_string(address)?;
        self.tx.add_output(TransactionOutput {
            value: amount,
            locking_script: p2pkh::lock(&address),
            change: false,
        });
        self.phase = Phase::Populated;
        Ok(self)
    }

    /// Append a zero-value contract output (CALL or CREATE).
    ///
    /// The gas parameters are checked against the safety bounds in a
    /// fixed order - price, limit, then combined budget - before the
    /// output script is constructed; a violated check leaves the output
    /// list untouched. When `contract_address` is present the script is
    /// tagged as a CALL, otherwise as a CREATE deploying `calldata` as
    /// bytecode. "0x" prefixes on both hex arguments are accepted.
    ///
    /// # Arguments
    /// * `calldata` - Hex-encoded call data or bytecode.
    /// * `gas_price` - Price per gas unit.
    /// * `gas_limit` - Maximum gas units.
    /// * `contract_address` - Optional hex target contract address.
    ///
    /// # Returns
    /// The builder for chaining, or the first violated gas check.
    pub fn add_contract_call(
        &mut self,
        calldata: &str,
        gas_price: u64,
        gas_limit: u64,
        contract_address: Option<&str>,
    ) -> Result<&mut Self, BuilderError> {
        self.ensure_mutable()?;

        if gas_price > self.safety.max_gas_price {
            return Err(BuilderError::GasPriceExceeded {
                gas_price,
                max: self.safety.max_gas_price,
            });
        }
        if gas_limit > self.safety.max_gas_limit {
            return Err(BuilderError::GasLimitExceeded {
                gas_limit,
                max: self.safety.max_gas_limit,
            });
        }
        let budget = gas_price as u128 * gas_limit as u128;
        if budget > self.safety.max_gas_budget as u128 {
            return Err(BuilderError::GasBudgetExceeded {
                budget,
                max: self.safety.max_gas_budget,
            });
        }

        let calldata_bytes = hex::decode(calldata.strip_prefix("0x").unwrap_or(calldata))
            .map_err(|e| fvm_script::ScriptError::InvalidHex(e.to_string()))?;

        let contract = match contract_address {
            Some(addr) => ContractScript::call(
                calldata_bytes,
                gas_price,
                gas_limit,
                Address::hash_from_hex_string(addr)?,
            ),
            None => ContractScript::create(calldata_bytes, gas_price, gas_limit),
        };

        self.tx.add_output(TransactionOutput {
            value: 0,
            locking_script: contract.to_script()?,
            change: false,
        });
        self.phase = Phase::Populated;
        Ok(self)
    }

    /// Append a zero-value OP_RETURN data output.
    ///
    /// # Arguments
    /// * `data` - The payload bytes.
    ///
    /// # Returns
    /// The builder for chaining, or an error if the payload is too
    /// large or the phase forbids mutation.
    pub fn add_data(&mut self, data: &[u8]) -> Result<&mut Self, BuilderError> {
        self.ensure_mutable()?;
        let mut script = Script::new();
        script.append_opcodes(&[OP_RETURN])?;
        script.append_push_data(data)?;
        self.tx.add_output(TransactionOutput {
            value: 0,
            locking_script: script,
            change: false,
        });
        self.phase = Phase::Populated;
        Ok(self)
    }

    /// Designate an explicit change destination.
    ///
    /// Marks change as explicitly set, which suppresses `build`'s
    /// default of the first signer's address.
    ///
    /// # Arguments
    /// * `address` - The Base58Check change address.
    ///
    /// # Returns
    /// The builder for chaining, or an error if the address is invalid
    /// or the phase forbids mutation.
    pub fn set_change(&mut self, address: &str) -> Result<&mut Self, BuilderError> {
        self.ensure_mutable()?;
        self.change_address = Some(Address::from_string(address)?);
        self.change_set = true;
        Ok(self)
    }

    /// Set a per-kilobyte fee rate.
    ///
    /// # Arguments
    /// * `amount_per_kb` - Smallest units per 1000 bytes.
    ///
    /// # Returns
    /// The builder for chaining, or a phase error.
    pub fn set_fee_rate(&mut self, amount_per_kb: u64) -> Result<&mut Self, BuilderError> {
        self.ensure_mutable()?;
        self.fee_policy = FeePolicy::PerKb(amount_per_kb);
        Ok(self)
    }

    /// Set a fixed fee, overriding size-based estimation.
    ///
    /// # Arguments
    /// * `amount` - The fee in smallest units.
    ///
    /// # Returns
    /// The builder for chaining, or a phase error.
    pub fn set_fixed_fee(&mut self, amount: u64) -> Result<&mut Self, BuilderError> {
        self.ensure_mutable()?;
        self.fee_policy = FeePolicy::Fixed(amount);
        Ok(self)
    }

    // -----------------------------------------------------------------
    // Build / sign / serialize
    // -----------------------------------------------------------------

    /// Fund the transaction from the available coins and sign it.
    ///
    /// 1. Change defaults to the first signer's address when not
    ///    explicitly set.
    /// 2. The required amount is the output total plus the current fee
    ///    (the estimate counts the change output and the gas budget of
    ///    contract outputs).
    /// 3. The selection strategy consumes `available_coins` in the order
    ///    given, skipping coins no signer controls and coins whose
    ///    transaction id is already used. Selection runs against a
    ///    staged copy and commits atomically: on failure the builder is
    ///    left unchanged.
    /// 4. The leftover input value becomes the change output; a
    ///    remainder below the dust threshold is absorbed into the fee.
    /// 5. Every signer contributes signatures for the inputs it owns, in
    ///    the order given; a signer with no matching inputs is a no-op.
    ///
    /// # Arguments
    /// * `signers` - The accounts funding and signing the transaction.
    /// * `available_coins` - The funding pool, consumed first-fit.
    ///
    /// # Returns
    /// The builder in the `Built` phase, or `InsufficientFunds` when the
    /// pool is exhausted before the requirement is met.
    pub fn build(
        &mut self,
        signers: &[Account],
        available_coins: &[Coin],
    ) -> Result<&mut Self, BuilderError> {
        self.ensure_mutable()?;
        let first = signers.first().ok_or(BuilderError::NoSigners)?;

        let change_address = match (self.change_set, &self.change_address) {
            (true, Some(addr)) => addr.clone(),
            _ => first.address(),
        };
        let change_script = p2pkh::lock(&change_address);

        // Template for fee probing: the current transaction plus a
        // placeholder change output, so the estimate covers the final
        // shape.
        let mut template = self.tx.clone();
        template.add_output(TransactionOutput {
            value: 0,
            locking_script: change_script.clone(),
            change: true,
        });

        let spend_target = self.tx.total_output_value();
        let already_funded = self.known_input_value();

        let owned: HashSet<String> = signers
            .iter()
            .map(|a| a.address().address_string)
            .collect();
        let used: HashSet<[u8; 32]> =
            self.tx.inputs.iter().map(|i| i.source_txid).collect();

        let is_spendable = |coin: &Coin| -> bool {
            if !owned.contains(coin.address.as_str()) {
                return false;
            }
            if Script::from_hex(&coin.script).is_err() {
                return false;
            }
            match Hash::from_hex(&coin.txid) {
                Ok(hash) => !used.contains(hash.as_bytes()),
                Err(_) => false,
            }
        };

        let fee_policy = self.fee_policy;
        let mut required = |staged: &[&Coin]| -> u64 {
            let mut probe = template.clone();
            for coin in staged {
                // Candidates are pre-validated by is_spendable.
                let _ = probe.add_input_from(
                    &coin.txid,
                    coin.output_index,
                    &coin.script,
                    coin.value,
                );
            }
            spend_target.saturating_add(Self::fee_for(&probe, fee_policy))
        };

        let selected =
            self.selector
                .select(available_coins, &is_spendable, already_funded, &mut required)?;

        // Commit the staged selection.
        for coin in &selected {
            self.tx
                .add_input_from(&coin.txid, coin.output_index, &coin.script, coin.value)?;
        }

        // Resolve the change output against the final input set.
        let funded = self.known_input_value();
        let mut with_change = self.tx.clone();
        with_change.add_output(TransactionOutput {
            value: 0,
            locking_script: change_script.clone(),
            change: true,
        });
        let fee = Self::fee_for(&with_change, self.fee_policy);
        let change_value = funded.saturating_sub(spend_target).saturating_sub(fee);
        if change_value >= policy::DUST_AMOUNT {
            self.tx.add_output(TransactionOutput {
                value: change_value,
                locking_script: change_script,
                change: true,
            });
        }

        self.change_address = Some(change_address);
        self.sign_inputs(signers)?;
        self.phase = Phase::Built;
        Ok(self)
    }

    /// Sign the inputs owned by the given accounts.
    ///
    /// Exposed independently of `build` for callers assembling inputs
    /// and outputs manually. Each account signs every input whose
    /// source locking script pays its public key hash; accounts owning
    /// no inputs are a no-op. Inputs without source information are
    /// skipped.
    ///
    /// # Arguments
    /// * `accounts` - The signing accounts, applied in order.
    ///
    /// # Returns
    /// The builder in the `Built` phase.
    pub fn sign(&mut self, accounts: &[Account]) -> Result<&mut Self, BuilderError> {
        if self.phase == Phase::Serialized {
            return Err(BuilderError::InvalidPhase(self.phase));
        }
        self.sign_inputs(accounts)?;
        self.phase = Phase::Built;
        Ok(self)
    }

    /// Serialize the transaction to broadcast-ready hex.
    ///
    /// With `allow_unsafe = false` the codec's strict policy checks run
    /// first: an oversized fee fails with "Fee is too large" and a dust
    /// output with "Dust amount detected in one output". With
    /// `allow_unsafe = true` both checks are bypassed and serialization
    /// always succeeds structurally.
    ///
    /// # Arguments
    /// * `allow_unsafe` - Bypass the strict policy checks.
    ///
    /// # Returns
    /// The hex-encoded transaction; the builder enters the `Serialized`
    /// phase.
    pub fn serialize(&mut self, allow_unsafe: bool) -> Result<String, BuilderError> {
        if !allow_unsafe {
            policy::pre_serialize_checks(&self.tx, self.fee_rate())?;
        }
        self.phase = Phase::Serialized;
        Ok(self.tx.to_hex())
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// The current fee in smallest units.
    ///
    /// A fixed fee is returned as-is. Otherwise, once the transaction is
    /// built and every input's source value is known, the realized fee
    /// (inputs minus outputs) is returned; before that, the estimate.
    ///
    /// # Returns
    /// The fee in smallest units.
    pub fn fee(&self) -> u64 {
        match self.fee_policy {
            FeePolicy::Fixed(amount) => amount,
            FeePolicy::PerKb(rate) => {
                if matches!(self.phase, Phase::Built | Phase::Serialized) {
                    let known: Option<u64> = self
                        .tx
                        .inputs
                        .iter()
                        .map(|i| i.source_value())
                        .sum::<Option<u64>>();
                    if let Some(input_total) = known {
                        let output_total = self.tx.total_output_value();
                        if input_total >= output_total {
                            return input_total - output_total;
                        }
                    }
                }
                policy::estimate_fee(&self.tx, rate)
            }
        }
    }

    /// The builder's current lifecycle phase.
    ///
    /// # Returns
    /// The phase tag.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The accumulated inputs.
    ///
    /// # Returns
    /// A slice of the transaction's inputs.
    pub fn inputs(&self) -> &[TransactionInput] {
        &self.tx.inputs
    }

    /// The accumulated outputs.
    ///
    /// # Returns
    /// A slice of the transaction's outputs.
    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.tx.outputs
    }

    /// The wrapped codec transaction.
    ///
    /// # Returns
    /// A reference to the pending transaction.
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// Reject structural mutation outside the Empty/Populated phases.
    fn ensure_mutable(&self) -> Result<(), BuilderError> {
        match self.phase {
            Phase::Empty | Phase::Populated => Ok(()),
            Phase::Built | Phase::Serialized => Err(BuilderError::InvalidPhase(self.phase)),
        }
    }

    /// Sum the known source values of the current inputs. Inputs seeded
    /// from a serialized transaction carry no source info and count as
    /// zero.
    fn known_input_value(&self) -> u64 {
        self.tx
            .inputs
            .iter()
            .filter_map(|i| i.source_value())
            .sum()
    }

    /// The fee implied by a policy for a given transaction shape.
    fn fee_for(tx: &Transaction, fee_policy: FeePolicy) -> u64 {
        match fee_policy {
            FeePolicy::Fixed(amount) => amount,
            FeePolicy::PerKb(rate) => policy::estimate_fee(tx, rate),
        }
    }

    /// The per-KB rate backing the policy estimate.
    fn fee_rate(&self) -> u64 {
        match self.fee_policy {
            FeePolicy::PerKb(rate) => rate,
            FeePolicy::Fixed(_) => policy::DEFAULT_FEE_PER_KB,
        }
    }

    /// Sign every input owned by each account, in account order.
    fn sign_inputs(&mut self, accounts: &[Account]) -> Result<(), BuilderError> {
        for account in accounts {
            let pkh = account.public_key().hash160().to_vec();
            let unlocker = p2pkh::unlock(account.private_key().clone(), None);

            for index in 0..self.tx.inputs.len() {
                let owns = self.tx.inputs[index]
                    .source_script()
                    .map(|s| {
                        s.is_p2pkh() && s.public_key_hash().map(|h| h == pkh).unwrap_or(false)
                    })
                    .unwrap_or(false);
                if !owns {
                    continue;
                }
                let script = unlocker.sign(&self.tx, index)?;
                self.tx.inputs[index].unlocking_script = Some(script);
            }
        }
        Ok(())
    }
}

impl Default for TxBuilder {
    fn default() -> Self {
        Self::new()
    }
}
