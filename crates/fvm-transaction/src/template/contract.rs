//! Contract output script template.
//!
//! Encodes and decodes the script layout of EVM contract outputs:
//!
//! ```text
//! <04> <gas limit> <gas price> <call data> <contract address> OP_CALL
//! <04> <gas limit> <gas price> <bytecode> OP_CREATE
//! ```
//!
//! The leading push is the EVM script version byte; gas limit and gas
//! price are minimal little-endian script numbers. A CALL targets an
//! existing contract by its 20-byte address; a CREATE deploys the pushed
//! bytecode as a new contract.

use fvm_script::opcodes::{OP_CALL, OP_CREATE};
use fvm_script::{script_num, Script};

use crate::TransactionError;

/// The EVM script version byte pushed at the start of contract scripts.
const CONTRACT_VERSION: u8 = 0x04;

/// Size of a contract address in bytes.
const CONTRACT_ADDRESS_LEN: usize = 20;

/// A decoded (or to-be-encoded) contract output script.
///
/// `contract_address` is present for CALL scripts and absent for CREATE
/// scripts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractScript {
    /// Maximum gas units the contract execution may consume.
    pub gas_limit: u64,
    /// Price per gas unit in the smallest currency unit.
    pub gas_price: u64,
    /// ABI-encoded call data for CALL, or EVM bytecode for CREATE.
    pub calldata: Vec<u8>,
    /// Target contract address; `None` for contract creation.
    pub contract_address: Option<[u8; CONTRACT_ADDRESS_LEN]>,
}

impl ContractScript {
    /// Describe a call to an existing contract.
    ///
    /// # Arguments
    /// * `calldata` - ABI-encoded call data.
    /// * `gas_price` - Price per gas unit.
    /// * `gas_limit` - Maximum gas units.
    /// * `contract_address` - The 20-byte target contract address.
    ///
    /// # Returns
    /// A `ContractScript` tagged as a CALL.
    pub fn call(
        calldata: Vec<u8>,
        gas_price: u64,
        gas_limit: u64,
        contract_address: [u8; CONTRACT_ADDRESS_LEN],
    ) -> Self {
        ContractScript {
            gas_limit,
            gas_price,
            calldata,
            contract_address: Some(contract_address),
        }
    }

    /// Describe the creation of a new contract from bytecode.
    ///
    /// # Arguments
    /// * `bytecode` - The EVM bytecode to deploy.
    /// * `gas_price` - Price per gas unit.
    /// * `gas_limit` - Maximum gas units.
    ///
    /// # Returns
    /// A `ContractScript` tagged as a CREATE.
    pub fn create(bytecode: Vec<u8>, gas_price: u64, gas_limit: u64) -> Self {
        ContractScript {
            gas_limit,
            gas_price,
            calldata: bytecode,
            contract_address: None,
        }
    }

    /// Whether this script deploys a new contract (no target address).
    ///
    /// # Returns
    /// `true` for CREATE scripts.
    pub fn is_create(&self) -> bool {
        self.contract_address.is_none()
    }

    /// The total gas budget: `gas_price * gas_limit`.
    ///
    /// Saturates at `u64::MAX` on overflow.
    ///
    /// # Returns
    /// The gas budget in smallest units.
    pub fn gas_budget(&self) -> u64 {
        self.gas_price.saturating_mul(self.gas_limit)
    }

    /// Encode this contract description into an output script.
    ///
    /// # Returns
    /// The encoded `Script`, or an error if a push fails.
    pub fn to_script(&self) -> Result<Script, TransactionError> {
        let mut script = Script::new();
        script.append_push_data(&[CONTRACT_VERSION])?;
        script.append_push_data(&script_num::encode(self.gas_limit as i64))?;
        script.append_push_data(&script_num::encode(self.gas_price as i64))?;
        script.append_push_data(&self.calldata)?;

        match &self.contract_address {
            Some(address) => {
                script.append_push_data(address)?;
                script.append_opcodes(&[OP_CALL])?;
            }
            None => {
                script.append_opcodes(&[OP_CREATE])?;
            }
        }

        Ok(script)
    }

    /// Decode a contract output script back into its components.
    ///
    /// # Arguments
    /// * `script` - The script to decode.
    ///
    /// # Returns
    /// `Ok(ContractScript)` if the script matches the contract layout, or
    /// an error otherwise.
    pub fn from_script(script: &Script) -> Result<Self, TransactionError> {
        let chunks = script.chunks()?;
        if chunks.len() < 5 {
            return Err(fvm_script::ScriptError::NotContract.into());
        }

        let tail_op = chunks[chunks.len() - 1].op;
        let is_create = match tail_op {
            OP_CREATE => true,
            OP_CALL => false,
            _ => return Err(fvm_script::ScriptError::NotContract.into()),
        };

        if chunks[0].data.as_deref() != Some(&[CONTRACT_VERSION]) {
            return Err(fvm_script::ScriptError::NotContract.into());
        }

        let gas_limit = script_num::decode(&push_bytes(&chunks[1]))? as u64;
        let gas_price = script_num::decode(&push_bytes(&chunks[2]))? as u64;
        let calldata = push_bytes(&chunks[3]);

        let contract_address = if is_create {
            if chunks.len() != 5 {
                return Err(fvm_script::ScriptError::NotContract.into());
            }
            None
        } else {
            if chunks.len() != 6 {
                return Err(fvm_script::ScriptError::NotContract.into());
            }
            let address_bytes = push_bytes(&chunks[4]);
            if address_bytes.len() != CONTRACT_ADDRESS_LEN {
                return Err(fvm_script::ScriptError::NotContract.into());
            }
            let mut address = [0u8; CONTRACT_ADDRESS_LEN];
            address.copy_from_slice(&address_bytes);
            Some(address)
        };

        Ok(ContractScript {
            gas_limit,
            gas_price,
            calldata,
            contract_address,
        })
    }
}

/// The pushed bytes of a chunk; a bare OP_0 push reads as empty data.
fn push_bytes(chunk: &fvm_script::ScriptChunk) -> Vec<u8> {
    chunk.data.clone().unwrap_or_default()
}
