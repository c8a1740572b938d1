/// FVM SDK - Script construction, parsing, and address handling.
///
/// Provides the Script type, opcode definitions (including the contract
/// opcodes OP_CREATE and OP_CALL), script chunk parsing, script number
/// encoding for gas parameters, and address generation/validation for
/// both the Base58Check and checksummed-hex encodings.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod script_num;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::{Address, Network};
pub use chunk::ScriptChunk;
