#![deny(missing_docs)]

//! FVM SDK - Complete SDK.
//!
//! Re-exports all FVM SDK components for convenient single-crate usage.

pub use fvm_account as account;
pub use fvm_builder as builder;
pub use fvm_message as message;
pub use fvm_primitives as primitives;
pub use fvm_script as script;
pub use fvm_transaction as transaction;
