//! Data models for the oracle server

pub mod oracle;

pub use ethers::types::{Address, TxHash, U256};

/// Amount of ether in wei.
pub type Wei = U256;
