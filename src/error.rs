//! Error types for the oracle server

use ethers::contract::ContractError;
use ethers::providers::{Middleware, ProviderError};
use thiserror::Error;

use crate::models::TxHash;

/// Failures talking to the node or decoding what it returned.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("node request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("contract call failed: {0}")]
    Contract(String),

    #[error("failed to decode node response: {0}")]
    Decode(String),

    #[error("abi error: {0}")]
    Abi(String),

    #[error("transaction {tx_hash:?} reverted")]
    Reverted { tx_hash: TxHash },

    #[error("connection to node closed")]
    ConnectionClosed,
}

impl<M: Middleware> From<ContractError<M>> for ChainError {
    fn from(err: ContractError<M>) -> Self {
        ChainError::Contract(err.to_string())
    }
}

/// Failures while assembling [`crate::config::OracleConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
