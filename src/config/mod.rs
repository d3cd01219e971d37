//! Runtime configuration
//!
//! Settings come from a named network profile in the deployment config file
//! and may be overridden from the environment (a `.env` file is honoured).

pub mod network;

use std::path::Path;

use crate::error::ConfigError;
use crate::models::Address;

pub use network::{websocket_url, NetworkProfile, NetworkProfiles};

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_NETWORK: &str = "localhost";
pub const DEFAULT_ORACLE_CAP: usize = 20;
pub const DEFAULT_GAS_LIMIT: u64 = 5_000_000;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8000";

#[derive(Clone, Debug)]
pub struct OracleConfig {
    /// Websocket endpoint of the node.
    pub node_url: String,
    pub app_address: Address,
    /// Maximum number of accounts registered as oracles.
    pub oracle_cap: usize,
    /// Gas limit attached to every transaction.
    pub gas_limit: u64,
    /// First block replayed by the event subscriptions.
    pub from_block: u64,
    /// Submit simulated responses for every live `OracleRequest`. Off unless
    /// set, so the process only logs like a plain listener.
    pub auto_respond: bool,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl OracleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network = lookup("ORACLE_NETWORK").unwrap_or_else(|| DEFAULT_NETWORK.to_string());

        let profile = match lookup("ORACLE_CONFIG_FILE") {
            Some(path) => NetworkProfiles::load(Path::new(&path))?
                .get(&network)
                .cloned(),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    NetworkProfiles::load(path)?.get(&network).cloned()
                } else {
                    None
                }
            }
        };

        let node_url = lookup("ORACLE_NODE_URL")
            .or_else(|| profile.as_ref().map(|p| p.url.clone()))
            .ok_or(ConfigError::Missing("ORACLE_NODE_URL"))?;

        let app_address = lookup("ORACLE_APP_ADDRESS")
            .or_else(|| profile.as_ref().map(|p| p.app_address.clone()))
            .ok_or(ConfigError::Missing("ORACLE_APP_ADDRESS"))?;
        let app_address = app_address
            .parse::<Address>()
            .map_err(|_| ConfigError::Invalid {
                key: "ORACLE_APP_ADDRESS",
                value: app_address.clone(),
            })?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            node_url: websocket_url(&node_url),
            app_address,
            oracle_cap: parse_or(&lookup, "ORACLE_CAP", DEFAULT_ORACLE_CAP)?,
            gas_limit: parse_or(&lookup, "ORACLE_GAS_LIMIT", DEFAULT_GAS_LIMIT)?,
            from_block: parse_or(&lookup, "ORACLE_FROM_BLOCK", 0)?,
            auto_respond: parse_or(&lookup, "ORACLE_AUTO_RESPOND", false)?,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            cors_allowed_origins,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
