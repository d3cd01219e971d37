//! Deployment config file with one profile per network

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// One named entry of the deployment config file. Other keys, such as the
/// data contract address, are ignored.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    pub url: String,
    pub app_address: String,
}

/// Profiles keyed by network name, e.g. `localhost`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct NetworkProfiles(HashMap<String, NetworkProfile>);

impl NetworkProfiles {
    pub fn parse(path: &str, content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::parse(&display, &content)
    }

    pub fn get(&self, name: &str) -> Option<&NetworkProfile> {
        self.0.get(name)
    }
}

/// Deployment configs record the node's HTTP URL; subscriptions need the
/// websocket endpoint on the same host.
pub fn websocket_url(url: &str) -> String {
    let url = url.trim();
    if let Some(rest) = url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_truffle_style_profiles() {
        let content = r#"{
            "localhost": {
                "url": "http://localhost:8545",
                "dataAddress": "0x345cA3e014Aaf5dcA488057592ee47305D9B3e10",
                "appAddress": "0xf25186B5081Ff5cE73482AD761DB0eB0d25abfBF"
            }
        }"#;
        let profiles = NetworkProfiles::parse("config.json", content).unwrap();
        let localhost = profiles.get("localhost").unwrap();
        assert_eq!(localhost.url, "http://localhost:8545");
        assert_eq!(localhost.app_address, "0xf25186B5081Ff5cE73482AD761DB0eB0d25abfBF");
        assert!(profiles.get("rinkeby").is_none());
    }

    #[test]
    fn rejects_malformed_profiles() {
        let err = NetworkProfiles::parse("config.json", r#"{"localhost": {"url": 1}}"#);
        assert!(matches!(err, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn converts_http_urls_to_websocket() {
        assert_eq!(websocket_url("http://localhost:8545"), "ws://localhost:8545");
        assert_eq!(websocket_url("https://node.example.org"), "wss://node.example.org");
        assert_eq!(websocket_url("ws://127.0.0.1:7545"), "ws://127.0.0.1:7545");
    }
}
