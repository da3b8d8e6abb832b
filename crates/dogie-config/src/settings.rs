//! `dogie.toml` handling.
//!
//! Every section is optional. A missing file yields the defaults.
//!
//! ```toml
//! [tool]
//! rpc_url = "http://127.0.0.1:8545"
//! confirmations = 6
//!
//! [networks.11155111]
//! mint_fee = "20000000000000000"
//! eth_usd_price_feed = "0x694AA1769357215DE4FAC081bf1f309aDC325306"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use dogie_types::ChainId;

use crate::{ConfigError, Result};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dogie.toml";

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "DOGIE_CONFIG";

/// Complete tool configuration.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DogieConfig {
    /// Tool settings.
    #[serde(default)]
    pub tool: ToolConfig,
    /// Network overrides keyed by chain id.
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    #[serde(default)]
    pub networks: BTreeMap<ChainId, NetworkOverride>,
}

/// Paths, endpoints and timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Network selected when none is given on the command line.
    #[serde(default = "default_network")]
    pub network: String,
    /// JSON-RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Compiled contract artifacts (Hardhat `artifacts/` or Foundry `out/`).
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
    /// Per-chain deployment records.
    #[serde(default = "default_deployments_dir")]
    pub deployments_dir: PathBuf,
    /// Persisted token URI list.
    #[serde(default = "default_token_uris_path")]
    pub token_uris_path: PathBuf,
    /// Breed images uploaded by `dogie upload`.
    #[serde(default = "default_random_images_dir")]
    pub random_images_dir: PathBuf,
    /// `frown.svg` and `happy.svg` for the dynamic NFT.
    #[serde(default = "default_dynamic_images_dir")]
    pub dynamic_images_dir: PathBuf,
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Blocks to wait after a transaction is mined.
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
    /// Bound on waiting for a VRF fulfilment.
    #[serde(default = "default_fulfilment_timeout")]
    pub fulfilment_timeout_secs: u64,
    /// Bound on waiting for a single transaction receipt.
    #[serde(default = "default_tx_timeout")]
    pub tx_timeout_secs: u64,
    /// Pinata API base URL.
    #[serde(default = "default_pinata_api_url")]
    pub pinata_api_url: String,
}

/// Raw per-network override as written in the config file.
///
/// Large numbers are decimal strings so they survive TOML's i64 integers.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkOverride {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vrf_coordinator: Option<String>,
    #[serde(default)]
    pub key_hash: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub callback_gas_limit: Option<u32>,
    #[serde(default)]
    pub mint_fee: Option<String>,
    #[serde(default)]
    pub eth_usd_price_feed: Option<String>,
}

// Default value functions

fn default_network() -> String {
    "localhost".to_string()
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_deployments_dir() -> PathBuf {
    PathBuf::from("deployments")
}

fn default_token_uris_path() -> PathBuf {
    PathBuf::from(dogie_types::token_uris::DEFAULT_PATH)
}

fn default_random_images_dir() -> PathBuf {
    PathBuf::from("images/randomNft")
}

fn default_dynamic_images_dir() -> PathBuf {
    PathBuf::from("images/dynamicNft")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_confirmations() -> usize {
    1
}

fn default_fulfilment_timeout() -> u64 {
    300
}

fn default_tx_timeout() -> u64 {
    120
}

fn default_pinata_api_url() -> String {
    "https://api.pinata.cloud".to_string()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            rpc_url: default_rpc_url(),
            artifacts_dir: default_artifacts_dir(),
            deployments_dir: default_deployments_dir(),
            token_uris_path: default_token_uris_path(),
            random_images_dir: default_random_images_dir(),
            dynamic_images_dir: default_dynamic_images_dir(),
            log_level: default_log_level(),
            confirmations: default_confirmations(),
            fulfilment_timeout_secs: default_fulfilment_timeout(),
            tx_timeout_secs: default_tx_timeout(),
            pinata_api_url: default_pinata_api_url(),
        }
    }
}

impl ToolConfig {
    pub fn fulfilment_timeout(&self) -> Duration {
        Duration::from_secs(self.fulfilment_timeout_secs)
    }

    pub fn tx_timeout(&self) -> Duration {
        Duration::from_secs(self.tx_timeout_secs)
    }
}

impl DogieConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `$DOGIE_CONFIG` or `./dogie.toml`
    /// is read when present, and the defaults are used when it is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::File {
                        path: path.display().to_string(),
                        reason: "not found".to_string(),
                    });
                }
                path.to_path_buf()
            }
            None => Self::config_path(),
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let config = Self::from_file(&path)?;
        tracing::debug!(
            path = %path.display(),
            overrides = config.networks.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file_error = |reason: String| ConfigError::File {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        toml::from_str(&content).map_err(|e| file_error(e.to_string()))
    }

    /// Config file location: `$DOGIE_CONFIG`, else `./dogie.toml`.
    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DogieConfig::default();
        assert_eq!(config.tool.network, "localhost");
        assert_eq!(config.tool.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.tool.token_uris_path, PathBuf::from("token-uris.json"));
        assert_eq!(config.tool.fulfilment_timeout(), Duration::from_secs(300));
        assert!(config.networks.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = DogieConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let _parsed: DogieConfig = toml::from_str(&toml_str).expect("parse");
    }

    #[test]
    fn test_parse_network_overrides() {
        let config: DogieConfig = toml::from_str(
            r#"
            [tool]
            confirmations = 3

            [networks.11155111]
            mint_fee = "20000000000000000"
            callback_gas_limit = "400000"

            [networks.80002]
            name = "amoy"
            callback_gas_limit = 250000
            "#,
        )
        .expect("parse");

        assert_eq!(config.tool.confirmations, 3);
        assert_eq!(config.tool.rpc_url, "http://127.0.0.1:8545");

        let sepolia = &config.networks[&11155111];
        assert_eq!(sepolia.mint_fee.as_deref(), Some("20000000000000000"));
        assert_eq!(sepolia.callback_gas_limit, Some(400000));
        assert!(sepolia.name.is_none());

        let amoy = &config.networks[&80002];
        assert_eq!(amoy.name.as_deref(), Some("amoy"));
        assert_eq!(amoy.callback_gas_limit, Some(250000));
    }

    #[test]
    fn test_load_explicit_missing() {
        let dir = temp_dir::TempDir::new().expect("temp dir");
        let err = DogieConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::File { .. }));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = temp_dir::TempDir::new().expect("temp dir");
        let path = dir.path().join("dogie.toml");
        std::fs::write(&path, "[tool]\nnetwork = \"sepolia\"\n").expect("write");
        let config = DogieConfig::load(Some(&path)).expect("load");
        assert_eq!(config.tool.network, "sepolia");
    }

    #[test]
    fn test_malformed_file() {
        let dir = temp_dir::TempDir::new().expect("temp dir");
        let path = dir.path().join("dogie.toml");
        std::fs::write(&path, "[tool\nnetwork = 1").expect("write");
        assert!(matches!(
            DogieConfig::from_file(&path).unwrap_err(),
            ConfigError::File { .. }
        ));
    }
}
