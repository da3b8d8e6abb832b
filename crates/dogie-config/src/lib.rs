//! # dogie-config
//!
//! Network parameters and tool settings.
//!
//! The network table is built once at startup from the built-in profiles and
//! the optional `dogie.toml` overrides, then passed by reference to every
//! command. Nothing here is global.
//!
//! ## Modules
//!
//! - [`network`] — network profiles, the network table, the active network
//! - [`settings`] — `dogie.toml` loading and tool settings

pub mod network;
pub mod settings;

pub use network::{ActiveNetwork, Dependency, NetworkProfile, NetworkTable, DEVELOPMENT_NETWORKS};
pub use settings::{DogieConfig, NetworkOverride, ToolConfig};

use dogie_types::ChainId;

/// Error types for configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A parameter the active network needs is not configured.
    #[error("network {network} (chain {chain_id}) has no {field} configured")]
    MissingField {
        /// Chain id of the network.
        chain_id: ChainId,
        /// Network name.
        network: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A configured value could not be parsed.
    #[error("chain {chain_id}: invalid {field} {value:?}: {reason}")]
    InvalidField {
        /// Chain id of the network.
        chain_id: ChainId,
        /// Name of the field.
        field: &'static str,
        /// Raw configured value.
        value: String,
        /// Parse failure.
        reason: String,
    },

    /// No network with this name or chain id.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    /// The node behind the RPC endpoint serves another chain.
    #[error("network {network} expects chain {expected}, RPC endpoint reports {actual}")]
    ChainMismatch {
        /// Network name.
        network: String,
        /// Configured chain id.
        expected: ChainId,
        /// Chain id reported by the node.
        actual: ChainId,
    },

    /// Config file error.
    #[error("config file {path}: {reason}")]
    File {
        /// Path of the config file.
        path: String,
        /// Read or parse failure.
        reason: String,
    },
}

/// Convenience result type for configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;
