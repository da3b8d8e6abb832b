//! Deployed address records.
//!
//! Stored per chain as `deployments/chain-<id>/deployed_addresses.json`,
//! keyed by `Module#Contract`. Each run merges its addresses into the record.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ethers::types::Address;
use serde::{Deserialize, Serialize};

use dogie_types::ChainId;

use crate::execute::DeploymentOutcome;
use crate::Result;

/// File name of a chain's record.
pub const RECORD_FILE: &str = "deployed_addresses.json";

/// `Module#Contract` → address for one chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentRecord {
    addresses: BTreeMap<String, Address>,
}

impl DeploymentRecord {
    /// Path of a chain's record under `deployments_dir`.
    pub fn path(deployments_dir: &Path, chain_id: ChainId) -> PathBuf {
        deployments_dir
            .join(format!("chain-{chain_id}"))
            .join(RECORD_FILE)
    }

    /// Read a chain's record; an absent record is empty.
    pub fn load(deployments_dir: &Path, chain_id: ChainId) -> Result<Self> {
        let path = Self::path(deployments_dir, chain_id);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, deployments_dir: &Path, chain_id: ChainId) -> Result<PathBuf> {
        let path = Self::path(deployments_dir, chain_id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Add the addresses of an outcome, replacing earlier entries.
    pub fn merge(&mut self, outcome: &DeploymentOutcome) {
        for (key, address) in &outcome.addresses {
            self.addresses.insert(key.clone(), *address);
        }
    }

    pub fn get(&self, key: &str) -> Option<Address> {
        self.addresses.get(key).copied()
    }

    /// Address of `contract` from any module.
    pub fn find_contract(&self, contract: &str) -> Option<Address> {
        self.addresses
            .iter()
            .find(|(key, _)| key.rsplit('#').next() == Some(contract))
            .map(|(_, address)| *address)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Address)> {
        self.addresses.iter()
    }
}
