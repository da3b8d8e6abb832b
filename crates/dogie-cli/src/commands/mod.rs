//! Subcommand handlers.
//!
//! Handlers print operator-facing results to stdout and log progress.

pub mod deploy;
pub mod mint;
pub mod networks;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use ethers::types::{Address, U256};

use dogie_config::network::DEV_PRIVATE_KEY;
use dogie_config::{ActiveNetwork, DogieConfig};
use dogie_contracts::client::chain_id;
use dogie_contracts::{connect, ArtifactStore, Shutdown, SignerClient, TxSettings};
use dogie_deploy::DeploymentRecord;

/// Settings resolved for a network-bound command.
pub struct Context {
    pub config: DogieConfig,
    pub network: ActiveNetwork,
    pub rpc_url: String,
    pub private_key: Option<String>,
    pub artifacts_dir: PathBuf,
    pub shutdown: Shutdown,
}

impl Context {
    pub fn tx_settings(&self) -> TxSettings {
        TxSettings {
            confirmations: self.config.tool.confirmations,
            timeout: self.config.tool.tx_timeout(),
        }
    }

    pub fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::new(self.artifacts_dir.clone())
    }

    /// Signing key: the explicit one, or the first local account on a
    /// development network.
    fn signing_key(&self) -> anyhow::Result<&str> {
        match self.private_key.as_deref() {
            Some(key) => Ok(key),
            None if self.network.development => Ok(DEV_PRIVATE_KEY),
            None => bail!(
                "no private key for {}; set PRIVATE_KEY or pass --private-key",
                self.network.name()
            ),
        }
    }

    /// Connect and verify the node serves the selected chain.
    pub async fn connect(&self) -> anyhow::Result<Arc<SignerClient>> {
        let client = connect(&self.rpc_url, self.signing_key()?).await?;
        self.network.check_chain_id(chain_id(&client))?;
        Ok(client)
    }

    pub fn record(&self) -> anyhow::Result<DeploymentRecord> {
        Ok(DeploymentRecord::load(
            &self.config.tool.deployments_dir,
            self.network.chain_id(),
        )?)
    }

    /// Address of a deployed contract: the explicit one, else the
    /// deployment record of this chain.
    pub fn deployed_address(
        &self,
        explicit: Option<Address>,
        contract: &str,
        env: &str,
    ) -> anyhow::Result<Address> {
        if let Some(address) = explicit {
            return Ok(address);
        }
        self.record()?.find_contract(contract).with_context(|| {
            format!(
                "no {contract} address for {}; set {env} or run `dogie deploy` first",
                self.network.name()
            )
        })
    }
}

/// Parse a decimal wei amount.
pub fn parse_wei(value: &str) -> anyhow::Result<U256> {
    U256::from_dec_str(value.trim()).with_context(|| format!("invalid wei amount {value:?}"))
}

#[cfg(test)]
mod tests {
    use dogie_config::NetworkTable;
    use dogie_deploy::DeploymentOutcome;

    use super::*;

    fn context(network: &str, deployments: &std::path::Path) -> Context {
        let mut config = DogieConfig::default();
        config.tool.deployments_dir = deployments.to_path_buf();
        Context {
            network: NetworkTable::builtin()
                .expect("table")
                .resolve(network)
                .expect("network"),
            rpc_url: config.tool.rpc_url.clone(),
            private_key: None,
            artifacts_dir: config.tool.artifacts_dir.clone(),
            config,
            shutdown: Shutdown::new(),
        }
    }

    #[test]
    fn test_dev_network_uses_local_key() {
        let dir = temp_dir::TempDir::new().expect("temp dir");
        let ctx = context("localhost", dir.path());
        assert_eq!(ctx.signing_key().expect("key"), DEV_PRIVATE_KEY);
    }

    #[test]
    fn test_live_network_requires_key() {
        let dir = temp_dir::TempDir::new().expect("temp dir");
        let mut ctx = context("sepolia", dir.path());
        assert!(ctx.signing_key().is_err());

        ctx.private_key = Some("0x01".to_string());
        assert_eq!(ctx.signing_key().expect("key"), "0x01");
    }

    #[test]
    fn test_deployed_address_lookup() {
        let dir = temp_dir::TempDir::new().expect("temp dir");
        let ctx = context("localhost", dir.path());
        assert!(ctx
            .deployed_address(None, "BasicNft", "BASIC_NFT_ADDRESS")
            .is_err());

        let recorded = Address::from_low_u64_be(0xb0);
        let mut record = DeploymentRecord::default();
        record.merge(&DeploymentOutcome {
            module: "BasicNftModule".to_string(),
            addresses: [("BasicNftModule#BasicNft".to_string(), recorded)].into(),
            ..Default::default()
        });
        record.save(dir.path(), 31337).expect("save");
        assert_eq!(
            ctx.deployed_address(None, "BasicNft", "BASIC_NFT_ADDRESS")
                .expect("recorded"),
            recorded
        );

        let explicit = Address::from_low_u64_be(0xe0);
        assert_eq!(
            ctx.deployed_address(Some(explicit), "BasicNft", "BASIC_NFT_ADDRESS")
                .expect("explicit"),
            explicit
        );
    }

    #[test]
    fn test_parse_wei() {
        assert_eq!(
            parse_wei("10000000000000000").expect("wei"),
            U256::from(10_000_000_000_000_000u64)
        );
        assert!(parse_wei("0.01").is_err());
        assert!(parse_wei("0x10").is_err());
    }
}
