//! Integration test crate for dogie.
//!
//! `pipeline_to_plan` runs offline. The contract suites need a local `anvil`
//! binary and compiled contract artifacts (`DOGIE_ARTIFACTS_DIR`, default
//! `./artifacts`):
//! ```sh
//! cargo test -p dogie-integration-tests -- --ignored
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ethers::types::Address;
use ethers::utils::{Anvil, AnvilInstance};

use dogie_config::{ActiveNetwork, NetworkTable};
use dogie_contracts::{connect, ArtifactStore, SignerClient, TxSettings};
use dogie_deploy::{execute_plan, DeploymentOutcome, DeploymentPlan, EthersDeployer, VariantImages};
use dogie_types::TokenUriList;

/// Token URIs used by the randomized NFT suites.
pub const SAMPLE_URIS: [&str; 3] = [
    "ipfs://QmPugHash",
    "ipfs://QmShibaHash",
    "ipfs://QmStBernardHash",
];

pub const LOW_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><text>frown</text></svg>"#;
pub const HIGH_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><text>happy</text></svg>"#;

pub fn sample_token_uris() -> anyhow::Result<TokenUriList> {
    Ok(TokenUriList::new(
        SAMPLE_URIS.iter().map(|uri| uri.to_string()).collect(),
    )?)
}

pub fn sample_images() -> VariantImages {
    VariantImages {
        low: LOW_SVG.to_string(),
        high: HIGH_SVG.to_string(),
    }
}

/// Artifact directory for the contract suites.
pub fn artifacts_dir() -> PathBuf {
    std::env::var("DOGIE_ARTIFACTS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("artifacts"))
}

/// A fresh Anvil node with a client signing as account #0.
pub struct Devnet {
    /// Kept alive for the duration of the test; the node stops on drop.
    pub anvil: AnvilInstance,
    pub client: Arc<SignerClient>,
    pub network: ActiveNetwork,
    pub tx: TxSettings,
}

impl Devnet {
    pub async fn start() -> anyhow::Result<Self> {
        let anvil = Anvil::new().spawn();
        let key = anvil
            .keys()
            .first()
            .map(|key| hex::encode(key.to_bytes()))
            .ok_or_else(|| anyhow::anyhow!("anvil reported no accounts"))?;
        let client = connect(&anvil.endpoint(), &key).await?;
        let network = NetworkTable::builtin()?.resolve("anvil")?;
        network.check_chain_id(anvil.chain_id())?;

        Ok(Self {
            anvil,
            client,
            network,
            tx: TxSettings {
                confirmations: 1,
                timeout: Duration::from_secs(30),
            },
        })
    }

    /// Client signing as another Anvil account.
    pub async fn client_for(&self, index: usize) -> anyhow::Result<Arc<SignerClient>> {
        let key = self
            .anvil
            .keys()
            .get(index)
            .map(|key| hex::encode(key.to_bytes()))
            .ok_or_else(|| anyhow::anyhow!("no anvil account {index}"))?;
        Ok(connect(&self.anvil.endpoint(), &key).await?)
    }

    pub fn account(&self) -> Address {
        dogie_contracts::client::account(&self.client)
    }

    pub async fn deploy(&self, plan: &DeploymentPlan) -> anyhow::Result<DeploymentOutcome> {
        let deployer = EthersDeployer::new(
            self.client.clone(),
            ArtifactStore::new(artifacts_dir()),
            self.tx,
        );
        Ok(execute_plan(plan, &deployer).await?)
    }
}

/// Address of `contract` in an outcome.
pub fn address_of(outcome: &DeploymentOutcome, contract: &str) -> anyhow::Result<Address> {
    outcome
        .address_of(contract)
        .ok_or_else(|| anyhow::anyhow!("{contract} was not deployed by {}", outcome.module))
}
