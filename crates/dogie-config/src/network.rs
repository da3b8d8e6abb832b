//! Network profiles.
//!
//! Each supported chain has a [`NetworkProfile`] with the parameters the
//! deployment modules pass to the contract constructors. Development networks
//! (a local Hardhat or Anvil node) replace the VRF coordinator and the price
//! feed with mocks, so those fields are only required elsewhere.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::str::FromStr;

use ethers::types::{Address, H256, U256};
use serde::Serialize;

use dogie_types::ChainId;

use crate::settings::{DogieConfig, NetworkOverride};
use crate::{ConfigError, Result};

/// Network names treated as development networks.
pub const DEVELOPMENT_NETWORKS: &[&str] = &["hardhat", "localhost", "anvil"];

/// Chain id of a local Hardhat or Anvil node.
pub const LOCAL_CHAIN_ID: ChainId = 31337;

/// Hardhat/Anvil default account #0. Only used on development networks.
pub const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Deployment parameters of one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkProfile {
    pub chain_id: ChainId,
    pub name: String,
    /// VRF v2.5 coordinator.
    pub vrf_coordinator: Option<Address>,
    /// VRF gas lane.
    pub key_hash: Option<H256>,
    /// VRF subscription funding the requests.
    pub subscription_id: Option<U256>,
    /// Gas bound of the fulfilment callback.
    pub callback_gas_limit: Option<u32>,
    /// Minimum payment for a random mint, in wei.
    pub mint_fee: Option<U256>,
    /// ETH/USD price feed.
    pub eth_usd_price_feed: Option<Address>,
}

impl NetworkProfile {
    fn empty(chain_id: ChainId, name: &str) -> Self {
        Self {
            chain_id,
            name: name.to_string(),
            vrf_coordinator: None,
            key_hash: None,
            subscription_id: None,
            callback_gas_limit: None,
            mint_fee: None,
            eth_usd_price_feed: None,
        }
    }

    fn missing(&self, field: &'static str) -> ConfigError {
        ConfigError::MissingField {
            chain_id: self.chain_id,
            network: self.name.clone(),
            field,
        }
    }

    pub fn require_vrf_coordinator(&self) -> Result<Address> {
        self.vrf_coordinator
            .ok_or_else(|| self.missing("vrf_coordinator"))
    }

    pub fn require_key_hash(&self) -> Result<H256> {
        self.key_hash.ok_or_else(|| self.missing("key_hash"))
    }

    pub fn require_subscription_id(&self) -> Result<U256> {
        self.subscription_id
            .ok_or_else(|| self.missing("subscription_id"))
    }

    pub fn require_callback_gas_limit(&self) -> Result<u32> {
        self.callback_gas_limit
            .ok_or_else(|| self.missing("callback_gas_limit"))
    }

    pub fn require_mint_fee(&self) -> Result<U256> {
        self.mint_fee.ok_or_else(|| self.missing("mint_fee"))
    }

    pub fn require_price_feed(&self) -> Result<Address> {
        self.eth_usd_price_feed
            .ok_or_else(|| self.missing("eth_usd_price_feed"))
    }

    /// Apply a config file override on top of this profile.
    pub fn apply(&mut self, raw: &NetworkOverride) -> Result<()> {
        let chain_id = self.chain_id;
        if let Some(name) = &raw.name {
            self.name = name.clone();
        }
        if let Some(value) = &raw.vrf_coordinator {
            self.vrf_coordinator = Some(parse_hex(chain_id, "vrf_coordinator", value)?);
        }
        if let Some(value) = &raw.key_hash {
            self.key_hash = Some(parse_hex(chain_id, "key_hash", value)?);
        }
        if let Some(value) = &raw.subscription_id {
            self.subscription_id = Some(parse_decimal(chain_id, "subscription_id", value)?);
        }
        if let Some(limit) = raw.callback_gas_limit {
            self.callback_gas_limit = Some(limit);
        }
        if let Some(value) = &raw.mint_fee {
            self.mint_fee = Some(parse_decimal(chain_id, "mint_fee", value)?);
        }
        if let Some(value) = &raw.eth_usd_price_feed {
            self.eth_usd_price_feed = Some(parse_hex(chain_id, "eth_usd_price_feed", value)?);
        }
        Ok(())
    }
}

fn parse_hex<T>(chain_id: ChainId, field: &'static str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let digits = value.strip_prefix("0x").unwrap_or(value);
    T::from_str(digits).map_err(|e| ConfigError::InvalidField {
        chain_id,
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_decimal(chain_id: ChainId, field: &'static str, value: &str) -> Result<U256> {
    U256::from_dec_str(value).map_err(|e| ConfigError::InvalidField {
        chain_id,
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn builtin_profiles() -> Result<Vec<NetworkProfile>> {
    let mut sepolia = NetworkProfile::empty(11155111, "sepolia");
    sepolia.apply(&NetworkOverride {
        vrf_coordinator: Some("0x9DdfaCa8183c41ad55329BdeeD9F6A8d53168B1B".to_string()),
        key_hash: Some(
            "0x787d74caea10b2b357790d5b5247c2f63d1d91572a9846f780606e4d953677ae".to_string(),
        ),
        subscription_id: Some(
            "87493399841768530621857160339541952434275371257915447427041707750846371254941"
                .to_string(),
        ),
        callback_gas_limit: Some(500_000),
        mint_fee: Some("10000000000000000".to_string()),
        eth_usd_price_feed: Some("0x694AA1769357215DE4FAC081bf1f309aDC325306".to_string()),
        ..Default::default()
    })?;

    let mut localhost = NetworkProfile::empty(LOCAL_CHAIN_ID, "localhost");
    localhost.apply(&NetworkOverride {
        key_hash: Some(
            "0x6c3699283bda56ad74f6b855546325b68d482e983852a7e34c2d6a8c3f0a5e2a".to_string(),
        ),
        subscription_id: Some("1".to_string()),
        callback_gas_limit: Some(500_000),
        mint_fee: Some("10000000000000000".to_string()),
        ..Default::default()
    })?;

    let mut mainnet = NetworkProfile::empty(1, "mainnet");
    mainnet.apply(&NetworkOverride {
        eth_usd_price_feed: Some("0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419".to_string()),
        ..Default::default()
    })?;

    Ok(vec![sepolia, localhost, mainnet])
}

/// Immutable chain id → profile table.
#[derive(Debug, Clone)]
pub struct NetworkTable {
    profiles: BTreeMap<ChainId, NetworkProfile>,
}

impl NetworkTable {
    /// The built-in profiles: sepolia, localhost and mainnet.
    pub fn builtin() -> Result<Self> {
        let profiles = builtin_profiles()?
            .into_iter()
            .map(|profile| (profile.chain_id, profile))
            .collect();
        Ok(Self { profiles })
    }

    /// Built-in profiles with the config file overrides applied.
    ///
    /// An override for an unknown chain id adds a network; it then needs a
    /// `name`.
    pub fn from_config(config: &DogieConfig) -> Result<Self> {
        let mut table = Self::builtin()?;
        for (&chain_id, raw) in &config.networks {
            let profile = match table.profiles.entry(chain_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let name = raw.name.as_deref().ok_or(ConfigError::InvalidField {
                        chain_id,
                        field: "name",
                        value: String::new(),
                        reason: "a network added by the config file needs a name".to_string(),
                    })?;
                    entry.insert(NetworkProfile::empty(chain_id, name))
                }
            };
            profile.apply(raw)?;
            tracing::debug!(chain_id, network = %profile.name, "applied network override");
        }
        Ok(table)
    }

    pub fn get(&self, chain_id: ChainId) -> Option<&NetworkProfile> {
        self.profiles.get(&chain_id)
    }

    pub fn by_name(&self, name: &str) -> Option<&NetworkProfile> {
        self.profiles.values().find(|profile| profile.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkProfile> {
        self.profiles.values()
    }

    /// Resolve a network name or numeric chain id.
    ///
    /// A development name without a profile of its own (`hardhat`, `anvil`)
    /// uses the local chain profile under that name.
    pub fn resolve(&self, name_or_id: &str) -> Result<ActiveNetwork> {
        if let Ok(chain_id) = name_or_id.parse::<ChainId>() {
            let profile = self
                .get(chain_id)
                .ok_or_else(|| ConfigError::UnknownNetwork(name_or_id.to_string()))?;
            return Ok(ActiveNetwork::new(profile.clone()));
        }

        if let Some(profile) = self.by_name(name_or_id) {
            return Ok(ActiveNetwork::new(profile.clone()));
        }

        if is_development(name_or_id) {
            let mut profile = self
                .get(LOCAL_CHAIN_ID)
                .cloned()
                .unwrap_or_else(|| NetworkProfile::empty(LOCAL_CHAIN_ID, name_or_id));
            profile.name = name_or_id.to_string();
            return Ok(ActiveNetwork::new(profile));
        }

        Err(ConfigError::UnknownNetwork(name_or_id.to_string()))
    }
}

/// Whether a network name denotes a development network.
pub fn is_development(name: &str) -> bool {
    DEVELOPMENT_NETWORKS.contains(&name)
}

/// Where a contract dependency comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    /// Use the configured address.
    Configured(Address),
    /// Deploy a local mock first.
    DeployMock,
}

/// The network a command runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNetwork {
    pub profile: NetworkProfile,
    pub development: bool,
}

impl ActiveNetwork {
    pub fn new(profile: NetworkProfile) -> Self {
        let development = is_development(&profile.name);
        Self {
            profile,
            development,
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.profile.chain_id
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// VRF coordinator source: a mock on development networks.
    pub fn vrf_coordinator(&self) -> Result<Dependency> {
        if self.development {
            return Ok(Dependency::DeployMock);
        }
        self.profile
            .require_vrf_coordinator()
            .map(Dependency::Configured)
    }

    /// Price feed source: a mock on development networks.
    pub fn price_feed(&self) -> Result<Dependency> {
        if self.development {
            return Ok(Dependency::DeployMock);
        }
        self.profile.require_price_feed().map(Dependency::Configured)
    }

    /// Fail unless the RPC endpoint serves this network's chain.
    pub fn check_chain_id(&self, actual: ChainId) -> Result<()> {
        if actual != self.chain_id() {
            return Err(ConfigError::ChainMismatch {
                network: self.name().to_string(),
                expected: self.chain_id(),
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> NetworkTable {
        NetworkTable::builtin().expect("builtin table")
    }

    #[test]
    fn test_builtin_sepolia() {
        let table = table();
        let sepolia = table.get(11155111).expect("sepolia");
        assert_eq!(sepolia.name, "sepolia");
        assert_eq!(sepolia.callback_gas_limit, Some(500_000));
        assert_eq!(
            sepolia.mint_fee,
            Some(U256::from(10_000_000_000_000_000u64))
        );
        assert_eq!(
            sepolia.require_vrf_coordinator().expect("coordinator"),
            "0x9DdfaCa8183c41ad55329BdeeD9F6A8d53168B1B"
                .parse::<Address>()
                .expect("address")
        );
        assert!(sepolia.subscription_id.expect("subscription") > U256::from(u128::MAX));
    }

    #[test]
    fn test_resolve_by_name_and_id() {
        let table = table();
        let by_name = table.resolve("sepolia").expect("by name");
        let by_id = table.resolve("11155111").expect("by id");
        assert_eq!(by_name, by_id);
        assert!(!by_name.development);
    }

    #[test]
    fn test_development_aliases() {
        let table = table();
        for name in DEVELOPMENT_NETWORKS {
            let active = table.resolve(name).expect("dev network");
            assert!(active.development);
            assert_eq!(active.chain_id(), LOCAL_CHAIN_ID);
            assert_eq!(active.name(), *name);
        }
    }

    #[test]
    fn test_unknown_network() {
        let err = table().resolve("goerli").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNetwork(_)));
        assert!(table().resolve("5").is_err());
    }

    #[test]
    fn test_development_synthesizes_mocks() {
        let local = table().resolve("localhost").expect("localhost");
        assert!(local.profile.vrf_coordinator.is_none());
        assert_eq!(local.vrf_coordinator().expect("vrf"), Dependency::DeployMock);
        assert_eq!(local.price_feed().expect("feed"), Dependency::DeployMock);
    }

    #[test]
    fn test_missing_price_feed_fails() {
        let mut profile = table().get(11155111).cloned().expect("sepolia");
        profile.eth_usd_price_feed = None;
        let active = ActiveNetwork::new(profile);

        let err = active.price_feed().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                chain_id: 11155111,
                field: "eth_usd_price_feed",
                ..
            }
        ));
    }

    #[test]
    fn test_mainnet_has_no_coordinator() {
        let mainnet = table().resolve("mainnet").expect("mainnet");
        assert!(matches!(
            mainnet.price_feed().expect("feed"),
            Dependency::Configured(_)
        ));
        assert!(mainnet.vrf_coordinator().is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = DogieConfig::default();
        config.networks.insert(
            11155111,
            NetworkOverride {
                mint_fee: Some("20000000000000000".to_string()),
                ..Default::default()
            },
        );
        config.networks.insert(
            80002,
            NetworkOverride {
                name: Some("amoy".to_string()),
                eth_usd_price_feed: Some(
                    "0xF0d50568e3A7e8259E16663972b11910F89BD8e7".to_string(),
                ),
                ..Default::default()
            },
        );

        let table = NetworkTable::from_config(&config).expect("table");
        assert_eq!(
            table.get(11155111).and_then(|p| p.mint_fee),
            Some(U256::from(20_000_000_000_000_000u64))
        );
        let amoy = table.resolve("amoy").expect("amoy");
        assert_eq!(amoy.chain_id(), 80002);
        assert!(amoy.price_feed().is_ok());
    }

    #[test]
    fn test_new_network_needs_name() {
        let mut config = DogieConfig::default();
        config.networks.insert(80002, NetworkOverride::default());
        assert!(matches!(
            NetworkTable::from_config(&config).unwrap_err(),
            ConfigError::InvalidField { field: "name", .. }
        ));
    }

    #[test]
    fn test_invalid_override_value() {
        let mut config = DogieConfig::default();
        config.networks.insert(
            1,
            NetworkOverride {
                mint_fee: Some("0x10".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(
            NetworkTable::from_config(&config).unwrap_err(),
            ConfigError::InvalidField { field: "mint_fee", .. }
        ));
    }

    #[test]
    fn test_chain_id_check() {
        let local = table().resolve("localhost").expect("localhost");
        assert!(local.check_chain_id(LOCAL_CHAIN_ID).is_ok());
        assert!(matches!(
            local.check_chain_id(1).unwrap_err(),
            ConfigError::ChainMismatch { expected: 31337, actual: 1, .. }
        ));
    }
}
