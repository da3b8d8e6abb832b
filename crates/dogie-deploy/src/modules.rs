//! Deployment modules.
//!
//! Each module resolves the constructor arguments for the active network.
//! On development networks the VRF coordinator and the price feed are
//! replaced by mocks deployed in the same plan; elsewhere they must be
//! configured, and a missing value fails here, before any transaction.

use ethers::abi::Token;
use ethers::types::{I256, U256};

use dogie_config::{ActiveNetwork, Dependency};
use dogie_contracts::bindings::names;
use dogie_types::{
    TokenUriList, DEV_SUBSCRIPTION_FUND, INITIAL_PRICE, PRICE_FEED_DECIMALS, VRF_MOCK_BASE_FEE,
    VRF_MOCK_GAS_PRICE_LINK, VRF_MOCK_WEI_PER_UNIT_LINK,
};

use crate::assets::VariantImages;
use crate::plan::{DeploymentPlan, ModuleBuilder, PlanArg};
use crate::Result;

pub const BASIC_NFT_MODULE: &str = "BasicNftModule";
pub const RANDOM_IPFS_NFT_MODULE: &str = "RandomIpfsNftModule";
pub const DYNAMIC_SVG_NFT_MODULE: &str = "DynamicSvgNftModule";

fn uint(value: impl Into<U256>) -> PlanArg {
    PlanArg::Token(Token::Uint(value.into()))
}

fn int(value: I256) -> PlanArg {
    PlanArg::Token(Token::Int(value.into_raw()))
}

/// BasicNft takes no constructor arguments.
pub fn basic_nft_module() -> DeploymentPlan {
    let mut m = ModuleBuilder::new(BASIC_NFT_MODULE);
    m.contract(names::BASIC_NFT, vec![]);
    m.build()
}

/// RandomIpfsNft.
///
/// Constructor: `[coordinator, keyHash, subscriptionId, callbackGasLimit,
/// tokenUris, mintFee]`. On a development network a coordinator mock is
/// deployed, a subscription is created and funded on it, and the NFT is
/// added as its consumer.
pub fn random_ipfs_nft_module(
    network: &ActiveNetwork,
    token_uris: &TokenUriList,
) -> Result<DeploymentPlan> {
    let profile = &network.profile;
    let key_hash = profile.require_key_hash()?;
    let callback_gas_limit = profile.require_callback_gas_limit()?;
    let mint_fee = profile.require_mint_fee()?;
    let coordinator = network.vrf_coordinator()?;

    let mut m = ModuleBuilder::new(RANDOM_IPFS_NFT_MODULE);
    let (coordinator_arg, subscription_arg, mock) = match coordinator {
        Dependency::DeployMock => {
            tracing::info!(network = network.name(), "development network, deploying VRF coordinator mock");
            let mock = m.contract(
                names::VRF_COORDINATOR_MOCK,
                vec![
                    uint(VRF_MOCK_BASE_FEE),
                    uint(VRF_MOCK_GAS_PRICE_LINK),
                    int(I256::from_raw(U256::from(VRF_MOCK_WEI_PER_UNIT_LINK))),
                ],
            );
            let subscription = m.create_subscription(mock);
            m.fund_subscription(mock, subscription, U256::from(DEV_SUBSCRIPTION_FUND));
            (
                PlanArg::Address(mock),
                PlanArg::Subscription(subscription),
                Some((mock, subscription)),
            )
        }
        Dependency::Configured(address) => {
            let subscription_id = profile.require_subscription_id()?;
            tracing::info!(network = network.name(), coordinator = ?address, "using configured VRF coordinator");
            (
                PlanArg::Token(Token::Address(address)),
                uint(subscription_id),
                None,
            )
        }
    };

    let uris = token_uris
        .as_slice()
        .iter()
        .map(|uri| Token::String(uri.clone()))
        .collect();
    let nft = m.contract(
        names::RANDOM_IPFS_NFT,
        vec![
            coordinator_arg,
            PlanArg::Token(Token::FixedBytes(key_hash.as_bytes().to_vec())),
            subscription_arg,
            uint(callback_gas_limit),
            PlanArg::Token(Token::Array(uris)),
            uint(mint_fee),
        ],
    );

    if let Some((mock, subscription)) = mock {
        m.add_consumer(mock, subscription, nft);
    }
    Ok(m.build())
}

/// DynamicSvgNft.
///
/// Constructor: `[priceFeed, lowSvg, highSvg]`. On a development network a
/// `MockV3Aggregator(8, 2000e8)` is deployed as the feed.
pub fn dynamic_svg_nft_module(
    network: &ActiveNetwork,
    images: &VariantImages,
) -> Result<DeploymentPlan> {
    let feed = network.price_feed()?;

    let mut m = ModuleBuilder::new(DYNAMIC_SVG_NFT_MODULE);
    let feed_arg = match feed {
        Dependency::DeployMock => {
            tracing::info!(network = network.name(), "development network, deploying MockV3Aggregator");
            let mock = m.contract(
                names::MOCK_V3_AGGREGATOR,
                vec![uint(PRICE_FEED_DECIMALS), int(I256::from(INITIAL_PRICE))],
            );
            PlanArg::Address(mock)
        }
        Dependency::Configured(address) => {
            tracing::info!(network = network.name(), feed = ?address, "using configured price feed");
            PlanArg::Token(Token::Address(address))
        }
    };

    m.contract(
        names::DYNAMIC_SVG_NFT,
        vec![
            feed_arg,
            PlanArg::Token(Token::String(images.low.clone())),
            PlanArg::Token(Token::String(images.high.clone())),
        ],
    );
    Ok(m.build())
}
