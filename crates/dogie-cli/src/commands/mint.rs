//! `dogie mint <nft>` and `dogie inspect`

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;
use ethers::types::{Address, I256, U256};
use ethers::utils::parse_units;

use dogie_contracts::bindings::{names, BasicNft, DynamicSvgNft, PriceFeed, RandomIpfsNft, VrfCoordinatorMock};
use dogie_contracts::mint::{dynamic_token_uri, mint_basic, mint_dynamic, mint_random, payment_for};
use dogie_contracts::price::STALE_AFTER;
use dogie_contracts::{ContractError, PriceReading, RequestLedger};
use dogie_types::{data_uri, NftMetadata, PRICE_FEED_DECIMALS};

use super::{parse_wei, Context};

pub async fn basic(ctx: &Context, address: Option<Address>) -> anyhow::Result<()> {
    let address = ctx.deployed_address(address, names::BASIC_NFT, "BASIC_NFT_ADDRESS")?;
    let client = ctx.connect().await?;
    let nft = BasicNft::new(address, client);

    let minted = mint_basic(&nft, ctx.tx_settings()).await?;
    println!("Basic NFT index 0 tokenURI: {}", minted.token_uri);
    println!("token id: {}", minted.token_id);
    Ok(())
}

pub async fn random_ipfs(
    ctx: &Context,
    address: Option<Address>,
    value: Option<&str>,
) -> anyhow::Result<()> {
    let offered = value.map(parse_wei).transpose()?;
    let address = ctx.deployed_address(address, names::RANDOM_IPFS_NFT, "RANDOM_IPFS_NFT_ADDRESS")?;
    let client = ctx.connect().await?;
    let nft = RandomIpfsNft::new(address, client.clone());

    let value = payment_for(&nft, offered).await?;
    let coordinator = if ctx.network.development {
        let mock = ctx.deployed_address(None, names::VRF_COORDINATOR_MOCK, "the deployment record")?;
        Some(VrfCoordinatorMock::new(mock, client))
    } else {
        None
    };

    let mut ledger = RequestLedger::new();
    let mut shutdown = ctx.shutdown.subscribe();
    let minted = mint_random(
        &nft,
        value,
        coordinator.as_ref(),
        &mut ledger,
        ctx.tx_settings(),
        ctx.config.tool.fulfilment_timeout(),
        &mut shutdown,
    )
    .await?;

    println!("Random IPFS NFT index 0 tokenURI: {}", minted.token_uri);
    println!("token id: {}", minted.token_id);
    println!("breed: {}", minted.breed);
    println!("request id: {}", minted.request_id);
    Ok(())
}

/// Parse a USD amount into feed units.
pub fn parse_high_value(usd: &str) -> anyhow::Result<I256> {
    let units = parse_units(usd.trim(), u32::from(PRICE_FEED_DECIMALS))
        .with_context(|| format!("invalid high value {usd:?}"))?;
    Ok(I256::from(units))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub async fn dynamic_svg(ctx: &Context, address: Option<Address>, high_value: &str) -> anyhow::Result<()> {
    let high_value = parse_high_value(high_value)?;
    let address = ctx.deployed_address(address, names::DYNAMIC_SVG_NFT, "DYNAMIC_SVG_NFT_ADDRESS")?;
    let client = ctx.connect().await?;
    let nft = DynamicSvgNft::new(address, client.clone());

    let feed_address = nft
        .get_price_feed()
        .call()
        .await
        .map_err(|e| ContractError::call("getPriceFeed", e))?;
    let reading = PriceReading::fetch(&PriceFeed::new(feed_address, client)).await?;
    let age = reading.age(unix_now());
    if reading.is_stale(unix_now(), STALE_AFTER) {
        tracing::warn!(age_secs = age, round = reading.round_id, "price feed answer is stale");
    }
    let variant = reading.variant_for(high_value);
    tracing::info!(
        price = %reading.display_price(),
        %high_value,
        %variant,
        "token will render {variant} at the current price"
    );

    let minted = mint_dynamic(&nft, high_value, ctx.tx_settings()).await?;
    println!("Dynamic SVG NFT index 0 tokenURI: {}", minted.token_uri);
    println!("token id: {}", minted.token_id);
    Ok(())
}

pub async fn inspect(ctx: &Context, address: Option<Address>, token_id: u64) -> anyhow::Result<()> {
    let address = ctx.deployed_address(address, names::DYNAMIC_SVG_NFT, "DYNAMIC_SVG_NFT_ADDRESS")?;
    let client = ctx.connect().await?;
    let nft = DynamicSvgNft::new(address, client);

    let uri = dynamic_token_uri(&nft, U256::from(token_id)).await?;
    let metadata = NftMetadata::from_data_uri(&uri)?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    println!("{}", data_uri::decode_text(&metadata.image)?);
    Ok(())
}
