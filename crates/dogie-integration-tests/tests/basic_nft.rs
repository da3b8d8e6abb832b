//! Integration test: BasicNft on a local Anvil node.

use ethers::types::U256;

use dogie_contracts::bindings::BasicNft;
use dogie_contracts::mint::mint_basic;
use dogie_deploy::modules::basic_nft_module;
use dogie_integration_tests::{address_of, Devnet};

async fn deployed() -> (Devnet, BasicNft<dogie_contracts::SignerClient>) {
    let devnet = Devnet::start().await.expect("devnet");
    let outcome = devnet.deploy(&basic_nft_module()).await.expect("deploy");
    let address = address_of(&outcome, "BasicNft").expect("address");
    let nft = BasicNft::new(address, devnet.client.clone());
    (devnet, nft)
}

#[tokio::test]
#[ignore]
async fn initializes_name_symbol_and_counter() {
    let (_devnet, nft) = deployed().await;
    assert_eq!(nft.name().call().await.expect("name"), "Dogie");
    assert_eq!(nft.symbol().call().await.expect("symbol"), "DOG");
    assert_eq!(nft.get_token_counter().call().await.expect("counter"), U256::zero());
}

#[tokio::test]
#[ignore]
async fn mints_sequential_tokens_to_caller() {
    let (devnet, nft) = deployed().await;

    let first = mint_basic(&nft, devnet.tx).await.expect("mint");
    let second = mint_basic(&nft, devnet.tx).await.expect("mint");
    assert_eq!(first.token_id, U256::zero());
    assert_eq!(second.token_id, U256::one());
    assert_eq!(nft.get_token_counter().call().await.expect("counter"), U256::from(2));

    let owner = nft.owner_of(first.token_id).call().await.expect("owner");
    assert_eq!(owner, devnet.account());
}

#[tokio::test]
#[ignore]
async fn every_token_shares_one_uri() {
    let (devnet, nft) = deployed().await;
    let first = mint_basic(&nft, devnet.tx).await.expect("mint");
    let second = mint_basic(&nft, devnet.tx).await.expect("mint");
    assert!(!first.token_uri.is_empty());
    assert_eq!(first.token_uri, second.token_uri);
}

#[tokio::test]
#[ignore]
async fn mints_to_different_accounts() {
    let (devnet, nft) = deployed().await;
    let other = devnet.client_for(1).await.expect("client");
    let as_other = BasicNft::new(nft.address(), other.clone());

    mint_basic(&nft, devnet.tx).await.expect("mint");
    let minted = mint_basic(&as_other, devnet.tx).await.expect("mint");
    let owner = nft.owner_of(minted.token_id).call().await.expect("owner");
    assert_eq!(owner, dogie_contracts::client::account(&other));
}
