//! Integration test: RandomIpfsNft with the VRF coordinator mock on Anvil.
//!
//! Deploys through the development plan: mock, subscription, funding,
//! NFT, consumer registration.

use std::time::Duration;

use ethers::types::U256;

use dogie_contracts::bindings::{RandomIpfsNft, VrfCoordinatorMock};
use dogie_contracts::mint::{check_payment, mint_random, request_random};
use dogie_contracts::{ContractError, RequestLedger, Shutdown, SignerClient};
use dogie_deploy::modules::random_ipfs_nft_module;
use dogie_integration_tests::{address_of, sample_token_uris, Devnet, SAMPLE_URIS};

struct Deployed {
    devnet: Devnet,
    nft: RandomIpfsNft<SignerClient>,
    coordinator: VrfCoordinatorMock<SignerClient>,
    subscription: U256,
}

async fn deployed() -> Deployed {
    let devnet = Devnet::start().await.expect("devnet");
    let plan = random_ipfs_nft_module(&devnet.network, &sample_token_uris().expect("uris"))
        .expect("plan");
    let outcome = devnet.deploy(&plan).await.expect("deploy");

    let nft = RandomIpfsNft::new(
        address_of(&outcome, "RandomIpfsNft").expect("nft"),
        devnet.client.clone(),
    );
    let coordinator = VrfCoordinatorMock::new(
        address_of(&outcome, "VRFCoordinatorV2_5Mock").expect("mock"),
        devnet.client.clone(),
    );
    let subscription = outcome
        .subscriptions
        .get("RandomIpfsNftModule#subscriptionId")
        .copied()
        .expect("subscription");
    Deployed {
        devnet,
        nft,
        coordinator,
        subscription,
    }
}

#[tokio::test]
#[ignore]
async fn initializes_from_network_profile() {
    let Deployed { devnet, nft, .. } = deployed().await;
    assert_eq!(nft.name().call().await.expect("name"), "Random IPFS NFT");
    assert_eq!(nft.symbol().call().await.expect("symbol"), "RIN");
    assert_eq!(nft.get_token_counter().call().await.expect("counter"), U256::zero());

    let fee = nft.get_mint_fee().call().await.expect("fee");
    assert_eq!(Some(fee), devnet.network.profile.mint_fee);

    for (index, uri) in SAMPLE_URIS.iter().enumerate() {
        let stored = nft
            .get_dog_token_uris(U256::from(index))
            .call()
            .await
            .expect("uri");
        assert_eq!(&stored, uri);
    }
}

#[tokio::test]
#[ignore]
async fn consumer_is_registered() {
    let Deployed {
        devnet: _devnet,
        nft,
        coordinator,
        subscription,
    } = deployed().await;
    let added = coordinator
        .consumer_is_added(subscription, nft.address())
        .call()
        .await
        .expect("consumerIsAdded");
    assert!(added);
}

#[tokio::test]
#[ignore]
async fn underpayment_is_rejected_before_submission() {
    let Deployed {
        devnet: _devnet,
        nft,
        ..
    } = deployed().await;
    let fee = nft.get_mint_fee().call().await.expect("fee");
    let err = check_payment(fee, Some(fee - 1)).unwrap_err();
    assert!(matches!(err, ContractError::InsufficientPayment { .. }));
}

#[tokio::test]
#[ignore]
async fn contract_reverts_without_payment() {
    let Deployed { devnet, nft, .. } = deployed().await;
    let mut ledger = RequestLedger::new();
    assert!(request_random(&nft, U256::zero(), &mut ledger, devnet.tx)
        .await
        .is_err());
    assert!(ledger.is_empty());
}

#[tokio::test]
#[ignore]
async fn records_the_requester() {
    let Deployed { devnet, nft, .. } = deployed().await;
    let fee = nft.get_mint_fee().call().await.expect("fee");
    let mut ledger = RequestLedger::new();

    let request = request_random(&nft, fee, &mut ledger, devnet.tx)
        .await
        .expect("request");
    assert_ne!(request.request_id, U256::zero());
    assert_eq!(request.requester, devnet.account());
    assert_eq!(ledger.requester(request.request_id), Some(devnet.account()));

    let on_chain = nft
        .s_request_id_to_sender(request.request_id)
        .call()
        .await
        .expect("sender");
    assert_eq!(on_chain, devnet.account());
}

#[tokio::test]
#[ignore]
async fn mints_after_fulfilment() {
    let Deployed {
        devnet,
        nft,
        coordinator,
        ..
    } = deployed().await;
    let fee = nft.get_mint_fee().call().await.expect("fee");
    let mut ledger = RequestLedger::new();
    let shutdown = Shutdown::new();
    let mut cancelled = shutdown.subscribe();

    let minted = mint_random(
        &nft,
        fee,
        Some(&coordinator),
        &mut ledger,
        devnet.tx,
        Duration::from_secs(60),
        &mut cancelled,
    )
    .await
    .expect("mint");

    assert_eq!(minted.minter, devnet.account());
    assert!(minted.token_uri.starts_with("ipfs://"));
    assert_eq!(minted.token_uri, SAMPLE_URIS[minted.breed.index()]);
    assert!(ledger.is_empty());
    assert_eq!(
        nft.owner_of(minted.token_id).call().await.expect("owner"),
        devnet.account()
    );
}

#[tokio::test]
#[ignore]
async fn unfulfilled_request_times_out() {
    let Deployed { devnet, nft, .. } = deployed().await;
    let fee = nft.get_mint_fee().call().await.expect("fee");
    let mut ledger = RequestLedger::new();
    let shutdown = Shutdown::new();
    let mut cancelled = shutdown.subscribe();

    // No coordinator: nothing fulfils the request.
    let err = mint_random(
        &nft,
        fee,
        None,
        &mut ledger,
        devnet.tx,
        Duration::from_secs(3),
        &mut cancelled,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ContractError::Timeout { .. }));
    assert_eq!(ledger.len(), 1);
}
