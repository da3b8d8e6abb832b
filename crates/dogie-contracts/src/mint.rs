//! Mint flows of the three NFTs.
//!
//! Shared by the `dogie mint` commands and the integration suites.

use std::time::Duration;

use ethers::abi::{self, ParamType, RawLog, Token};
use ethers::contract::parse_log;
use ethers::providers::Middleware;
use ethers::types::{Address, TransactionReceipt, H256, I256, U256};
use ethers::utils::keccak256;
use tokio::sync::broadcast;

use dogie_types::Breed;

use crate::bindings::basic_nft::TransferFilter;
use crate::bindings::random_ipfs_nft::{NftMintedFilter, NftRequestedFilter};
use crate::bindings::{BasicNft, DynamicSvgNft, RandomIpfsNft, VrfCoordinatorMock};
use crate::events::wait_for_event;
use crate::ledger::RequestLedger;
use crate::tx::send_and_confirm;
use crate::{ContractError, Result};

/// Confirmation depth and receipt bound for every transaction.
#[derive(Debug, Clone, Copy)]
pub struct TxSettings {
    pub confirmations: usize,
    pub timeout: Duration,
}

impl Default for TxSettings {
    fn default() -> Self {
        Self {
            confirmations: 1,
            timeout: Duration::from_secs(120),
        }
    }
}

/// A token minted by a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedToken {
    pub token_id: U256,
    pub token_uri: String,
}

/// A randomness request accepted by the randomized NFT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomRequest {
    pub request_id: U256,
    pub requester: Address,
    /// Value paid with the request.
    pub paid: U256,
}

/// A fulfilled random mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomMint {
    pub request_id: U256,
    pub token_id: U256,
    pub breed: Breed,
    pub minter: Address,
    pub token_uri: String,
}

/// Mint a BasicNft to the sender.
pub async fn mint_basic<M: Middleware + 'static>(
    nft: &BasicNft<M>,
    tx: TxSettings,
) -> Result<MintedToken> {
    let receipt = send_and_confirm(&nft.mint_nft(), "mintNft", tx.confirmations, tx.timeout).await?;
    let token_id = receipt
        .logs
        .iter()
        .filter_map(|log| parse_log::<TransferFilter>(log.clone()).ok())
        .find(|transfer| transfer.from == Address::zero())
        .map(|transfer| transfer.token_id)
        .ok_or(ContractError::MissingEvent {
            event: "Transfer",
            tx: receipt.transaction_hash,
        })?;

    let token_uri = nft
        .token_uri(token_id)
        .call()
        .await
        .map_err(|e| ContractError::call("tokenURI", e))?;
    tracing::info!(%token_id, "basic NFT minted");
    Ok(MintedToken {
        token_id,
        token_uri,
    })
}

/// Value to send with a random mint request.
///
/// Defaults to the contract's mint fee. An explicit value below the fee is
/// rejected before anything is submitted.
pub async fn payment_for<M: Middleware + 'static>(
    nft: &RandomIpfsNft<M>,
    offered: Option<U256>,
) -> Result<U256> {
    let fee = nft
        .get_mint_fee()
        .call()
        .await
        .map_err(|e| ContractError::call("getMintFee", e))?;
    check_payment(fee, offered)
}

/// Pure fee check: `offered` (default `fee`) must cover `fee`.
pub fn check_payment(fee: U256, offered: Option<U256>) -> Result<U256> {
    let value = offered.unwrap_or(fee);
    if value < fee {
        return Err(ContractError::InsufficientPayment {
            required: fee,
            offered: value,
        });
    }
    Ok(value)
}

/// Submit `requestNft` and record the request in `ledger`.
pub async fn request_random<M: Middleware + 'static>(
    nft: &RandomIpfsNft<M>,
    value: U256,
    ledger: &mut RequestLedger,
    tx: TxSettings,
) -> Result<RandomRequest> {
    let call = nft.request_nft().value(value);
    let receipt = send_and_confirm(&call, "requestNft", tx.confirmations, tx.timeout).await?;
    let requested = nft_requested(&receipt)?;

    ledger.record(requested.request_id, requested.requester);
    tracing::info!(
        request_id = %requested.request_id,
        requester = ?requested.requester,
        "randomness requested"
    );
    Ok(RandomRequest {
        request_id: requested.request_id,
        requester: requested.requester,
        paid: value,
    })
}

/// The `NftRequested` event of a `requestNft` receipt.
pub fn nft_requested(receipt: &TransactionReceipt) -> Result<NftRequestedFilter> {
    receipt
        .logs
        .iter()
        .find_map(|log| parse_log::<NftRequestedFilter>(log.clone()).ok())
        .ok_or(ContractError::MissingEvent {
            event: "NftRequested",
            tx: receipt.transaction_hash,
        })
}

/// Have the development coordinator mock answer a request.
pub async fn fulfil_with_mock<M: Middleware + 'static>(
    coordinator: &VrfCoordinatorMock<M>,
    request_id: U256,
    consumer: Address,
    tx: TxSettings,
) -> Result<()> {
    let call = coordinator.fulfill_random_words(request_id, consumer);
    send_and_confirm(&call, "fulfillRandomWords", tx.confirmations, tx.timeout).await?;
    tracing::info!(%request_id, "mock coordinator fulfilled request");
    Ok(())
}

/// Request a random mint and wait for its fulfilment.
///
/// The `NftMinted` filter is installed before the request is sent so the
/// fulfilment cannot be missed. With `dev_coordinator` set the mock is asked
/// to fulfil immediately; otherwise the live coordinator answers within
/// `fulfilment_timeout` or the mint fails.
pub async fn mint_random<M: Middleware + 'static>(
    nft: &RandomIpfsNft<M>,
    value: U256,
    dev_coordinator: Option<&VrfCoordinatorMock<M>>,
    ledger: &mut RequestLedger,
    tx: TxSettings,
    fulfilment_timeout: Duration,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<RandomMint> {
    let minted = nft.nft_minted_filter();
    let stream = minted
        .stream()
        .await
        .map_err(|e| ContractError::call("NftMinted filter", e))?;

    let request = request_random(nft, value, ledger, tx).await?;
    if let Some(coordinator) = dev_coordinator {
        fulfil_with_mock(coordinator, request.request_id, nft.address(), tx).await?;
    }

    let requester = request.requester;
    let event = wait_for_event(
        stream,
        "NftMinted",
        |event: &NftMintedFilter| event.minter == requester,
        fulfilment_timeout,
        shutdown,
    )
    .await?;
    let request_id = ledger.fulfil(event.minter).unwrap_or(request.request_id);

    let breed = Breed::try_from(event.breed)?;
    let token_uri = nft
        .token_uri(event.token_id)
        .call()
        .await
        .map_err(|e| ContractError::call("tokenURI", e))?;
    tracing::info!(token_id = %event.token_id, %breed, "random NFT minted");

    Ok(RandomMint {
        request_id,
        token_id: event.token_id,
        breed,
        minter: event.minter,
        token_uri,
    })
}

/// Fields of a `CreatedNFT(uint256 indexed tokenId, int256 highValue)` log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedNft {
    pub token_id: U256,
    pub high_value: I256,
}

/// Decode the `CreatedNFT` event of a dynamic mint receipt.
pub fn created_nft(receipt: &TransactionReceipt) -> Result<CreatedNft> {
    let topic0 = H256::from(created_nft_topic());
    receipt
        .logs
        .iter()
        .find_map(|log| {
            if log.topics.len() != 2 || log.topics[0] != topic0 {
                return None;
            }
            decode_created_nft(&RawLog {
                topics: log.topics.clone(),
                data: log.data.to_vec(),
            })
        })
        .ok_or(ContractError::MissingEvent {
            event: "CreatedNFT",
            tx: receipt.transaction_hash,
        })
}

fn created_nft_topic() -> [u8; 32] {
    keccak256("CreatedNFT(uint256,int256)")
}

fn decode_created_nft(log: &RawLog) -> Option<CreatedNft> {
    let token_id = U256::from_big_endian(log.topics.get(1)?.as_bytes());
    let mut tokens = abi::decode(&[ParamType::Int(256)], &log.data).ok()?;
    match tokens.pop()? {
        Token::Int(raw) => Some(CreatedNft {
            token_id,
            high_value: I256::from_raw(raw),
        }),
        _ => None,
    }
}

/// Mint a DynamicSvgNft with the given high-value threshold.
pub async fn mint_dynamic<M: Middleware + 'static>(
    nft: &DynamicSvgNft<M>,
    high_value: I256,
    tx: TxSettings,
) -> Result<MintedToken> {
    let call = nft.mint_nft(high_value);
    let receipt = send_and_confirm(&call, "mintNft", tx.confirmations, tx.timeout).await?;
    let created = created_nft(&receipt)?;
    let token_uri = nft
        .token_uri(created.token_id)
        .call()
        .await
        .map_err(|e| ContractError::call("tokenURI", e))?;
    tracing::info!(token_id = %created.token_id, %high_value, "dynamic NFT minted");
    Ok(MintedToken {
        token_id: created.token_id,
        token_uri,
    })
}

/// `tokenURI` of an existing token.
///
/// A token id at or above the token counter was never minted and is
/// reported as [`ContractError::NonexistentToken`].
pub async fn dynamic_token_uri<M: Middleware + 'static>(
    nft: &DynamicSvgNft<M>,
    token_id: U256,
) -> Result<String> {
    let counter = nft
        .get_token_counter()
        .call()
        .await
        .map_err(|e| ContractError::call("getTokenCounter", e))?;
    if token_id >= counter {
        return Err(ContractError::NonexistentToken {
            token_id,
            contract: nft.address(),
        });
    }
    nft.token_uri(token_id)
        .call()
        .await
        .map_err(|e| ContractError::call("tokenURI", e))
}
