//! # dogie-contracts
//!
//! Everything that talks to a node: typed contract bindings, compiled
//! artifacts, the signing client, transaction confirmation, price feed
//! readings and bounded event waits.
//!
//! ## Modules
//!
//! - [`bindings`] — `abigen!` bindings for the NFTs and their mocks
//! - [`artifact`] — Hardhat/Foundry artifact lookup
//! - [`client`] — signing client construction
//! - [`tx`] — send a call and wait for a successful receipt
//! - [`price`] — ETH/USD feed readings
//! - [`events`] — event waits with deadline and cancellation
//! - [`ledger`] — off-chain view of pending randomness requests
//! - [`mint`] — mint flows of the three NFTs

pub mod artifact;
pub mod bindings;
pub mod client;
pub mod events;
pub mod ledger;
pub mod mint;
pub mod price;
pub mod tx;

pub use artifact::{Artifact, ArtifactStore};
pub use client::{connect, SignerClient};
pub use events::{wait_for_event, Shutdown};
pub use ledger::RequestLedger;
pub use mint::{MintedToken, RandomMint, TxSettings};
pub use price::PriceReading;

use ethers::types::{Address, H256, U256};

/// Error types for node interaction.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// No compiled artifact for a contract.
    #[error("artifact {name} not found under {dir}")]
    ArtifactNotFound {
        /// Contract name.
        name: String,
        /// Artifacts directory searched.
        dir: String,
    },

    /// Artifact file is not a Hardhat or Foundry artifact.
    #[error("invalid artifact {path}: {reason}")]
    InvalidArtifact {
        /// Artifact path.
        path: String,
        /// Parse failure.
        reason: String,
    },

    /// Payment below the contract's mint fee.
    #[error("insufficient payment: mint fee is {required} wei, offered {offered} wei")]
    InsufficientPayment {
        /// Mint fee.
        required: U256,
        /// Value that would have been sent.
        offered: U256,
    },

    /// A bounded wait ran out.
    #[error("timed out after {secs}s waiting for {what}")]
    Timeout {
        /// What was awaited.
        what: String,
        /// Bound in seconds.
        secs: u64,
    },

    /// A wait was interrupted by the shutdown signal.
    #[error("cancelled")]
    Cancelled,

    /// An event stream ended before a matching event arrived.
    #[error("event stream closed")]
    StreamClosed,

    /// A receipt did not contain an expected event.
    #[error("transaction {tx:?} did not emit {event}")]
    MissingEvent {
        /// Event name.
        event: &'static str,
        /// Transaction hash.
        tx: H256,
    },

    /// Transaction mined with a failure status.
    #[error("{label} transaction {tx:?} reverted")]
    Reverted {
        /// Call that reverted.
        label: String,
        /// Transaction hash.
        tx: H256,
    },

    /// Transaction dropped from the mempool.
    #[error("transaction {tx:?} was dropped")]
    Dropped {
        /// Transaction hash.
        tx: H256,
    },

    /// Query for a token that was never minted.
    #[error("token {token_id} does not exist on {contract:?}")]
    NonexistentToken {
        /// Token id queried.
        token_id: U256,
        /// Contract address.
        contract: Address,
    },

    /// A contract call or deployment failed.
    #[error("{label}: {reason}")]
    Call {
        /// Call that failed.
        label: String,
        /// Failure reported by the client library.
        reason: String,
    },

    /// Node communication error.
    #[error("provider error: {0}")]
    Provider(String),

    /// Signing key error.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Domain value error.
    #[error(transparent)]
    Types(#[from] dogie_types::TypesError),
}

impl ContractError {
    /// Wrap a failure from the client library with the call it came from.
    pub fn call(label: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ContractError::Call {
            label: label.into(),
            reason: err.to_string(),
        }
    }
}

impl From<ethers::providers::ProviderError> for ContractError {
    fn from(err: ethers::providers::ProviderError) -> Self {
        ContractError::Provider(err.to_string())
    }
}

/// Convenience result type for node interaction.
pub type Result<T> = std::result::Result<T, ContractError>;
