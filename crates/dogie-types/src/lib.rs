//! # dogie-types
//!
//! Shared domain types used across the dogie workspace: breeds and their
//! token URIs, NFT metadata documents, image variants, and the constants the
//! development stand-ins are deployed with.

pub mod breed;
pub mod data_uri;
pub mod metadata;
pub mod token_uris;
pub mod variant;

pub use breed::Breed;
pub use metadata::{Attribute, NftMetadata};
pub use token_uris::TokenUriList;
pub use variant::Variant;

/// Numeric chain identifier (EIP-155).
pub type ChainId = u64;

/// URI scheme for content stored on IPFS.
pub const IPFS_SCHEME: &str = "ipfs://";

/// Exclusive upper bound of a modded random draw.
pub const MAX_CHANCE_VALUE: u8 = 100;

/// Decimals reported by the ETH/USD price feed and its mock.
pub const PRICE_FEED_DECIMALS: u8 = 8;

/// Initial mock feed answer: 2000 USD with 8 decimals.
pub const INITIAL_PRICE: i64 = 2000_00000000;

/// VRF coordinator mock base fee: 0.1 LINK.
pub const VRF_MOCK_BASE_FEE: u128 = 100_000_000_000_000_000;

/// VRF coordinator mock gas price: 0.000000001 LINK per gas.
pub const VRF_MOCK_GAS_PRICE_LINK: u128 = 1_000_000_000;

/// VRF coordinator mock conversion: 1 LINK = 1e18 wei.
pub const VRF_MOCK_WEI_PER_UNIT_LINK: u128 = 1_000_000_000_000_000_000;

/// Amount a development VRF subscription is funded with: 10 LINK.
pub const DEV_SUBSCRIPTION_FUND: u128 = 10_000_000_000_000_000_000;

/// Error types for shared domain values.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// A breed index outside the known breeds.
    #[error("unknown breed index: {0}")]
    UnknownBreed(u8),

    /// Token URI list does not have one entry per breed.
    #[error("expected {expected} token URIs, got {actual}")]
    WrongUriCount {
        /// Number of breeds.
        expected: usize,
        /// Number of URIs supplied.
        actual: usize,
    },

    /// A token URI that is empty or not a URI.
    #[error("invalid token URI: {0:?}")]
    InvalidUri(String),

    /// A data URI that could not be decoded.
    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),

    /// The persisted token URI artifact does not exist.
    #[error("{path} not found; run `dogie upload` first")]
    MissingArtifact {
        /// Expected artifact path.
        path: String,
    },

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for domain value operations.
pub type Result<T> = std::result::Result<T, TypesError>;
