//! # dogie-ipfs
//!
//! Pins breed images and their metadata documents, then persists the token
//! URI list the randomized NFT is deployed with.
//!
//! ## Modules
//!
//! - [`service`] — the pinning service seam
//! - [`pinata`] — Pinata HTTP API client
//! - [`local`] — content-addressed directory for offline runs
//! - [`pipeline`] — images → metadata → token URI list

pub mod local;
pub mod pinata;
pub mod pipeline;
pub mod service;

pub use local::LocalPinStore;
pub use pinata::PinataClient;
pub use pipeline::{handle_token_uris, store_images, store_token_uri_metadata, upload, UploadReport};
pub use service::{PinResponse, PinningService};

/// Error types for pinning.
#[derive(Debug, thiserror::Error)]
pub enum IpfsError {
    /// Credentials rejected or missing.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Request could not be sent or its response read.
    #[error("http error: {0}")]
    Http(String),

    /// The service answered with a failure status.
    #[error("pinning service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Some images could not be pinned; the token URI list was not written.
    #[error("{} of {total} images failed to upload: {}", failed.len(), failed.join(", "))]
    Incomplete {
        /// Number of images found.
        total: usize,
        /// Files that failed.
        failed: Vec<String>,
    },

    /// The images directory has no files.
    #[error("no images found in {dir}")]
    NoImages {
        /// Directory searched.
        dir: String,
    },

    /// Token URI list error.
    #[error(transparent)]
    Types(#[from] dogie_types::TypesError),

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for pinning.
pub type Result<T> = std::result::Result<T, IpfsError>;
