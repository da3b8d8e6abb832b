//! The pinning service seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Result of a pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PinResponse {
    /// Content identifier of the pinned data.
    pub ipfs_hash: String,
    #[serde(default)]
    pub pin_size: u64,
    #[serde(default)]
    pub timestamp: String,
}

/// A content-addressed store that pins files and JSON documents.
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Check credentials before any upload.
    async fn test_authentication(&self) -> Result<()>;

    /// Pin raw file contents under a display name.
    async fn pin_file(&self, file_name: &str, contents: Vec<u8>, name: &str) -> Result<PinResponse>;

    /// Pin a JSON document under a display name.
    async fn pin_json(&self, document: &serde_json::Value, name: &str) -> Result<PinResponse>;
}
