//! Content-addressed pin store on the local filesystem.
//!
//! Used for offline runs and tests. Content is stored under its blake3
//! digest; a `pins.json` index maps display names to identifiers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::service::{PinResponse, PinningService};
use crate::Result;

const INDEX_FILE: &str = "pins.json";

/// Directory-backed pin store.
pub struct LocalPinStore {
    root: PathBuf,
    index: Mutex<BTreeMap<String, String>>,
}

impl LocalPinStore {
    /// Open a store rooted at `root`, reading an existing index.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let index_path = root.join(INDEX_FILE);
        let index = if index_path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&index_path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            root,
            index: Mutex::new(index),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifier of `contents`.
    pub fn cid(contents: &[u8]) -> String {
        format!("b3{}", blake3::hash(contents).to_hex())
    }

    /// Read pinned content back.
    pub fn get(&self, cid: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.root.join(cid))?)
    }

    /// Identifier last pinned under `name`.
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.index
            .lock()
            .ok()
            .and_then(|index| index.get(name).cloned())
    }

    fn store(&self, contents: &[u8], name: &str) -> Result<PinResponse> {
        std::fs::create_dir_all(&self.root)?;
        let cid = Self::cid(contents);
        let path = self.root.join(&cid);
        if !path.exists() {
            std::fs::write(&path, contents)?;
        }

        let mut index = match self.index.lock() {
            Ok(index) => index,
            Err(poisoned) => poisoned.into_inner(),
        };
        index.insert(name.to_string(), cid.clone());
        std::fs::write(
            self.root.join(INDEX_FILE),
            serde_json::to_string_pretty(&*index)?,
        )?;
        tracing::debug!(%name, %cid, "pinned locally");

        Ok(PinResponse {
            ipfs_hash: cid,
            pin_size: contents.len() as u64,
            timestamp: String::new(),
        })
    }
}

#[async_trait]
impl PinningService for LocalPinStore {
    async fn test_authentication(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    async fn pin_file(&self, _file_name: &str, contents: Vec<u8>, name: &str) -> Result<PinResponse> {
        self.store(&contents, name)
    }

    async fn pin_json(&self, document: &serde_json::Value, name: &str) -> Result<PinResponse> {
        let contents = serde_json::to_vec_pretty(document)?;
        self.store(&contents, name)
    }
}
