//! The persisted token URI list.
//!
//! Written once by the upload pipeline and read back verbatim by the
//! randomized NFT deployment, where it becomes a constructor argument. The
//! file is a pretty-printed JSON array with one URI per breed, in breed order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Breed, Result, TypesError};

/// Default location of the persisted artifact, relative to the working directory.
pub const DEFAULT_PATH: &str = "token-uris.json";

/// One token URI per breed, in [`Breed::ALL`] order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TokenUriList(Vec<String>);

impl TokenUriList {
    /// Validate a list of URIs: exactly one non-empty `scheme://` URI per breed.
    pub fn new(uris: Vec<String>) -> Result<Self> {
        if uris.len() != Breed::COUNT {
            return Err(TypesError::WrongUriCount {
                expected: Breed::COUNT,
                actual: uris.len(),
            });
        }
        if let Some(bad) = uris.iter().find(|uri| !uri.contains("://")) {
            return Err(TypesError::InvalidUri(bad.clone()));
        }
        Ok(Self(uris))
    }

    /// URI assigned to a breed.
    pub fn uri_for(&self, breed: Breed) -> &str {
        &self.0[breed.index()]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Read the artifact. A missing file is reported as [`TypesError::MissingArtifact`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TypesError::MissingArtifact {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the artifact as a pretty-printed JSON array.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.0)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl TryFrom<Vec<String>> for TokenUriList {
    type Error = TypesError;

    fn try_from(uris: Vec<String>) -> Result<Self> {
        Self::new(uris)
    }
}

impl From<TokenUriList> for Vec<String> {
    fn from(list: TokenUriList) -> Self {
        list.0
    }
}
