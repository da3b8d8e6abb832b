//! Compiled contract artifacts.
//!
//! The contracts are compiled outside this workspace. Both Hardhat
//! (`artifacts/contracts/X.sol/X.json`, `bytecode` is a hex string) and
//! Foundry (`out/X.sol/X.json`, `bytecode.object`) layouts are accepted.

use std::path::{Path, PathBuf};

use ethers::abi::Abi;
use ethers::types::Bytes;
use serde::Deserialize;

use crate::{ContractError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(Bytes),
    Object { object: Bytes },
}

#[derive(Deserialize)]
struct RawArtifact {
    abi: Abi,
    bytecode: RawBytecode,
}

/// ABI and creation bytecode of one contract.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl Artifact {
    /// Parse an artifact file.
    pub fn from_file(name: &str, path: &Path) -> Result<Self> {
        let invalid = |reason: String| ContractError::InvalidArtifact {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path)?;
        let raw: RawArtifact = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        let bytecode = match raw.bytecode {
            RawBytecode::Hex(bytes) | RawBytecode::Object { object: bytes } => bytes,
        };
        if bytecode.is_empty() {
            return Err(invalid("empty bytecode (abstract contract or interface?)".to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            abi: raw.abi,
            bytecode,
        })
    }
}

/// Artifact lookup under a build output directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the artifact of a contract by name.
    pub fn load(&self, name: &str) -> Result<Artifact> {
        let path = self.find(name)?;
        tracing::debug!(name, path = %path.display(), "loading artifact");
        Artifact::from_file(name, &path)
    }

    /// Path of `<name>.json`, searched recursively. Debug and build-info files
    /// are skipped.
    pub fn find(&self, name: &str) -> Result<PathBuf> {
        let file_name = format!("{name}.json");
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if dir == self.root => return Err(self.not_found(name, e)),
                Err(_) => continue,
            };
            for entry in entries {
                let path = entry?.path();
                if path.is_dir() {
                    if path.file_name().is_some_and(|n| n != "build-info") {
                        pending.push(path);
                    }
                } else if path.file_name().is_some_and(|n| n == file_name.as_str()) {
                    return Ok(path);
                }
            }
        }
        Err(ContractError::ArtifactNotFound {
            name: name.to_string(),
            dir: self.root.display().to_string(),
        })
    }

    fn not_found(&self, name: &str, err: std::io::Error) -> ContractError {
        tracing::debug!(dir = %self.root.display(), error = %err, "artifacts directory unreadable");
        ContractError::ArtifactNotFound {
            name: name.to_string(),
            dir: self.root.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABI: &str = r#"[{"type":"function","name":"getTokenCounter","inputs":[],"outputs":[{"name":"","type":"uint256","internalType":"uint256"}],"stateMutability":"view"}]"#;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, content).expect("write");
    }

    #[test]
    fn test_hardhat_layout() {
        let dir = temp_dir::TempDir::new().expect("temp dir");
        let path = dir.path().join("contracts/BasicNft.sol/BasicNft.json");
        write(
            &path,
            &format!(r#"{{"contractName":"BasicNft","abi":{ABI},"bytecode":"0x6080"}}"#),
        );
        write(
            &dir.path().join("contracts/BasicNft.sol/BasicNft.dbg.json"),
            r#"{"buildInfo":"../../build-info/x.json"}"#,
        );

        let store = ArtifactStore::new(dir.path());
        let artifact = store.load("BasicNft").expect("load");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80]);
        assert!(artifact.abi.function("getTokenCounter").is_ok());
    }

    #[test]
    fn test_foundry_layout() {
        let dir = temp_dir::TempDir::new().expect("temp dir");
        write(
            &dir.path().join("MockV3Aggregator.sol/MockV3Aggregator.json"),
            &format!(r#"{{"abi":{ABI},"bytecode":{{"object":"0x60806040","sourceMap":""}}}}"#),
        );

        let artifact = ArtifactStore::new(dir.path())
            .load("MockV3Aggregator")
            .expect("load");
        assert_eq!(artifact.bytecode.len(), 4);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = temp_dir::TempDir::new().expect("temp dir");
        let err = ArtifactStore::new(dir.path()).load("DynamicSvgNft").unwrap_err();
        assert!(matches!(err, ContractError::ArtifactNotFound { .. }));

        let err = ArtifactStore::new(dir.path().join("absent"))
            .find("DynamicSvgNft")
            .unwrap_err();
        assert!(matches!(err, ContractError::ArtifactNotFound { .. }));
    }

    #[test]
    fn test_interface_rejected() {
        let dir = temp_dir::TempDir::new().expect("temp dir");
        write(
            &dir.path().join("AggregatorV3Interface.json"),
            &format!(r#"{{"abi":{ABI},"bytecode":"0x"}}"#),
        );
        let err = ArtifactStore::new(dir.path())
            .load("AggregatorV3Interface")
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArtifact { .. }));
    }
}
