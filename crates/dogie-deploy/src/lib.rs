//! # dogie-deploy
//!
//! Deployment modules for the three NFTs.
//!
//! A module resolves every constructor argument from the active network
//! before anything is sent, producing a [`plan::DeploymentPlan`]. Executing a
//! plan goes through the [`execute::ContractDeployer`] seam; the live
//! implementation deploys compiled artifacts with ethers.
//!
//! ## Modules
//!
//! - [`plan`] — plan steps and the module builder
//! - [`modules`] — BasicNft, RandomIpfsNft and DynamicSvgNft modules
//! - [`assets`] — SVG variants of the dynamic NFT
//! - [`execute`] — plan execution
//! - [`record`] — per-chain deployed address records

pub mod assets;
pub mod execute;
pub mod modules;
pub mod plan;
pub mod record;

pub use assets::VariantImages;
pub use execute::{execute_plan, ContractDeployer, DeploymentOutcome, EthersDeployer};
pub use plan::{DeploymentPlan, ModuleBuilder, PlanArg, Step};
pub use record::DeploymentRecord;

/// Error types for deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Network configuration error.
    #[error(transparent)]
    Config(#[from] dogie_config::ConfigError),

    /// Domain value or artifact error.
    #[error(transparent)]
    Types(#[from] dogie_types::TypesError),

    /// Node interaction error.
    #[error(transparent)]
    Contract(#[from] dogie_contracts::ContractError),

    /// An image the module embeds is missing.
    #[error("asset {path} not found")]
    MissingAsset {
        /// Expected path.
        path: String,
    },

    /// A plan step refers to a step that produced no such output.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for deployment.
pub type Result<T> = std::result::Result<T, DeployError>;
