//! # dogie-select
//!
//! Off-chain rendition of the two selection rules the NFT contracts apply.
//!
//! Both are pure functions. The CLI uses them to preview what a mint will
//! produce and the integration suites use them to check what the contracts
//! actually did.
//!
//! ## Modules
//!
//! - [`chance`] — cumulative chance tables and the weighted category selector
//! - [`variant`] — price threshold image selection

pub mod chance;
pub mod variant;

pub use chance::{breed_for_word, modded_rng, select_category, ChanceTable, BREED_CHANCES};
pub use variant::select_variant;

/// Error types for selection operations.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// No category of the chance table covers the value.
    #[error("value {value} is out of bounds for the chance table")]
    OutOfBounds {
        /// The value that fell outside every range.
        value: u8,
    },

    /// The chance table is not strictly increasing or does not end at 100.
    #[error("invalid chance table: {0}")]
    InvalidTable(String),
}

/// Convenience result type for selection operations.
pub type Result<T> = std::result::Result<T, SelectError>;
