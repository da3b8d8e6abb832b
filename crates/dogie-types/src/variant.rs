//! Image variants of the price-driven NFT.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the two registered images a token renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Observed price below the token's threshold ("frown" image).
    Low,
    /// Observed price at or above the token's threshold ("happy" image).
    High,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Low => "low",
            Variant::High => "high",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
