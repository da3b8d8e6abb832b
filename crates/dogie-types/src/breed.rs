//! Dog breeds minted by the randomized NFT.
//!
//! The discriminants match the on-chain `Breed` enum, so a breed read from an
//! `NftMinted` event converts with [`Breed::try_from`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TypesError;

/// A breed of the randomized NFT, in on-chain enum order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Breed {
    Pug = 0,
    ShibaInu = 1,
    StBernard = 2,
}

impl Breed {
    /// Number of breeds; also the cardinality of a token URI list.
    pub const COUNT: usize = 3;

    /// All breeds in index order.
    pub const ALL: [Breed; Self::COUNT] = [Breed::Pug, Breed::ShibaInu, Breed::StBernard];

    /// Breed at a category index, as returned by a chance-table lookup.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Index of this breed in a token URI list.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper-case name used by the contract and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Breed::Pug => "PUG",
            Breed::ShibaInu => "SHIBA_INU",
            Breed::StBernard => "ST_BERNARD",
        }
    }
}

impl TryFrom<u8> for Breed {
    type Error = TypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value as usize).ok_or(TypesError::UnknownBreed(value))
    }
}

impl fmt::Display for Breed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for breed in Breed::ALL {
            assert_eq!(Breed::from_index(breed.index()), Some(breed));
            assert_eq!(Breed::try_from(breed as u8).expect("known breed"), breed);
        }
    }

    #[test]
    fn test_unknown_breed() {
        assert!(Breed::from_index(3).is_none());
        assert!(matches!(
            Breed::try_from(7u8),
            Err(TypesError::UnknownBreed(7))
        ));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Breed::Pug.to_string(), "PUG");
        assert_eq!(Breed::ShibaInu.to_string(), "SHIBA_INU");
        assert_eq!(Breed::StBernard.to_string(), "ST_BERNARD");
    }
}
