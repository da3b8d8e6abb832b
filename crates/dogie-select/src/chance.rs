//! Weighted category selection.
//!
//! A chance table is a list of cumulative thresholds ending at 100. A draw in
//! `[0, 100)` belongs to the first category whose threshold exceeds it:
//!
//! ```text
//! [10, 30, 100]  =>  0..=9 -> 0, 10..=29 -> 1, 30..=99 -> 2
//! ```
//!
//! The randomized NFT reduces its VRF word modulo 100 before the lookup.

use serde::{Deserialize, Serialize};

use dogie_types::{Breed, MAX_CHANCE_VALUE};

use crate::{Result, SelectError};

/// Cumulative chances of PUG, SHIBA_INU and ST_BERNARD.
pub const BREED_CHANCES: [u8; Breed::COUNT] = [10, 30, MAX_CHANCE_VALUE];

/// A validated cumulative chance table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct ChanceTable(Vec<u8>);

impl ChanceTable {
    /// Validate a table: non-empty, strictly increasing, last entry 100.
    pub fn new(thresholds: Vec<u8>) -> Result<Self> {
        if thresholds.last() != Some(&MAX_CHANCE_VALUE) {
            return Err(SelectError::InvalidTable(format!(
                "{thresholds:?} must end at {MAX_CHANCE_VALUE}"
            )));
        }
        if thresholds.windows(2).any(|w| w[1] <= w[0]) || thresholds[0] == 0 {
            return Err(SelectError::InvalidTable(format!(
                "{thresholds:?} is not strictly increasing from a non-zero start"
            )));
        }
        Ok(Self(thresholds))
    }

    /// The table the randomized NFT uses for breeds.
    pub fn breeds() -> Self {
        Self(BREED_CHANCES.to_vec())
    }

    pub fn thresholds(&self) -> &[u8] {
        &self.0
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Category of a draw, see [`select_category`].
    pub fn select(&self, value: u8) -> Result<usize> {
        select_category(value, &self.0)
    }

    /// Probability of each category in percent.
    pub fn weights(&self) -> Vec<u8> {
        let mut previous = 0;
        self.0
            .iter()
            .map(|&threshold| {
                let weight = threshold - previous;
                previous = threshold;
                weight
            })
            .collect()
    }
}

impl TryFrom<Vec<u8>> for ChanceTable {
    type Error = SelectError;

    fn try_from(thresholds: Vec<u8>) -> Result<Self> {
        Self::new(thresholds)
    }
}

impl From<ChanceTable> for Vec<u8> {
    fn from(table: ChanceTable) -> Self {
        table.0
    }
}

/// Return the smallest index `i` with `value < table[i]`.
///
/// # Errors
///
/// [`SelectError::OutOfBounds`] if no threshold exceeds `value`, which for a
/// valid table only happens when `value >= 100`.
pub fn select_category(value: u8, table: &[u8]) -> Result<usize> {
    table
        .iter()
        .position(|&threshold| value < threshold)
        .ok_or(SelectError::OutOfBounds { value })
}

/// Reduce a 256-bit big-endian random word modulo 100.
pub fn modded_rng(word: &[u8; 32]) -> u8 {
    let modulus = MAX_CHANCE_VALUE as u32;
    let rem = word
        .iter()
        .fold(0u32, |acc, &byte| (acc * 256 + byte as u32) % modulus);
    // rem < 100
    rem as u8
}

/// Breed for an already reduced draw.
pub fn breed_for_modded_rng(value: u8) -> Result<Breed> {
    let index = select_category(value, &BREED_CHANCES)?;
    Breed::from_index(index).ok_or(SelectError::OutOfBounds { value })
}

/// Breed the randomized NFT mints for a VRF random word.
pub fn breed_for_word(word: &[u8; 32]) -> Breed {
    let value = modded_rng(word);
    match breed_for_modded_rng(value) {
        Ok(breed) => breed,
        // modded_rng is always below the final threshold
        Err(_) => Breed::StBernard,
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    const ALT_TABLE: [u8; 3] = [10, 40, 100];

    #[test]
    fn test_breed_table_ranges() {
        for value in 0..10 {
            assert_eq!(select_category(value, &BREED_CHANCES).expect("in range"), 0);
        }
        for value in 10..30 {
            assert_eq!(select_category(value, &BREED_CHANCES).expect("in range"), 1);
        }
        for value in 30..100 {
            assert_eq!(select_category(value, &BREED_CHANCES).expect("in range"), 2);
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(select_category(9, &BREED_CHANCES).expect("9"), 0);
        assert_eq!(select_category(10, &BREED_CHANCES).expect("10"), 1);
        assert_eq!(select_category(29, &BREED_CHANCES).expect("29"), 1);
        assert_eq!(select_category(30, &BREED_CHANCES).expect("30"), 2);
        assert_eq!(select_category(99, &BREED_CHANCES).expect("99"), 2);
    }

    #[test]
    fn test_alternate_table_shape() {
        assert_eq!(select_category(10, &ALT_TABLE).expect("10"), 1);
        assert_eq!(select_category(39, &ALT_TABLE).expect("39"), 1);
        assert_eq!(select_category(40, &ALT_TABLE).expect("40"), 2);
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(select_category(5, &BREED_CHANCES).expect("5"), 0);
        assert_eq!(select_category(25, &BREED_CHANCES).expect("25"), 1);
        assert_eq!(select_category(75, &BREED_CHANCES).expect("75"), 2);
    }

    #[test]
    fn test_out_of_bounds() {
        let err = select_category(100, &BREED_CHANCES).unwrap_err();
        assert!(matches!(err, SelectError::OutOfBounds { value: 100 }));
        assert!(select_category(0, &[]).is_err());
    }

    #[test]
    fn test_idempotent() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let value: u8 = rng.gen_range(0..100);
            let first = select_category(value, &BREED_CHANCES).expect("first");
            let second = select_category(value, &BREED_CHANCES).expect("second");
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_table_validation() {
        assert!(ChanceTable::new(vec![10, 30, 100]).is_ok());
        assert!(ChanceTable::new(vec![10, 40, 100]).is_ok());
        assert!(ChanceTable::new(vec![100]).is_ok());
        assert!(ChanceTable::new(vec![]).is_err());
        assert!(ChanceTable::new(vec![10, 30, 99]).is_err());
        assert!(ChanceTable::new(vec![30, 10, 100]).is_err());
        assert!(ChanceTable::new(vec![10, 10, 100]).is_err());
        assert!(ChanceTable::new(vec![0, 10, 100]).is_err());
    }

    #[test]
    fn test_table_weights() {
        assert_eq!(ChanceTable::breeds().weights(), vec![10, 20, 70]);
        assert_eq!(ChanceTable::breeds().select(10).expect("10"), 1);
    }

    #[test]
    fn test_modded_rng() {
        assert_eq!(modded_rng(&[0u8; 32]), 0);
        assert_eq!(modded_rng(&[0xff; 32]), 35);

        let mut word = [0u8; 32];
        word[31] = 234;
        assert_eq!(modded_rng(&word), 34);
        word[30] = 1; // 256 + 234 = 490
        assert_eq!(modded_rng(&word), 90);
    }

    #[test]
    fn test_breed_for_word() {
        let mut word = [0u8; 32];
        word[31] = 7;
        assert_eq!(breed_for_word(&word), Breed::Pug);
        word[31] = 115;
        assert_eq!(breed_for_word(&word), Breed::ShibaInu);
        assert_eq!(breed_for_word(&[0xff; 32]), Breed::StBernard);
    }
}
