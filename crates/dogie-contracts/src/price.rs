//! ETH/USD price feed readings.

use std::time::Duration;

use ethers::providers::Middleware;
use ethers::types::{I256, U256};
use ethers::utils::format_units;

use dogie_select::select_variant;
use dogie_types::Variant;

use crate::bindings::PriceFeed;
use crate::{ContractError, Result};

/// Age after which a feed answer is reported as stale.
pub const STALE_AFTER: Duration = Duration::from_secs(60 * 60);

/// Latest round of a price feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceReading {
    pub round_id: u128,
    /// Price scaled by `10^decimals`.
    pub answer: I256,
    /// Unix time of the last update.
    pub updated_at: u64,
    pub decimals: u8,
}

impl PriceReading {
    /// Read the latest round.
    pub async fn fetch<M: Middleware + 'static>(feed: &PriceFeed<M>) -> Result<Self> {
        let decimals = feed
            .decimals()
            .call()
            .await
            .map_err(|e| ContractError::call("decimals", e))?;
        let (round_id, answer, _started_at, updated_at, _answered_in_round) = feed
            .latest_round_data()
            .call()
            .await
            .map_err(|e| ContractError::call("latestRoundData", e))?;
        Ok(Self {
            round_id,
            answer,
            updated_at: clamp_u64(updated_at),
            decimals,
        })
    }

    /// Seconds since the last update.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.updated_at)
    }

    pub fn is_stale(&self, now: u64, max_age: Duration) -> bool {
        self.age(now) > max_age.as_secs()
    }

    /// Image a token with this high-value threshold renders at this price.
    pub fn variant_for(&self, threshold: I256) -> Variant {
        select_variant(&self.answer, &threshold)
    }

    /// Human readable price, e.g. `"2000.00000000"`.
    pub fn display_price(&self) -> String {
        format_units(self.answer, self.decimals as u32).unwrap_or_else(|_| self.answer.to_string())
    }
}

fn clamp_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}
