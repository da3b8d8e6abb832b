//! Pending randomness requests.
//!
//! Off-chain mirror of the randomized NFT's `requestId -> requester` map:
//! an entry is inserted when `NftRequested` is observed and removed only by
//! [`RequestLedger::fulfil`], when the matching `NftMinted` arrives.

use std::collections::BTreeMap;

use ethers::types::{Address, U256};

/// Request id to requester, for requests not yet fulfilled.
#[derive(Debug, Default, Clone)]
pub struct RequestLedger {
    pending: BTreeMap<U256, Address>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request. Returns `false` if the id was already pending.
    pub fn record(&mut self, request_id: U256, requester: Address) -> bool {
        if self.pending.contains_key(&request_id) {
            tracing::warn!(%request_id, "request already pending");
            return false;
        }
        self.pending.insert(request_id, requester);
        true
    }

    pub fn requester(&self, request_id: U256) -> Option<Address> {
        self.pending.get(&request_id).copied()
    }

    /// Settle the oldest pending request of `minter`.
    ///
    /// `NftMinted` carries the minter but not the request id, so the
    /// request is matched by requester.
    pub fn fulfil(&mut self, minter: Address) -> Option<U256> {
        let request_id = self
            .pending
            .iter()
            .find(|(_, requester)| **requester == minter)
            .map(|(id, _)| *id)?;
        self.pending.remove(&request_id);
        tracing::debug!(%request_id, ?minter, "request fulfilled");
        Some(request_id)
    }

    pub fn is_pending(&self, request_id: U256) -> bool {
        self.pending.contains_key(&request_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
