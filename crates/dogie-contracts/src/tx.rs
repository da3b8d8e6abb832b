//! Transaction submission.

use std::time::Duration;

use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::providers::Middleware;
use ethers::types::{TransactionReceipt, U64};

use crate::{ContractError, Result};

/// Send `call`, wait for `confirmations` blocks and check the receipt status.
///
/// The wait is bounded by `timeout`; there is no resubmission.
pub async fn send_and_confirm<M, D>(
    call: &ContractCall<M, D>,
    label: &str,
    confirmations: usize,
    timeout: Duration,
) -> Result<TransactionReceipt>
where
    M: Middleware + 'static,
    D: Detokenize,
{
    let pending = call
        .send()
        .await
        .map_err(|e| ContractError::call(label, e))?;
    let tx = *pending;
    tracing::info!(label, ?tx, "transaction sent");

    let receipt = tokio::time::timeout(timeout, pending.confirmations(confirmations))
        .await
        .map_err(|_| ContractError::Timeout {
            what: format!("{label} receipt"),
            secs: timeout.as_secs(),
        })?
        .map_err(ContractError::from)?
        .ok_or(ContractError::Dropped { tx })?;

    ensure_success(&receipt, label)?;
    tracing::info!(
        label,
        ?tx,
        block = ?receipt.block_number,
        gas_used = ?receipt.gas_used,
        "transaction confirmed"
    );
    Ok(receipt)
}

/// Fail with [`ContractError::Reverted`] unless the receipt status is 1.
pub fn ensure_success(receipt: &TransactionReceipt, label: &str) -> Result<()> {
    if receipt.status != Some(U64::from(1)) {
        return Err(ContractError::Reverted {
            label: label.to_string(),
            tx: receipt.transaction_hash,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverted_receipt() {
        let receipt = TransactionReceipt {
            status: Some(U64::zero()),
            ..Default::default()
        };
        let err = ensure_success(&receipt, "mintNft").unwrap_err();
        assert!(matches!(err, ContractError::Reverted { ref label, .. } if label == "mintNft"));
    }

    #[test]
    fn test_successful_receipt() {
        let receipt = TransactionReceipt {
            status: Some(U64::from(1)),
            ..Default::default()
        };
        assert!(ensure_success(&receipt, "mintNft").is_ok());
    }
}
