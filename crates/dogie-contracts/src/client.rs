//! Signing client.

use std::sync::Arc;
use std::time::Duration;

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;

use dogie_types::ChainId;

use crate::{ContractError, Result};

/// Client every command signs and sends through.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Poll interval for receipts and event filters.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Connect to `rpc_url` and sign with `private_key`.
///
/// The wallet is bound to the chain id reported by the node.
pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Arc<SignerClient>> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ContractError::Provider(format!("invalid RPC URL {rpc_url}: {e}")))?
        .interval(POLL_INTERVAL);
    let chain_id = provider.get_chainid().await?.as_u64();

    let wallet = private_key
        .parse::<LocalWallet>()
        .map_err(|e| ContractError::Wallet(e.to_string()))?
        .with_chain_id(chain_id);
    tracing::info!(rpc_url, chain_id, account = ?wallet.address(), "connected");

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

/// Chain id the client signs for.
pub fn chain_id(client: &SignerClient) -> ChainId {
    client.signer().chain_id()
}

/// Account the client signs with.
pub fn account(client: &SignerClient) -> Address {
    client.signer().address()
}
