//! `dogie upload`

use std::path::{Path, PathBuf};

use anyhow::bail;

use dogie_ipfs::{LocalPinStore, PinataClient, PinningService};

/// Pinning service for this run: the local store when given, else Pinata.
pub fn service(
    api_url: &str,
    local_store: Option<PathBuf>,
    api_key: Option<String>,
    api_secret: Option<String>,
) -> anyhow::Result<Box<dyn PinningService>> {
    if let Some(dir) = local_store {
        tracing::info!(dir = %dir.display(), "pinning into local store");
        return Ok(Box::new(LocalPinStore::open(dir)?));
    }
    match (api_key, api_secret) {
        (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
            Ok(Box::new(PinataClient::new(api_url, key, secret)))
        }
        _ => bail!("PINATA_API_KEY and PINATA_API_SECRET must be set, or pass --local-store"),
    }
}

pub async fn run(service: &dyn PinningService, images: &Path, output: &Path) -> anyhow::Result<()> {
    let report = dogie_ipfs::upload(service, images, output).await?;
    for (image, uri) in report.images.iter().zip(report.token_uris.as_slice()) {
        println!("{}: {uri}", image.name);
    }
    println!("token URIs written to {}", output.display());
    Ok(())
}
