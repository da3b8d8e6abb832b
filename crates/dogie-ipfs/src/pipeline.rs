//! Image → metadata → token URI pipeline.
//!
//! 1. Check the service credentials; nothing is uploaded if they fail.
//! 2. Pin every image in the directory, in file name order. A failed image
//!    is logged and the remaining images are still attempted.
//! 3. Pin one metadata document per pinned image.
//! 4. Persist `ipfs://<metadata cid>` for each breed as the token URI list.
//!
//! The list is only written when every image made it, since the randomized
//! NFT needs exactly one URI per breed.

use std::path::{Path, PathBuf};

use dogie_types::{NftMetadata, TokenUriList, IPFS_SCHEME};

use crate::service::{PinResponse, PinningService};
use crate::{IpfsError, Result};

/// An image pinned under its file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedImage {
    pub file: PathBuf,
    pub name: String,
    pub pin: PinResponse,
}

/// Outcome of pinning a directory of images.
#[derive(Debug, Default)]
pub struct ImageUploads {
    pub pinned: Vec<PinnedImage>,
    /// File name and reason of each failed upload.
    pub failed: Vec<(String, String)>,
}

/// A completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub token_uris: TokenUriList,
    pub images: Vec<PinnedImage>,
    /// Metadata document identifiers, in token URI order.
    pub metadata: Vec<PinResponse>,
}

/// Files of `dir`, sorted by name. Hidden files and subdirectories are skipped.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

async fn pin_image(service: &dyn PinningService, path: &Path, name: &str) -> Result<PinResponse> {
    let contents = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    service.pin_file(&file_name, contents, name).await
}

/// Pin every image in `dir`.
pub async fn store_images(service: &dyn PinningService, dir: &Path) -> Result<ImageUploads> {
    let files = list_images(dir)?;
    if files.is_empty() {
        return Err(IpfsError::NoImages {
            dir: dir.display().to_string(),
        });
    }

    tracing::info!(count = files.len(), dir = %dir.display(), "uploading images");
    let mut uploads = ImageUploads::default();
    for path in files {
        let name = file_stem(&path);
        match pin_image(service, &path, &name).await {
            Ok(pin) => {
                tracing::info!(%name, cid = %pin.ipfs_hash, "✓ uploaded image");
                uploads.pinned.push(PinnedImage {
                    file: path,
                    name,
                    pin,
                });
            }
            Err(e) => {
                tracing::error!(file = %path.display(), "✗ error uploading: {e}");
                uploads
                    .failed
                    .push((path.display().to_string(), e.to_string()));
            }
        }
    }
    Ok(uploads)
}

/// Pin a metadata document under its name.
pub async fn store_token_uri_metadata(
    service: &dyn PinningService,
    metadata: &NftMetadata,
) -> Result<PinResponse> {
    let document = serde_json::to_value(metadata)?;
    let pin = service.pin_json(&document, &metadata.name).await?;
    tracing::info!(name = %metadata.name, cid = %pin.ipfs_hash, "✓ uploaded metadata");
    Ok(pin)
}

/// Pin images and their metadata, returning the token URIs.
pub async fn handle_token_uris(
    service: &dyn PinningService,
    images_dir: &Path,
) -> Result<(TokenUriList, ImageUploads, Vec<PinResponse>)> {
    let uploads = store_images(service, images_dir).await?;
    if !uploads.failed.is_empty() {
        return Err(IpfsError::Incomplete {
            total: uploads.pinned.len() + uploads.failed.len(),
            failed: uploads.failed.into_iter().map(|(file, _)| file).collect(),
        });
    }

    let mut uris = Vec::with_capacity(uploads.pinned.len());
    let mut metadata = Vec::with_capacity(uploads.pinned.len());
    for image in &uploads.pinned {
        let document = NftMetadata::for_breed_image(&image.name, &image.pin.ipfs_hash);
        let pin = store_token_uri_metadata(service, &document).await?;
        uris.push(format!("{IPFS_SCHEME}{}", pin.ipfs_hash));
        metadata.push(pin);
    }
    Ok((TokenUriList::new(uris)?, uploads, metadata))
}

/// Run the whole pipeline and write the token URI list to `output`.
pub async fn upload(
    service: &dyn PinningService,
    images_dir: &Path,
    output: &Path,
) -> Result<UploadReport> {
    service.test_authentication().await?;

    let (token_uris, uploads, metadata) = handle_token_uris(service, images_dir).await?;
    token_uris.save(output)?;
    tracing::info!(path = %output.display(), "token URIs saved");

    Ok(UploadReport {
        token_uris,
        images: uploads.pinned,
        metadata,
    })
}
