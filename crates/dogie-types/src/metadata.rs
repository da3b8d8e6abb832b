//! ERC-721 token metadata documents.
//!
//! The randomized NFT points each breed at a metadata document pinned on
//! IPFS; the dynamic SVG NFT builds the same shape on-chain and returns it
//! as a JSON data URI.

use serde::{Deserialize, Serialize};

use crate::{data_uri, Result, IPFS_SCHEME};

/// Trait name attached to every breed document.
pub const CUTENESS_TRAIT: &str = "Cuteness";

/// Value of the cuteness trait.
pub const CUTENESS_VALUE: u64 = 100;

/// A single metadata attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: u64,
}

/// Token metadata document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    /// Image URI: `ipfs://<cid>` for breeds, an SVG data URI for dynamic tokens.
    pub image: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl NftMetadata {
    /// Build the metadata document for a breed image pinned under `image_cid`.
    ///
    /// `name` is the image file stem, e.g. `"pug"`.
    pub fn for_breed_image(name: &str, image_cid: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("An adorable {name} pup!"),
            image: format!("{IPFS_SCHEME}{image_cid}"),
            attributes: vec![Attribute {
                trait_type: CUTENESS_TRAIT.to_string(),
                value: CUTENESS_VALUE,
            }],
        }
    }

    /// Content identifier of the image, if it is an IPFS URI.
    pub fn image_cid(&self) -> Option<&str> {
        self.image.strip_prefix(IPFS_SCHEME)
    }

    /// Decode a `data:application/json;base64,` token URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let json = data_uri::decode(uri)?;
        Ok(serde_json::from_slice(&json)?)
    }
}
