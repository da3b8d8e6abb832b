//! Images embedded by the dynamic SVG NFT.

use std::path::Path;

use dogie_types::data_uri::svg_to_image_uri;
use dogie_types::Variant;

use crate::{DeployError, Result};

/// Low variant file name.
pub const LOW_SVG: &str = "frown.svg";

/// High variant file name.
pub const HIGH_SVG: &str = "happy.svg";

/// Raw SVG markup of both variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantImages {
    pub low: String,
    pub high: String,
}

impl VariantImages {
    /// Read `frown.svg` and `happy.svg` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            low: read_svg(&dir.join(LOW_SVG))?,
            high: read_svg(&dir.join(HIGH_SVG))?,
        })
    }

    pub fn svg(&self, variant: Variant) -> &str {
        match variant {
            Variant::Low => &self.low,
            Variant::High => &self.high,
        }
    }

    /// Image URI the contract serves for a variant.
    pub fn image_uri(&self, variant: Variant) -> String {
        svg_to_image_uri(self.svg(variant))
    }
}

fn read_svg(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DeployError::MissingAsset {
            path: path.display().to_string(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}
