//! Threshold image selection for the dynamic SVG NFT.

use dogie_types::Variant;

/// Pick the image a token renders.
///
/// `observed >= threshold` selects [`Variant::High`]; equality favours high.
pub fn select_variant<T: PartialOrd>(observed: &T, threshold: &T) -> Variant {
    if observed >= threshold {
        Variant::High
    } else {
        Variant::Low
    }
}
