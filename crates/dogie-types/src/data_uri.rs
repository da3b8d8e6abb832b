//! Base64 data URIs as produced by the dynamic SVG NFT.
//!
//! The contract stores each SVG as `data:image/svg+xml;base64,<svg>` and
//! returns token metadata as `data:application/json;base64,<json>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::{Result, TypesError};

/// Prefix of an SVG image data URI.
pub const SVG_PREFIX: &str = "data:image/svg+xml;base64,";

/// Prefix of a JSON document data URI.
pub const JSON_PREFIX: &str = "data:application/json;base64,";

/// Encode raw SVG markup as an image data URI.
pub fn svg_to_image_uri(svg: &str) -> String {
    format!("{SVG_PREFIX}{}", STANDARD.encode(svg.as_bytes()))
}

/// Decode the payload of a base64 data URI, whatever its media type.
pub fn decode(uri: &str) -> Result<Vec<u8>> {
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| TypesError::InvalidDataUri("missing ',' separator".to_string()))?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(TypesError::InvalidDataUri(format!(
            "unsupported header {header:?}"
        )));
    }
    STANDARD
        .decode(payload)
        .map_err(|e| TypesError::InvalidDataUri(e.to_string()))
}

/// Decode a data URI whose payload is UTF-8 text.
pub fn decode_text(uri: &str) -> Result<String> {
    String::from_utf8(decode(uri)?).map_err(|e| TypesError::InvalidDataUri(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_uri_decodes_to_source() {
        let svg = "<svg>test</svg>";
        let uri = svg_to_image_uri(svg);
        assert!(uri.starts_with(SVG_PREFIX));
        assert_eq!(decode_text(&uri).expect("decode"), svg);
    }

    #[test]
    fn test_rejects_non_data_uri() {
        assert!(decode("ipfs://QmHash").is_err());
        assert!(decode("data:text/plain,hello").is_err());
    }

    #[test]
    fn test_rejects_bad_base64() {
        let err = decode("data:application/json;base64,***").unwrap_err();
        assert!(matches!(err, TypesError::InvalidDataUri(_)));
    }
}
