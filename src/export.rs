//! Serialization of graphic nodes into exportable forms.

use crate::error::{Result, StickerError};
use crate::markup::{SVG_NAMESPACE, SvgElement};

/// MIME type of exported SVG data.
pub const SVG_MIME_TYPE: &str = "image/svg+xml;charset=utf-8";

const DATA_URL_PREFIX: &str = "data:image/svg+xml;charset=utf-8,";

// ============================================================================
// SvgBlob
// ============================================================================

/// Serialized SVG bytes tagged with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgBlob {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

impl SvgBlob {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The blob contents as markup.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Serializes a node as a standalone document. The root always declares the
/// SVG namespace so the output can be loaded as an image.
pub fn serialize(node: &SvgElement) -> String {
    if node.has_attr("xmlns") {
        return node.to_markup();
    }
    let mut root = node.clone();
    root.prepend_attr("xmlns", SVG_NAMESPACE);
    root.to_markup()
}

/// `data:image/svg+xml;charset=utf-8,` followed by the percent-encoded markup.
pub fn to_data_url(node: &SvgElement) -> String {
    to_data_url_from_markup(&serialize(node))
}

pub fn to_data_url_from_markup(markup: &str) -> String {
    format!("{DATA_URL_PREFIX}{}", encode_uri_component(markup))
}

pub fn to_blob(node: &SvgElement) -> SvgBlob {
    SvgBlob {
        mime_type: SVG_MIME_TYPE,
        data: serialize(node).into_bytes(),
    }
}

/// Recovers the markup from a data URL produced by [`to_data_url`].
pub fn markup_from_data_url(data_url: &str) -> Result<String> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| StickerError::Decode("malformed data URL".into()))?;

    if !header.starts_with("data:image/svg+xml") {
        return Err(StickerError::Decode(format!("unsupported data URL type: {header}")));
    }
    if header.ends_with(";base64") {
        return Err(StickerError::Decode("base64 data URLs are not supported".into()));
    }

    decode_uri_component(payload)
}

// ============================================================================
// Percent encoding
// ============================================================================

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, the set
/// left alone by script hosts' `encodeURIComponent`.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3 / 2);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

pub fn decode_uri_component(input: &str) -> Result<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| StickerError::Decode(format!("bad percent escape at byte {i}")))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|e| StickerError::Decode(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(encode_uri_component("<svg a=\"1\"/>"), "%3Csvg%20a%3D%221%22%2F%3E");
        assert_eq!(encode_uri_component("#fff"), "%23fff");
        assert_eq!(encode_uri_component("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn decode_reverses_encode() {
        let markup = r##"<svg fill="#123456">héllo &amp; bye</svg>"##;
        assert_eq!(decode_uri_component(&encode_uri_component(markup)).unwrap(), markup);
        assert!(decode_uri_component("%G1").is_err());
        assert!(decode_uri_component("%2").is_err());
    }

    #[test]
    fn serialize_adds_missing_namespace() {
        let node = SvgElement::new("svg").with_attr("viewBox", "0 0 1 1");
        assert_eq!(
            serialize(&node),
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 1"/>"#
        );

        let declared = SvgElement::new("svg").with_attr("xmlns", SVG_NAMESPACE);
        assert_eq!(serialize(&declared), declared.to_markup());
    }

    #[test]
    fn data_url_round_trip() {
        let node = SvgElement::new("svg").with_attr("width", "10");
        let url = to_data_url(&node);
        assert!(url.starts_with("data:image/svg+xml;charset=utf-8,%3Csvg"));
        assert_eq!(markup_from_data_url(&url).unwrap(), serialize(&node));
    }

    #[test]
    fn rejects_foreign_data_urls() {
        assert!(markup_from_data_url("data:image/png,abc").is_err());
        assert!(markup_from_data_url("data:image/svg+xml;base64,PHN2Zz4=").is_err());
        assert!(markup_from_data_url("no comma").is_err());
    }

    #[test]
    fn blob_carries_mime_type() {
        let blob = to_blob(&SvgElement::new("svg"));
        assert_eq!(blob.mime_type, "image/svg+xml;charset=utf-8");
        assert_eq!(blob.as_str(), Some(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#));
    }
}
