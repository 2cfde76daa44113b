//! Text decoding for XML parts.
//!
//! OOXML producers write XML parts as UTF-8 almost universally, but UTF-16
//! parts (with or without a byte order mark) do appear in the wild. The XML
//! query engine works on `&str`, so every part is funneled through
//! [`decode_xml_text`] first.

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use std::borrow::Cow;

/// Unicode encodings recognised by their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomKind {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl BomKind {
    #[inline]
    fn encoding(self) -> &'static Encoding {
        match self {
            BomKind::Utf8 => UTF_8,
            BomKind::Utf16Le => UTF_16LE,
            BomKind::Utf16Be => UTF_16BE,
        }
    }
}

/// Sniff the encoding of an XML byte stream.
///
/// Returns the detected kind together with the length of its byte order mark
/// (zero when the encoding was inferred from a BOM-less `<` character).
pub fn sniff_xml_encoding(bytes: &[u8]) -> Option<(BomKind, usize)> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let kind = if encoding == UTF_16LE {
            BomKind::Utf16Le
        } else if encoding == UTF_16BE {
            BomKind::Utf16Be
        } else {
            BomKind::Utf8
        };
        return Some((kind, bom_len));
    }

    match bytes {
        [b'<', 0, ..] => Some((BomKind::Utf16Le, 0)),
        [0, b'<', ..] => Some((BomKind::Utf16Be, 0)),
        _ => None,
    }
}

/// Decode the bytes of an XML part into text.
///
/// UTF-8 input without a BOM is borrowed; invalid UTF-8 or UTF-16 sequences are
/// reported as an error message rather than replaced.
pub fn decode_xml_text(bytes: &[u8]) -> Result<Cow<'_, str>, String> {
    match sniff_xml_encoding(bytes) {
        None => std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| format!("invalid UTF-8: {}", e)),
        Some((kind, bom_len)) => {
            let encoding = kind.encoding();
            encoding
                .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
                .ok_or_else(|| format!("invalid {} sequence", encoding.name()))
        },
    }
}
