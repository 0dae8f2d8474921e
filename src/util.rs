//! Text decoding helpers for content documents.

use std::borrow::Cow;

/// Decode document bytes to a string.
///
/// UTF-8 first (a BOM is handled by encoding_rs), then the hint encoding
/// from `<?xml encoding="..."?>`, then Windows-1252. Valid UTF-8 input is
/// returned without allocating.
pub(crate) fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Pull the `encoding` pseudo-attribute out of a leading XML declaration.
pub(crate) fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    // The declaration must sit at the very start; 100 bytes is plenty.
    let prefix = &bytes[..bytes.len().min(100)];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let (&quote, rest) = after_enc.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value_end = rest.iter().position(|&b| b == quote)?;

    std::str::from_utf8(&rest[..value_end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_xml_encoding() {
        assert_eq!(
            extract_xml_encoding(br#"<?xml version="1.0" encoding="ISO-8859-1"?><html/>"#),
            Some("ISO-8859-1")
        );
        assert_eq!(
            extract_xml_encoding(b"<?xml version='1.0' encoding='utf-8'?>"),
            Some("utf-8")
        );
        assert_eq!(extract_xml_encoding(b"<html></html>"), None);
        assert_eq!(extract_xml_encoding(b"<?xml version=\"1.0\" encoding="), None);
    }

    #[test]
    fn test_decode_utf8_borrows() {
        let decoded = decode_text("Expand \u{2192}".as_bytes(), Some("windows-1252"));
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "Expand \u{2192}");
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        // 0x93/0x94 are curly quotes in Windows-1252 and invalid UTF-8.
        let decoded = decode_text(b"\x93Collapse\x94", None);
        assert_eq!(decoded, "\u{201c}Collapse\u{201d}");
    }
}
