//! Content of the stub preview used for formats without an importer.

/// 1x1 transparent PNG shown by the image stub.
pub const PLACEHOLDER_PNG: [u8; 70] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x60, 0x60, 0x60, 0xf8,
    0x0f, 0x00, 0x01, 0x04, 0x01, 0x00, 0xaa, 0xc4, 0xb1, 0xad, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

pub const PLACEHOLDER_MIME: &str = "image/png";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackStyle {
    #[default]
    Text,
    Image,
}

impl FallbackStyle {
    /// Reads `fallback=image|text` from a `?a=b&c=d` query string.
    pub fn from_query(query: &str) -> Option<Self> {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "fallback")
            .and_then(|(_, value)| match value.to_ascii_lowercase().as_str() {
                "image" => Some(FallbackStyle::Image),
                "text" => Some(FallbackStyle::Text),
                _ => None,
            })
    }
}

pub fn unsupported_preview_text(file_name: &str) -> String {
    format!("Preview for \"{file_name}\" is not supported in this demo.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature() {
        assert_eq!(&PLACEHOLDER_PNG[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(&PLACEHOLDER_PNG[PLACEHOLDER_PNG.len() - 8..PLACEHOLDER_PNG.len() - 4], b"IEND");
    }

    #[test]
    fn test_style_from_query() {
        assert_eq!(FallbackStyle::from_query("?fallback=image"), Some(FallbackStyle::Image));
        assert_eq!(
            FallbackStyle::from_query("?debug=1&fallback=TEXT"),
            Some(FallbackStyle::Text)
        );
        assert_eq!(FallbackStyle::from_query(""), None);
        assert_eq!(FallbackStyle::from_query("?fallback=video"), None);
    }

    #[test]
    fn test_preview_text() {
        assert_eq!(
            unsupported_preview_text("part.sldprt"),
            "Preview for \"part.sldprt\" is not supported in this demo."
        );
    }
}
