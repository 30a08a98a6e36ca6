/// Normalizes an `ETag` response header for the completion manifest.
///
/// Surrounding whitespace and quotes are stripped and the bare value is
/// re-wrapped in exactly one pair of double quotes. Returns `None` when
/// nothing is left, which callers treat as a missing ETag.
pub fn normalize_etag(raw: &str) -> Option<String> {
    let bare = raw.trim().trim_matches('"');
    if bare.is_empty() {
        None
    } else {
        Some(format!("\"{bare}\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_and_bare_normalize_equal() {
        assert_eq!(normalize_etag("abc123").as_deref(), Some("\"abc123\""));
        assert_eq!(normalize_etag("\"abc123\"").as_deref(), Some("\"abc123\""));
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(normalize_etag("  \"abc\" ").as_deref(), Some("\"abc\""));
    }

    #[test]
    fn empty_values_are_missing() {
        assert!(normalize_etag("").is_none());
        assert!(normalize_etag("\"\"").is_none());
        assert!(normalize_etag("   ").is_none());
    }

    #[test]
    fn multipart_style_etag_preserved() {
        assert_eq!(
            normalize_etag("\"9b2cf535f27731c974343645a3985328-3\"").as_deref(),
            Some("\"9b2cf535f27731c974343645a3985328-3\"")
        );
    }
}
