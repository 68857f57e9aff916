//! Address bar input handling

use std::path::Path;
use url::Url;

use crate::error::NavigationError;
use crate::Result;

/// Schemes accepted as-is from the address bar
const KNOWN_SCHEMES: &[&str] = &[
    "http://",
    "https://",
    "file://",
    "ftp://",
    "about:",
    "data:",
    "view-source:",
];

pub fn has_known_scheme(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    KNOWN_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Turn address bar text into a loadable URL.
///
/// Input without a recognized scheme is assumed to be a web address and
/// gets `https://` prepended. No search fallback, no validation beyond that.
pub fn normalize_url(input: &str) -> String {
    let input = input.trim();

    if input.is_empty() {
        return "about:blank".to_string();
    }

    if has_known_scheme(input) {
        return input.to_string();
    }

    format!("https://{}", input)
}

/// Build a `file://` URL for a local document.
pub fn file_url<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let absolute = std::fs::canonicalize(path).map_err(|e| NavigationError::InvalidPath {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    Url::from_file_path(&absolute)
        .map(|url| url.to_string())
        .map_err(|_| NavigationError::InvalidPath {
            path: absolute.display().to_string(),
            reason: "not representable as a file URL".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_domain_gets_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  example.com/path?q=1 "), "https://example.com/path?q=1");
        assert_eq!(normalize_url("localhost:8080"), "https://localhost:8080");
    }

    #[test]
    fn test_known_schemes_pass_through() {
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("HTTPS://Example.com"), "HTTPS://Example.com");
        assert_eq!(normalize_url("file:///tmp/a.html"), "file:///tmp/a.html");
        assert_eq!(normalize_url("about:blank"), "about:blank");
    }

    #[test]
    fn test_scheme_like_prefix_is_not_a_scheme() {
        // "httpbin.org" starts with "http" but has no scheme.
        assert_eq!(normalize_url("httpbin.org"), "https://httpbin.org");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_url("   "), "about:blank");
    }

    #[test]
    fn test_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        std::fs::write(&page, "<html></html>").unwrap();

        let url = file_url(&page).unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("/page.html"));
    }

    #[test]
    fn test_file_url_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = file_url(dir.path().join("missing.html"));
        assert!(matches!(result, Err(NavigationError::InvalidPath { .. })));
    }
}
