//! URL handling for the crawler
//!
//! The only URL-level operation the crawler core needs is deriving the host
//! key used by the per-host admission gate. Links are otherwise opaque
//! strings: no normalization is applied, and equality is exact string
//! equality.

use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the host from a link
///
/// This function parses the link and returns the lowercased host portion,
/// which the crawler uses as the admission-gate key. The port is ignored.
///
/// Malformed links and links without a host fail with a [`UrlError`]; the
/// crawler records such links as failed at screening time, before any fetch
/// is attempted.
///
/// # Examples
///
/// ```
/// use plumb::url::host_of;
///
/// assert_eq!(host_of("https://Example.COM/path").unwrap(), "example.com");
/// assert_eq!(host_of("https://sub.example.com:8080/").unwrap(), "sub.example.com");
/// assert!(host_of("not a url").is_err());
/// ```
pub fn host_of(link: &str) -> UrlResult<String> {
    let url = Url::parse(link).map_err(|e| UrlError::Parse(e.to_string()))?;
    url.host_str()
        .map(|h| h.to_lowercase())
        .ok_or(UrlError::MissingHost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_host() {
        assert_eq!(host_of("https://example.com/").unwrap(), "example.com");
    }

    #[test]
    fn test_subdomain() {
        assert_eq!(
            host_of("https://blog.example.com/post").unwrap(),
            "blog.example.com"
        );
    }

    #[test]
    fn test_port_ignored() {
        assert_eq!(
            host_of("http://example.com:8080/").unwrap(),
            "example.com"
        );
    }

    #[test]
    fn test_uppercase_converted_to_lowercase() {
        assert_eq!(host_of("https://EXAMPLE.COM/").unwrap(), "example.com");
    }

    #[test]
    fn test_path_and_query_ignored() {
        assert_eq!(
            host_of("https://example.com/path/to/page?query=value").unwrap(),
            "example.com"
        );
    }

    #[test]
    fn test_malformed_link() {
        assert!(matches!(host_of("not a url"), Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_relative_link() {
        assert!(host_of("/relative/path").is_err());
    }

    #[test]
    fn test_missing_host() {
        assert!(matches!(
            host_of("data:text/plain,hello"),
            Err(UrlError::MissingHost)
        ));
    }

    #[test]
    fn test_deterministic() {
        let a = host_of("https://example.com/a").unwrap();
        let b = host_of("https://example.com/b").unwrap();
        assert_eq!(a, b);
    }
}
