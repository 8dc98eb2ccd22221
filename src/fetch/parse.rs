//! HTML link extraction
//!
//! Pulls followable links out of a page body:
//! - `<a href="...">` tags, unless marked `download`
//! - `<link rel="canonical" href="...">`
//!
//! Skipped: `javascript:`, `mailto:`, `tel:` and `data:` hrefs, fragment-only
//! anchors, and anything that does not resolve to an HTTP(S) URL.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable links from an HTML document
///
/// Relative hrefs are resolved against `base_url`. Unresolvable or
/// non-HTTP(S) hrefs are dropped silently; a malformed document simply
/// yields fewer links, since the parser is lenient.
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Fragment-only links point back at the same page
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(links, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_relative_link() {
        let html = r#"<html><body><a href="/other">Link</a></body></html>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(links, vec!["https://example.com/other"]);
    }

    #[test]
    fn test_extract_relative_path_link() {
        let html = r#"<html><body><a href="other">Link</a></body></html>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(links, vec!["https://example.com/other"]);
    }

    #[test]
    fn test_skip_javascript_link() {
        let html = r#"<html><body><a href="javascript:void(0)">Link</a></body></html>"#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_skip_mailto_and_tel_links() {
        let html = r#"<html><body>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
        </body></html>"#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_skip_data_uri() {
        let html = r#"<html><body><a href="data:text/html,<h1>Test</h1>">Data</a></body></html>"#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let html = r#"<html><body><a href="/file.pdf" download>Download</a></body></html>"#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let html = r##"<html><body><a href="#section">Jump</a></body></html>"##;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_extract_canonical_link() {
        let html = r#"<html><head><link rel="canonical" href="https://example.com/canonical" /></head><body></body></html>"#;
        let links = extract_links(html, &base_url());
        assert!(links.contains(&"https://example.com/canonical".to_string()));
    }

    #[test]
    fn test_mixed_valid_and_invalid_links() {
        let html = r#"
            <html>
            <body>
                <a href="/valid">Valid</a>
                <a href="javascript:alert('no')">Invalid</a>
                <a href="mailto:test@example.com">Invalid</a>
                <a href="/another-valid">Valid</a>
            </body>
            </html>
        "#;
        assert_eq!(extract_links(html, &base_url()).len(), 2);
    }

    #[test]
    fn test_non_http_scheme_dropped() {
        let html = r#"<html><body><a href="ftp://example.com/file">FTP</a></body></html>"#;
        assert!(extract_links(html, &base_url()).is_empty());
    }
}
