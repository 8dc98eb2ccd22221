//! End-to-end tests over the HTTP fetcher
//!
//! These tests use wiremock to serve small HTML sites and run the full
//! crawler against them through [`plumb::HttpFetcher`].

use plumb::config::Limits;
use plumb::{Crawler, FetchError, HttpFetcher, PageError};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn limits() -> Limits {
    Limits {
        downloads: 4,
        extractors: 4,
        per_host: 2,
    }
}

fn crawler() -> Crawler {
    let fetcher = Arc::new(HttpFetcher::new().expect("Failed to build HTTP client"));
    Crawler::new(fetcher, &limits()).expect("Failed to create crawler")
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string().into_bytes(), "text/html")
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body>
            <a href="{}/page1">Page 1</a>
            <a href="{}/page2">Page 2</a>
            </body></html>"#,
            base, base
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page(
            r#"<html><body><a href="/page2">Page 2</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_page("<html><body>No links here</body></html>"))
        .mount(&server)
        .await;

    let crawler = crawler();
    let result = crawler.crawl(&format!("{}/", base), 2).await;

    assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
    assert_eq!(result.downloaded.len(), 3);
    assert!(result.downloaded.contains(&format!("{}/", base)));
    assert!(result.downloaded.contains(&format!("{}/page1", base)));
    assert!(result.downloaded.contains(&format!("{}/page2", base)));
}

#[tokio::test]
async fn test_relative_links_resolve_against_final_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/section/index"))
        .respond_with(html_page(
            r#"<html><body><a href="leaf">Leaf</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/section/leaf"))
        .respond_with(html_page("<html><body></body></html>"))
        .mount(&server)
        .await;

    let crawler = crawler();
    let result = crawler.crawl(&format!("{}/section/index", base), 2).await;

    assert!(result.errors.is_empty());
    assert!(result
        .downloaded
        .contains(&format!("{}/section/leaf", base)));
}

#[tokio::test]
async fn test_http_error_recorded_per_link() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body><a href="{}/missing">Missing</a></body></html>"#,
            base
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let crawler = crawler();
    let result = crawler.crawl(&format!("{}/", base), 2).await;

    assert!(result.downloaded.contains(&format!("{}/", base)));
    assert!(!result.downloaded.contains(&format!("{}/missing", base)));
    assert!(matches!(
        result.errors.get(&format!("{}/missing", base)),
        Some(PageError::Fetch(FetchError::Status(404)))
    ));
}

#[tokio::test]
async fn test_non_html_link_downloaded_but_not_expanded() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body><a href="{}/report.pdf">Report</a></body></html>"#,
            base
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46])
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    let crawler = crawler();
    let result = crawler.crawl(&format!("{}/", base), 2).await;

    // The PDF was fetched, but it yields no links and records the reason
    assert!(result.downloaded.contains(&format!("{}/report.pdf", base)));
    assert!(matches!(
        result.errors.get(&format!("{}/report.pdf", base)),
        Some(PageError::Extract(_))
    ));
}

#[tokio::test]
async fn test_restricted_crawl_never_contacts_foreign_host() {
    let server = MockServer::start().await;
    let base = server.uri();
    let host = url::Url::parse(&base)
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    // The page links to a host that does not resolve; a restricted crawl
    // must skip it without attempting a fetch
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><body>
            <a href="{}/inside">Inside</a>
            <a href="https://elsewhere.invalid/">Outside</a>
            </body></html>"#,
            base
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/inside"))
        .respond_with(html_page("<html><body></body></html>"))
        .mount(&server)
        .await;

    let crawler = crawler();
    let result = crawler
        .crawl_restricted(&format!("{}/", base), 2, &[host])
        .await;

    assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
    assert_eq!(result.downloaded.len(), 2);
    assert!(!result
        .downloaded
        .contains(&"https://elsewhere.invalid/".to_string()));
}
