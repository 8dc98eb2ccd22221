//! HTTP fetcher implementation
//!
//! This module is the production [`Fetcher`]: it fetches pages over HTTP(S)
//! with `reqwest` and classifies transport failures into [`FetchError`]
//! variants. Timeouts live here, at the collaborator boundary; the crawler
//! core never enforces one.

use crate::fetch::parse::extract_links;
use crate::fetch::{Fetcher, Page};
use crate::{ExtractError, FetchError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with the crawler's standard configuration
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("plumb/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by an HTTP client
///
/// The client is built once and shared across all requests, so connection
/// pooling works across concurrent fetches.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the standard client configuration
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    /// Creates a fetcher around an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, link: &str) -> Result<Box<dyn Page>, FetchError> {
        let response = self
            .client
            .get(link)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Final URL after redirects; relative links resolve against it
        let final_url = response.url().clone();

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(Box::new(HtmlPage {
            final_url,
            content_type,
            body,
        }))
    }
}

/// A fetched HTTP page
///
/// The body is kept as text; parsing happens lazily in [`Page::links`], on
/// the crawler's extraction pool rather than its fetch pool.
struct HtmlPage {
    final_url: Url,
    content_type: String,
    body: String,
}

#[async_trait]
impl Page for HtmlPage {
    async fn links(&self) -> Result<Vec<String>, ExtractError> {
        if !self.content_type.contains("text/html") {
            return Err(ExtractError::NotHtml(self.content_type.clone()));
        }

        Ok(extract_links(&self.body, &self.final_url))
    }
}

/// Classifies a transport-level error
fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Transport(format!("connection failed: {}", e))
    } else {
        FetchError::Transport(e.to_string())
    }
}
