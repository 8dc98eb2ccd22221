//! Plumb: a depth-bounded concurrent link crawler
//!
//! This crate implements a breadth-first site crawler that fetches a seed
//! URL, extracts its outbound links, and follows them layer by layer up to a
//! fixed hop depth, enforcing a global fetch-concurrency limit, a separate
//! link-extraction limit, and a per-host admission limit with FIFO queuing.

pub mod config;
pub mod crawler;
pub mod fetch;
pub mod url;

use thiserror::Error;

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
///
/// Produced by [`url::host_of`] when a link cannot be keyed by host. The
/// crawler treats these as screening-time failures: the link is recorded in
/// the error map and never fetched.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Errors produced by a [`fetch::Fetcher`] when a page cannot be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Request timeout")]
    Timeout,

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Errors produced by a [`fetch::Page`] when its links cannot be enumerated
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Not an HTML page (content-type: {0})")]
    NotHtml(String),

    #[error("HTML parse error: {0}")]
    Parse(String),
}

/// Per-link failure recorded in a crawl's error map
///
/// A link carrying a [`PageError::Extract`] entry was still downloaded; the
/// other variants terminate the link's branch before any page is obtained.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Bad link: {0}")]
    Link(#[from] UrlError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Link extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{CrawlConfig, Limits};
pub use crawler::{CrawlResult, Crawler};
pub use fetch::{Fetcher, HttpFetcher, Page};
pub use url::host_of;
