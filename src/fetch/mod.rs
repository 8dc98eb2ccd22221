//! The fetch boundary of the crawler
//!
//! The crawler core never talks to the network directly; it is handed a
//! [`Fetcher`] and works purely in terms of the [`Fetcher`]/[`Page`] traits.
//! This keeps the concurrency machinery testable against scripted fetchers
//! and keeps transport policy (timeouts, retries, content handling) out of
//! the core.
//!
//! [`HttpFetcher`] is the production implementation, built on `reqwest` with
//! link extraction via `scraper`.

mod http;
mod parse;

pub use http::{build_http_client, HttpFetcher};
pub use parse::extract_links;

use crate::{ExtractError, FetchError};
use async_trait::async_trait;

/// Retrieves pages by URL
///
/// Both trait methods are potentially slow (network or parsing cost); the
/// crawler bounds how many run at once but never imposes its own timeout —
/// a fetcher that wants one carries it internally.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the page behind `link`
    async fn fetch(&self, link: &str) -> Result<Box<dyn Page>, FetchError>;
}

/// A fetched page that can enumerate the links it contains
#[async_trait]
pub trait Page: Send + Sync {
    /// Enumerates the outbound links of this page
    async fn links(&self) -> Result<Vec<String>, ExtractError>;
}
