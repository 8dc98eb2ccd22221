use serde::Deserialize;

/// Concurrency limits for a [`crate::crawler::Crawler`]
///
/// All three limits must be positive; construction of a crawler fails
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Limits {
    /// Maximum number of pages fetched simultaneously
    #[serde(default = "default_downloads")]
    pub downloads: usize,

    /// Maximum number of pages having links extracted simultaneously
    #[serde(default = "default_extractors")]
    pub extractors: usize,

    /// Maximum number of pages fetched simultaneously from one host
    #[serde(rename = "per-host", default = "default_per_host")]
    pub per_host: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            downloads: default_downloads(),
            extractors: default_extractors(),
            per_host: default_per_host(),
        }
    }
}

fn default_downloads() -> usize {
    16
}

fn default_extractors() -> usize {
    16
}

fn default_per_host() -> usize {
    4
}

/// Crawler configuration loaded from a TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlConfig {
    /// Concurrency limits
    #[serde(default)]
    pub limits: Limits,

    /// Substring patterns; links containing any of them are skipped
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Host allow-list; when non-empty, only these hosts are crawled and
    /// the excludes list is ignored
    #[serde(default)]
    pub hosts: Vec<String>,
}
