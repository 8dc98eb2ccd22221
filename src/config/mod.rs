//! Configuration for the crawler
//!
//! Limits and screening lists can come from CLI flags or from a TOML file;
//! this module owns the file format, the loader, and validation. The same
//! validation runs again inside [`crate::crawler::Crawler::new`], so a
//! programmatically built [`Limits`] cannot bypass it.

mod types;
mod validation;

pub use types::{CrawlConfig, Limits};
pub use validation::validate;

pub(crate) use validation::validate_limits;

use crate::ConfigResult;
use std::path::Path;

/// Loads and validates a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use plumb::config::load_config;
///
/// let config = load_config(Path::new("plumb.toml")).unwrap();
/// println!("Fetch slots: {}", config.limits.downloads);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<CrawlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: CrawlConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}
