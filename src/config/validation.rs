use crate::config::types::{CrawlConfig, Limits};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_limits(&config.limits)?;
    validate_excludes(&config.excludes)?;
    validate_hosts(&config.hosts)?;
    Ok(())
}

/// Validates concurrency limits
///
/// Also called by `Crawler::new`, so limits built in code go through the
/// same checks as limits loaded from a file.
pub(crate) fn validate_limits(limits: &Limits) -> Result<(), ConfigError> {
    check_positive(limits.downloads, "downloads")?;
    check_positive(limits.extractors, "extractors")?;
    check_positive(limits.per_host, "per-host")?;
    Ok(())
}

fn check_positive(value: usize, name: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a positive integer, got 0",
            name
        )));
    }
    Ok(())
}

/// Validates exclusion patterns
///
/// An empty pattern is a substring of every link and would exclude the
/// whole crawl, so it is rejected here instead of silently matching.
fn validate_excludes(excludes: &[String]) -> Result<(), ConfigError> {
    for pattern in excludes {
        if pattern.is_empty() {
            return Err(ConfigError::Validation(
                "exclude patterns cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validates host allow-list entries
fn validate_hosts(hosts: &[String]) -> Result<(), ConfigError> {
    for host in hosts {
        if host.is_empty() {
            return Err(ConfigError::Validation(
                "host entries cannot be empty".to_string(),
            ));
        }
        if host.chars().any(|c| c.is_whitespace()) {
            return Err(ConfigError::Validation(format!(
                "host '{}' cannot contain whitespace",
                host
            )));
        }
    }
    Ok(())
}
