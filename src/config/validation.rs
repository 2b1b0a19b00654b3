use crate::config::types::{Config, CrawlerConfig, HttpConfig, PageFixture};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Largest accepted `max-depth`
pub const MAX_DEPTH_LIMIT: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_pages(&config.pages)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    Url::parse(&config.seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed '{}': {}", config.seed, e)))?;

    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates fixture pages: every URL parses and appears once
fn validate_pages(pages: &[PageFixture]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for page in pages {
        Url::parse(&page.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid page URL '{}': {}", page.url, e))
        })?;

        if !seen.insert(page.url.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Page '{}' is defined more than once",
                page.url
            )));
        }
    }

    Ok(())
}
