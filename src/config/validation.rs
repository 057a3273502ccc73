use crate::config::types::{Config, CrawlConfig, FetcherConfig, SummarizerConfig};
use crate::ConfigError;
use url::Url;

/// Smallest page budget a crawl accepts
pub const MIN_PAGES: u32 = 1;

/// Largest page budget a crawl accepts
pub const MAX_PAGES: u32 = 500;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_summarizer_config(&config.summarizer)?;
    Ok(())
}

/// Validates crawl session configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.start_url.is_empty() {
        return Err(ConfigError::Validation(
            "start_url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", config.start_url, e))
    })?;
    validate_http_url(&url, "start_url")?;

    if config.max_pages < MIN_PAGES || config.max_pages > MAX_PAGES {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between {} and {}, got {}",
            MIN_PAGES, MAX_PAGES, config.max_pages
        )));
    }

    if config.output_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "fetcher timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates summarizer configuration
fn validate_summarizer_config(config: &SummarizerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.endpoint).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", config.endpoint, e))
    })?;
    validate_http_url(&url, "endpoint")?;

    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "summarizer timeout_secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Requires an http(s) URL with a host
fn validate_http_url(url: &Url, field: &str) -> Result<(), ConfigError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} must use http or https, got '{}'",
            field,
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "{} must include a host",
            field
        )));
    }

    Ok(())
}
