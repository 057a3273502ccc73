//! Sitesum: a polite single-site crawler that summarizes every page it visits
//!
//! This crate crawls one website breadth-first from a seed URL, extracts the
//! readable text and outbound links of each page, asks a local summarization
//! service for a short digest, and appends one CSV record per page.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod summarizer;
pub mod url;

use thiserror::Error;

/// Main error type for Sitesum operations
///
/// Only crawl setup produces these. Once the crawl loop is running, fetch,
/// summarizer and sink failures are logged and absorbed.
#[derive(Debug, Error)]
pub enum SitesumError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Sink(#[from] output::SinkError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Frontier};
pub use output::PageRecord;
pub use state::CrawlState;
pub use crate::url::{extract_domain, resolve_url};
