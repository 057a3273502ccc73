//! Configuration module for Sitesum
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; command-line flags are layered on top before
//! [`validate`] runs.
//!
//! # Example
//!
//! ```no_run
//! use sitesum::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitesum.toml")).unwrap();
//! println!("Crawling {} for at most {} pages", config.crawl.start_url, config.crawl.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, FetcherConfig, SummarizerConfig, SummaryModel};

// Re-export parser functions
pub use parser::{load_config, parse_config, read_config};
pub use validation::{validate, MAX_PAGES, MIN_PAGES};
