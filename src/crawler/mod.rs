//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The FIFO frontier with its visited set and domain filter
//! - HTTP fetching with error classification
//! - HTML content extraction
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, Coordinator, CrawlReport, CrawlSession};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use parser::{normalize_whitespace, parse_html, ParsedPage, NO_TITLE};
