//! Record sink traits and types
//!
//! This module defines the trait interface for record sinks and the
//! [`PageRecord`] they persist.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Column headers, in field order
pub const RECORD_HEADERS: [&str; 5] = ["URL", "Title", "Summary", "Content", "Links"];

/// Number of links written out in full before the remainder is counted
pub const MAX_LISTED_LINKS: usize = 10;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type SinkResult<T> = Result<T, SinkError>;

/// One crawled page, as written to the output
///
/// Field order matches [`RECORD_HEADERS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Summary")]
    pub summary: String,

    /// Full extracted text
    #[serde(rename = "Content")]
    pub content: String,

    /// First links, comma-separated, with a count of the rest
    #[serde(rename = "Links")]
    pub links: String,
}

impl PageRecord {
    /// Builds a record, capping the link list
    pub fn new(url: &Url, title: &str, summary: &str, content: &str, links: &[Url]) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
            content: content.to_string(),
            links: format_links(links),
        }
    }
}

/// Formats the links field of a record
///
/// The first [`MAX_LISTED_LINKS`] links are joined with `", "`; when there
/// are more, `" and <k> more"` is appended.
///
/// # Example
///
/// ```
/// use sitesum::output::format_links;
/// use url::Url;
///
/// let links: Vec<Url> = (0..12)
///     .map(|i| Url::parse(&format!("https://example.com/{}", i)).unwrap())
///     .collect();
/// assert!(format_links(&links).ends_with("https://example.com/9 and 2 more"));
/// ```
pub fn format_links(links: &[Url]) -> String {
    let listed = links
        .iter()
        .take(MAX_LISTED_LINKS)
        .map(Url::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    if links.len() > MAX_LISTED_LINKS {
        format!("{} and {} more", listed, links.len() - MAX_LISTED_LINKS)
    } else {
        listed
    }
}

/// Append-only destination for page records
///
/// Implementations must make each record durable before `append` returns.
pub trait RecordSink {
    /// Writes one record
    fn append(&mut self, record: &PageRecord) -> SinkResult<()>;

    /// Human-readable location of the output (a path for file sinks)
    fn destination(&self) -> String;
}
