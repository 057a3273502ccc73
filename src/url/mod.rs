//! URL handling module for Sitesum
//!
//! This module resolves link references against their page, strips fragments,
//! and derives the crawl domain used to keep a crawl on one site.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::{resolve_url, strip_fragment};

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses a crawl start URL
///
/// The URL must be absolute, use http or https, and have a host. The
/// fragment is stripped so the seed compares equal to links pointing at it.
///
/// # Examples
///
/// ```
/// use sitesum::url::parse_start_url;
///
/// let url = parse_start_url("https://example.com/#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// assert!(parse_start_url("ftp://example.com/").is_err());
/// ```
pub fn parse_start_url(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(strip_fragment(url))
}
