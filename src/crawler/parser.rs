//! HTML content extractor
//!
//! This module turns raw markup into what a page record needs:
//! - The page title
//! - The human-readable text, flattened to one line
//! - Every navigational link, resolved to an absolute URL
//!
//! Extraction never fails. html5ever recovers from any markup, so broken
//! pages simply yield less (or empty) content.

use crate::url::resolve_url;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Title recorded for pages without a usable `<title>`
pub const NO_TITLE: &str = "No title";

/// Elements whose text is never part of the page content
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title (from the first <title> tag)
    pub title: Option<String>,

    /// Whitespace-normalized visible text
    pub text: String,

    /// Absolute URLs of all navigational links, in document order
    pub links: Vec<Url>,
}

impl ParsedPage {
    /// Returns the title, or the [`NO_TITLE`] placeholder
    pub fn title_or_placeholder(&self) -> &str {
        self.title.as_deref().unwrap_or(NO_TITLE)
    }
}

/// Parses HTML content and extracts title, text and links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, including nav/header/footer
///
/// **Exclude:**
/// - Fragment-only references (`#section`)
/// - `javascript:`, `mailto:`, `tel:` references
/// - References that do not resolve to http(s)
///
/// No domain filtering happens here; that is the frontier's job.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The page's own URL, used to resolve relative links
///
/// # Example
///
/// ```
/// use sitesum::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Hello</p><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| normalize_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|s| !s.is_empty())
}

/// Collects text nodes outside non-content elements, then normalizes
fn extract_text(document: &Html) -> String {
    let root = document.root_element();
    let mut raw = String::new();

    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let excluded = node.ancestors().any(|ancestor| {
            ElementRef::wrap(ancestor)
                .map(|element| NON_CONTENT_ELEMENTS.contains(&element.value().name()))
                .unwrap_or(false)
        });
        if excluded {
            continue;
        }

        if !raw.is_empty() {
            raw.push(' ');
        }
        raw.push_str(&text.text);
    }

    normalize_whitespace(&raw)
}

/// Extracts all navigational links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_url(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Flattens text to a single line
///
/// Each line is trimmed, split into phrases on double spaces, and the
/// non-empty phrases are joined with single spaces.
pub fn normalize_whitespace(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
