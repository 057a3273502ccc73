use url::Url;

/// Reference prefixes that never lead to another page
const NON_NAVIGATIONAL_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:"];

/// Resolves a link reference against the page it was found on
///
/// # Resolution Rules
///
/// 1. Trim surrounding whitespace; empty references are dropped
/// 2. Drop fragment-only (`#...`), `javascript:`, `mailto:` and `tel:` references
/// 3. Join against `base_url`; unparseable references are dropped
/// 4. Keep only http(s) results
/// 5. Strip the fragment
///
/// Nothing else is canonicalized: trailing slashes, query order and case in
/// the path are left exactly as written.
///
/// # Examples
///
/// ```
/// use sitesum::url::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let url = resolve_url("guide#install", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/guide");
///
/// assert!(resolve_url("mailto:team@example.com", &base).is_none());
/// ```
pub fn resolve_url(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if NON_NAVIGATIONAL_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    absolute.set_fragment(None);
    Some(absolute)
}

/// Removes the `#fragment` part of a URL
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
