//! Crawl frontier: pending URLs plus the visited set
//!
//! The frontier is strictly FIFO, which gives breadth-first traversal. It
//! owns the only copy of the visited set, so admission filtering (target
//! domain, already visited, already pending) happens in one place.

use crate::url::extract_domain;
use crate::{UrlError, UrlResult};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Pending and visited URLs for one crawl session
#[derive(Debug)]
pub struct Frontier {
    /// Domain every admitted URL must share with the seed
    target_domain: String,

    /// URLs waiting to be crawled, oldest first
    pending: VecDeque<Url>,

    /// String forms of everything in `pending`
    enqueued: HashSet<String>,

    /// String forms of every URL handed to the engine and marked visited
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding exactly the start URL
    ///
    /// The target domain is derived from the start URL.
    ///
    /// # Returns
    ///
    /// * `Ok(Frontier)` - Seeded frontier
    /// * `Err(UrlError::MissingDomain)` - The start URL has no host
    pub fn seed(start_url: Url) -> UrlResult<Self> {
        let target_domain = extract_domain(&start_url).ok_or(UrlError::MissingDomain)?;

        let mut enqueued = HashSet::new();
        enqueued.insert(start_url.as_str().to_string());

        let mut pending = VecDeque::new();
        pending.push_back(start_url);

        Ok(Self {
            target_domain,
            pending,
            enqueued,
            visited: HashSet::new(),
        })
    }

    /// Pops the earliest-enqueued URL that has not been visited
    ///
    /// Returns `None` once nothing is pending.
    pub fn next(&mut self) -> Option<Url> {
        while let Some(url) = self.pending.pop_front() {
            self.enqueued.remove(url.as_str());
            if !self.visited.contains(url.as_str()) {
                return Some(url);
            }
            tracing::trace!("Skipping already visited URL: {}", url);
        }
        None
    }

    /// Records a URL as visited; later offers of it are ignored
    ///
    /// Returns false if the URL had already been marked.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    /// Admits a URL to the pending queue
    ///
    /// The URL is dropped silently when its domain differs from the target
    /// domain, when it was already visited, or when it is already pending.
    ///
    /// # Returns
    ///
    /// true if the URL was enqueued
    pub fn offer(&mut self, url: Url) -> bool {
        if !self.in_domain(&url) {
            tracing::trace!("Dropping off-domain URL: {}", url);
            return false;
        }

        let key = url.as_str();
        if self.visited.contains(key) || self.enqueued.contains(key) {
            return false;
        }

        self.enqueued.insert(key.to_string());
        self.pending.push_back(url);
        true
    }

    /// Returns true if the URL belongs to the target domain
    pub fn in_domain(&self, url: &Url) -> bool {
        extract_domain(url).as_deref() == Some(self.target_domain.as_str())
    }

    /// Returns true if the URL has been marked visited
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Returns the domain URLs must belong to
    pub fn target_domain(&self) -> &str {
        &self.target_domain
    }

    /// Returns the number of URLs waiting to be crawled
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Returns the number of URLs marked visited
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
