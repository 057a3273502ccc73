//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop. One URL is in flight at a time:
//! - Dequeue from the frontier and mark it visited
//! - Fetch, extract, summarize and record the page
//! - Offer its links back to the frontier
//! - Wait out the politeness delay
//!
//! Fetch, summarizer and sink failures are logged and counted; none of them
//! ends the crawl. Only an empty frontier, the page budget, or a stop signal
//! does.

use crate::config::{validate, Config, SummaryModel};
use crate::crawler::fetcher::{FetchResult, Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::parse_html;
use crate::output::{CsvSink, PageRecord, RecordSink};
use crate::state::CrawlState;
use crate::summarizer::{OllamaBackend, Summarizer, SummaryBackend};
use crate::url::{extract_domain, parse_start_url};
use crate::{SitesumError, UrlError};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use url::Url;

/// Parameters of one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlSession {
    /// Seed URL, fragment stripped
    pub start_url: Url,

    /// Domain of the seed; only URLs on it are crawled
    pub target_domain: String,

    /// Maximum number of pages to visit
    pub max_pages: u32,

    /// Where records are written
    pub output_path: PathBuf,

    /// Model summaries are requested from
    pub model: SummaryModel,

    /// Pause between successive pages
    pub politeness_delay: Duration,
}

impl CrawlSession {
    /// Builds a session from validated configuration
    pub fn from_config(config: &Config) -> Result<Self, SitesumError> {
        let start_url = parse_start_url(&config.crawl.start_url)?;
        let target_domain = extract_domain(&start_url).ok_or(UrlError::MissingDomain)?;

        Ok(Self {
            start_url,
            target_domain,
            max_pages: config.crawl.max_pages,
            output_path: PathBuf::from(&config.crawl.output_path),
            model: config.summarizer.model,
            politeness_delay: Duration::from_millis(config.crawl.politeness_delay_ms),
        })
    }
}

/// Outcome of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Terminal state the crawl ended in
    pub outcome: CrawlState,

    /// Pages dequeued and attempted, successful or not
    pub pages_visited: u32,

    /// Records the sink accepted
    pub records_written: u32,

    /// Pages whose fetch failed or returned an empty body
    pub fetch_failures: u32,

    /// Records the sink rejected
    pub sink_failures: u32,

    /// Location of the output
    pub output: String,

    /// When the crawl loop started
    pub started_at: DateTime<Utc>,

    /// When the crawl reached its terminal state
    pub finished_at: DateTime<Utc>,
}

/// Main crawler coordinator structure
///
/// Collaborators are injected so the loop can run against a live site or
/// against scripted fakes.
pub struct Coordinator<F, B, S> {
    session: CrawlSession,
    frontier: Frontier,
    fetcher: F,
    summarizer: Summarizer<B>,
    sink: S,
    state: CrawlState,
    shutdown: Option<watch::Receiver<bool>>,
    pages_visited: u32,
    records_written: u32,
    fetch_failures: u32,
    sink_failures: u32,
}

impl<F, B, S> Coordinator<F, B, S>
where
    F: Fetcher,
    B: SummaryBackend,
    S: RecordSink,
{
    /// Creates a coordinator with its frontier seeded from the session
    ///
    /// # Arguments
    ///
    /// * `session` - The crawl parameters
    /// * `fetcher` - Source of page markup
    /// * `summarizer` - Summarization policy and backend
    /// * `sink` - Initialized record destination
    pub fn new(
        session: CrawlSession,
        fetcher: F,
        summarizer: Summarizer<B>,
        sink: S,
    ) -> Result<Self, SitesumError> {
        let frontier = Frontier::seed(session.start_url.clone())?;

        Ok(Self {
            session,
            frontier,
            fetcher,
            summarizer,
            sink,
            state: CrawlState::Idle,
            shutdown: None,
            pages_visited: 0,
            records_written: 0,
            fetch_failures: 0,
            sink_failures: 0,
        })
    }

    /// Stops the crawl between iterations once `true` is sent on the channel
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Runs the main crawl loop to a terminal state
    ///
    /// A coordinator runs once; calling this again returns the report of
    /// the finished crawl without doing any work.
    pub async fn run(&mut self) -> CrawlReport {
        let started_at = Utc::now();

        if self.state != CrawlState::Idle {
            tracing::warn!("Crawl already ran (state: {}), not restarting", self.state);
            return self.report(started_at);
        }

        self.transition(CrawlState::Running);
        tracing::info!(
            "Starting crawl of {} (domain {}, budget {} pages)",
            self.session.start_url,
            self.session.target_domain,
            self.session.max_pages
        );

        let outcome = loop {
            if self.pages_visited >= self.session.max_pages {
                break CrawlState::BudgetExhausted;
            }

            let url = match self.frontier.next() {
                Some(url) => url,
                None => break CrawlState::Completed,
            };

            if self.frontier.is_visited(&url) {
                continue;
            }

            self.frontier.mark_visited(&url);
            self.pages_visited += 1;
            tracing::info!(
                "Crawling: {} ({}/{})",
                url,
                self.pages_visited,
                self.session.max_pages
            );

            self.process_url(&url).await;

            if self.pages_visited >= self.session.max_pages {
                break CrawlState::BudgetExhausted;
            }
            if self.frontier.is_empty() {
                break CrawlState::Completed;
            }

            tokio::time::sleep(self.session.politeness_delay).await;

            if self.is_cancelled() {
                tracing::info!("Stop requested, ending crawl");
                break CrawlState::Cancelled;
            }
        };

        self.transition(outcome);

        tracing::info!(
            "Crawl {}: visited {} pages, wrote {} records to {}",
            outcome,
            self.pages_visited,
            self.records_written,
            self.sink.destination()
        );
        if self.sink_failures > 0 {
            tracing::warn!(
                "{} records could not be written to {}",
                self.sink_failures,
                self.sink.destination()
            );
        }

        self.report(started_at)
    }

    /// Fetches, extracts, summarizes and records one page
    async fn process_url(&mut self, url: &Url) {
        let body = match self.fetcher.fetch(url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::debug!(
                    "Fetched {} (HTTP {}, {} bytes, final URL {})",
                    url,
                    status_code,
                    body.len(),
                    final_url
                );
                body
            }
            FetchResult::HttpError { status_code } => {
                self.fetch_failures += 1;
                tracing::warn!("Error fetching {}: HTTP status {}", url, status_code);
                return;
            }
            FetchResult::NetworkError { error } => {
                self.fetch_failures += 1;
                tracing::warn!("Error fetching {}: {}", url, error);
                return;
            }
        };

        if body.is_empty() {
            self.fetch_failures += 1;
            tracing::warn!("Empty response from {}, skipping", url);
            return;
        }

        let parsed = parse_html(&body, url);
        let summary = self.summarizer.summarize(&parsed.text).await;

        let site_links: Vec<Url> = parsed
            .links
            .iter()
            .filter(|link| self.frontier.in_domain(link))
            .cloned()
            .collect();
        let record = PageRecord::new(
            url,
            parsed.title_or_placeholder(),
            &summary,
            &parsed.text,
            &site_links,
        );
        match self.sink.append(&record) {
            Ok(()) => self.records_written += 1,
            Err(e) => {
                self.sink_failures += 1;
                tracing::warn!(
                    "Error saving record for {} to {}: {} ({} failed so far)",
                    url,
                    self.sink.destination(),
                    e,
                    self.sink_failures
                );
            }
        }

        let discovered = parsed.links.len();
        let mut admitted = 0;
        for link in parsed.links {
            if self.frontier.offer(link) {
                admitted += 1;
            }
        }
        tracing::debug!(
            "{}: {} links found, {} queued, {} pending",
            url,
            discovered,
            admitted,
            self.frontier.pending_count()
        );
    }

    fn transition(&mut self, next: CrawlState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid crawl transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!("Crawl state {} -> {}", self.state, next);
        self.state = next;
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    fn report(&self, started_at: DateTime<Utc>) -> CrawlReport {
        CrawlReport {
            outcome: self.state,
            pages_visited: self.pages_visited,
            records_written: self.records_written,
            fetch_failures: self.fetch_failures,
            sink_failures: self.sink_failures,
            output: self.sink.destination(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Returns the current crawl state
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Returns the crawl frontier
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Returns the record sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the crawl session
    pub fn session(&self) -> &CrawlSession {
        &self.session
    }
}

/// Runs a crawl against the live network and writes CSV output
///
/// This function:
/// 1. Validates the configuration and builds the crawl session
/// 2. Builds the HTTP client and summarization backend
/// 3. Creates the output file with its header row
/// 4. Runs the crawl loop to a terminal state
///
/// # Arguments
///
/// * `config` - Configuration; validated before anything else happens
/// * `shutdown` - Optional stop signal checked between pages
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl reached a terminal state
/// * `Err(SitesumError)` - Invalid configuration or failed setup; nothing was crawled
///
/// # Example
///
/// ```no_run
/// use sitesum::config::load_config;
/// use sitesum::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sitesum.toml"))?;
/// let report = run_crawl(config, None).await?;
/// println!("Visited {} pages", report.pages_visited);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    shutdown: Option<watch::Receiver<bool>>,
) -> Result<CrawlReport, SitesumError> {
    validate(&config)?;

    let session = CrawlSession::from_config(&config)?;
    let fetcher = HttpFetcher::new(&config.fetcher)?;
    let summarizer = Summarizer::new(OllamaBackend::new(&config.summarizer)?);
    let sink = CsvSink::create(Path::new(&session.output_path))?;

    tracing::info!(
        "Summarizing with {} at {}",
        session.model,
        config.summarizer.endpoint
    );

    let mut coordinator = Coordinator::new(session, fetcher, summarizer, sink)?;
    if let Some(rx) = shutdown {
        coordinator = coordinator.with_shutdown(rx);
    }

    Ok(coordinator.run().await)
}
