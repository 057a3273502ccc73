//! Summarization boundary
//!
//! [`Summarizer`] wraps a [`SummaryBackend`] and applies the crawl's
//! summarization policy:
//! - Text under [`MIN_CONTENT_CHARS`] never reaches the backend
//! - Text is cut to [`MAX_CONTENT_CHARS`] before submission
//! - Backend failures become the [`SUMMARY_FAILED`] placeholder
//! - Newline runs in the answer collapse to single spaces
//!
//! The wrapper never returns an error; a bad summary must not stop a crawl.

mod ollama;

pub use ollama::OllamaBackend;

use std::future::Future;
use thiserror::Error;

/// Summary recorded when a page has too little text to summarize
pub const NO_MEANINGFUL_CONTENT: &str = "No meaningful content to summarize";

/// Summary recorded when the backend could not produce one
pub const SUMMARY_FAILED: &str = "Failed to generate summary";

/// Texts shorter than this (in characters) are not summarized
pub const MIN_CONTENT_CHARS: usize = 50;

/// Only this many leading characters are sent to the backend
pub const MAX_CONTENT_CHARS: usize = 4000;

/// Errors a summarization backend can report
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Summarizer request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Summarizer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Summarizer returned an empty response")]
    EmptyResponse,
}

/// Text-in, text-out generation service
pub trait SummaryBackend {
    /// Sends a complete prompt and returns the raw generated text
    fn generate(&self, prompt: &str)
        -> impl Future<Output = Result<String, SummarizeError>> + Send;
}

/// Applies the summarization policy on top of a backend
#[derive(Debug, Clone)]
pub struct Summarizer<B> {
    backend: B,
}

impl<B: SummaryBackend> Summarizer<B> {
    /// Creates a summarizer over the given backend
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Summarizes page text, falling back to placeholders instead of failing
    pub async fn summarize(&self, text: &str) -> String {
        if text.chars().count() < MIN_CONTENT_CHARS {
            return NO_MEANINGFUL_CONTENT.to_string();
        }

        let prompt = build_prompt(truncate_chars(text, MAX_CONTENT_CHARS));

        match self.backend.generate(&prompt).await {
            Ok(summary) => collapse_newlines(&summary),
            Err(e) => {
                tracing::warn!("Error generating summary: {}", e);
                SUMMARY_FAILED.to_string()
            }
        }
    }
}

/// Builds the generation prompt around page text
pub fn build_prompt(content: &str) -> String {
    format!(
        "Summarize the following webpage content in 2-3 sentences:\n\nContent:\n{}\n\nSummary:",
        content
    )
}

/// Returns at most `max` leading characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Replaces each run of newlines with one space and trims the result
pub fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_newlines = false;

    for c in text.chars() {
        if c == '\n' {
            if !in_newlines {
                out.push(' ');
                in_newlines = true;
            }
        } else {
            out.push(c);
            in_newlines = false;
        }
    }

    out.trim().to_string()
}
