//! Ollama generation backend
//!
//! Talks to a local Ollama server through its non-streaming
//! `POST /api/generate` endpoint.

use crate::config::{SummarizerConfig, SummaryModel};
use crate::summarizer::{SummarizeError, SummaryBackend};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body for `/api/generate`
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// The part of the `/api/generate` response we use
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// [`SummaryBackend`] for an Ollama server
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: Client,
    generate_url: String,
    model: SummaryModel,
}

impl OllamaBackend {
    /// Creates a backend from configuration
    ///
    /// The configured timeout bounds each generation request; when it
    /// elapses the request counts as failed.
    pub fn new(config: &SummarizerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            generate_url: format!("{}/api/generate", config.endpoint.trim_end_matches('/')),
            model: config.model,
        })
    }
}

impl SummaryBackend for OllamaBackend {
    async fn generate(&self, prompt: &str) -> Result<String, SummarizeError> {
        let request = GenerateRequest {
            model: self.model.as_str(),
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.generate_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse = response.json().await?;
        if generated.response.trim().is_empty() {
            return Err(SummarizeError::EmptyResponse);
        }

        tracing::debug!(
            "Generated {} character summary with {}",
            generated.response.len(),
            self.model
        );
        Ok(generated.response)
    }
}
