use serde::Deserialize;
use std::fmt;

/// Main configuration structure for Sitesum
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

/// Crawl session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// URL the crawl starts from; its host becomes the target domain
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of pages to visit (1..=500)
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Path of the CSV file records are appended to
    #[serde(rename = "output-path")]
    pub output_path: String,

    /// Pause between successive fetches (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: String::new(),
            max_pages: 100,
            output_path: "OUTPUT.csv".to_string(),
            politeness_delay_ms: 1000,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("sitesum/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

/// Summarization backend configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Base URL of the local Ollama API
    pub endpoint: String,

    /// Model used to generate summaries
    pub model: SummaryModel,

    /// Generation timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: SummaryModel::default(),
            timeout_secs: 120,
        }
    }
}

/// Models the summarizer may be asked to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum SummaryModel {
    #[serde(rename = "llama3")]
    #[value(name = "llama3")]
    Llama3,

    #[default]
    #[serde(rename = "llama3.2:1b")]
    #[value(name = "llama3.2:1b")]
    Llama3_2_1b,

    #[serde(rename = "mistral")]
    #[value(name = "mistral")]
    Mistral,

    #[serde(rename = "gemma")]
    #[value(name = "gemma")]
    Gemma,
}

impl SummaryModel {
    /// Returns the model tag understood by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llama3 => "llama3",
            Self::Llama3_2_1b => "llama3.2:1b",
            Self::Mistral => "mistral",
            Self::Gemma => "gemma",
        }
    }
}

impl fmt::Display for SummaryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
