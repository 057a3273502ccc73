//! Sitesum main entry point
//!
//! This is the command-line interface for the Sitesum crawler.

use anyhow::Context;
use clap::Parser;
use sitesum::config::{read_config, validate, Config, SummaryModel};
use sitesum::crawler::run_crawl;
use sitesum::output::{print_records, print_report, read_records, status_message};
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Sitesum: crawl one website and summarize every page
///
/// Sitesum walks a site breadth-first from START_URL, stays on the start
/// URL's domain, asks a local Ollama model for a short summary of each
/// page, and writes one CSV row per page.
#[derive(Parser, Debug)]
#[command(name = "sitesum")]
#[command(version)]
#[command(about = "Crawl a website and summarize each page", long_about = None)]
struct Cli {
    /// URL to start crawling from (overrides the config file)
    #[arg(value_name = "START_URL")]
    start_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to crawl (1-500)
    #[arg(short = 'n', long, value_name = "N")]
    max_pages: Option<u32>,

    /// Output CSV file
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Model used for summaries
    #[arg(short, long, value_enum)]
    model: Option<SummaryModel>,

    /// Base URL of the Ollama API
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Pause between pages in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Don't print the written records after the crawl
    #[arg(long)]
    no_results: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print the final status line
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    // Ctrl-C stops the crawl after the page in flight
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing current page");
            let _ = shutdown_tx.send(true);
        }
    });

    let output_path = config.crawl.output_path.clone();
    let report = run_crawl(config, Some(shutdown_rx))
        .await
        .context("crawl could not start")?;

    if cli.quiet {
        println!("{}", status_message(&report));
        return Ok(());
    }

    print_report(&report);

    if !cli.no_results {
        let records = read_records(Path::new(&output_path))
            .with_context(|| format!("failed to read results from {}", output_path))?;
        print_records(&records);
    }

    Ok(())
}

/// Loads the config file (if any), applies command-line overrides, validates
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            read_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(start_url) = &cli.start_url {
        config.crawl.start_url = start_url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawl.max_pages = max_pages;
    }
    if let Some(output) = &cli.output {
        config.crawl.output_path = output.clone();
    }
    if let Some(model) = cli.model {
        config.summarizer.model = model;
    }
    if let Some(endpoint) = &cli.endpoint {
        config.summarizer.endpoint = endpoint.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawl.politeness_delay_ms = delay_ms;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitesum=info,warn"),
            1 => EnvFilter::new("sitesum=debug,info"),
            2 => EnvFilter::new("sitesum=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
