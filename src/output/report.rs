//! Console reporting of crawl results
//!
//! This module renders the end-of-crawl status line and the records read
//! back from the output for inspection.

use crate::crawler::CrawlReport;
use crate::output::PageRecord;

/// Longest summary shown per row before it is elided
const SUMMARY_PREVIEW_CHARS: usize = 120;

/// Formats the status message shown when a crawl finishes
pub fn status_message(report: &CrawlReport) -> String {
    format!(
        "Crawling completed. Visited {} pages. Results saved to {}",
        report.pages_visited, report.output
    )
}

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Outcome: {}", report.outcome);
    println!("  Pages visited: {}", report.pages_visited);
    println!("  Records written: {}", report.records_written);
    println!("  Fetch failures: {}", report.fetch_failures);
    println!("  Output failures: {}", report.sink_failures);
    println!(
        "  Duration: {}s",
        (report.finished_at - report.started_at).num_seconds()
    );
    println!();

    println!("{}", status_message(report));
}

/// Prints records as a compact table: URL, title and a summary preview
pub fn print_records(records: &[PageRecord]) {
    println!("\n=== Results ({} records) ===\n", records.len());

    for (index, record) in records.iter().enumerate() {
        println!("{:>3}. {}", index + 1, record.url);
        println!("     Title:   {}", record.title);
        println!("     Summary: {}", preview(&record.summary, SUMMARY_PREVIEW_CHARS));
    }
}

/// Cuts text to `max` characters, marking the cut with an ellipsis
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}
