//! Output module for persisting and reporting crawl results
//!
//! This module handles:
//! - The [`PageRecord`] written once per successfully fetched page
//! - The [`RecordSink`] boundary and its CSV implementation
//! - Reading records back and printing them after a crawl

mod csv_sink;
pub mod report;
mod traits;

pub use csv_sink::{read_records, CsvSink};
pub use report::{print_records, print_report, status_message};
pub use traits::{
    format_links, PageRecord, RecordSink, SinkError, SinkResult, MAX_LISTED_LINKS, RECORD_HEADERS,
};
