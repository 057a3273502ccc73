//! CSV record sink
//!
//! One file per crawl: created (or truncated) with a header row when the
//! crawl starts, then one row appended and synced per page.

use crate::output::traits::{PageRecord, RecordSink, SinkResult, RECORD_HEADERS};
use csv::{ReaderBuilder, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};

/// [`RecordSink`] writing RFC 4180 CSV
pub struct CsvSink {
    path: PathBuf,
    writer: Writer<File>,
}

impl CsvSink {
    /// Creates the output file and writes the header row
    ///
    /// An existing file at `path` is truncated.
    ///
    /// # Returns
    ///
    /// * `Ok(CsvSink)` - File created with headers flushed to disk
    /// * `Err(SinkError)` - The file could not be created or written
    pub fn create(path: &Path) -> SinkResult<Self> {
        let file = File::create(path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer.write_record(RECORD_HEADERS)?;
        writer.flush()?;
        writer.get_ref().sync_data()?;

        tracing::debug!("Initialized output file {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    /// Returns the output path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvSink {
    fn append(&mut self, record: &PageRecord) -> SinkResult<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

/// Reads every record back from a CSV output file
pub fn read_records(path: &Path) -> SinkResult<Vec<PageRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut records = Vec::new();
    for row in reader.deserialize::<PageRecord>() {
        records.push(row?);
    }
    Ok(records)
}
