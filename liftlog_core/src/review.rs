//! CSV review queue for low-confidence lines.
//!
//! Entries are appended as `raw_line,confidence,source_file,line_no` rows
//! under an exclusive file lock, so several parses (or processes) can
//! share one queue file.

use crate::classify::ReviewSink;
use crate::{Result, ReviewEntry};
use fs2::FileExt;
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A review queue row, optionally carrying a human-assigned label
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ReviewedLine {
    pub raw_line: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub line_no: Option<usize>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Review sink appending to a CSV file
pub struct CsvReviewSink {
    path: PathBuf,
}

impl CsvReviewSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, writing the header if the file is new
    pub fn append(&self, entry: &ReviewEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        // Checked under the lock so two writers cannot both add a header
        let needs_headers = file.metadata()?.len() == 0;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_headers)
            .from_writer(&file);
        writer.serialize(entry)?;
        writer.flush()?;
        drop(writer);

        (&file).flush()?;
        file.unlock()?;

        tracing::debug!("Queued line {} of {} for review", entry.line_no, entry.source_file);
        Ok(())
    }
}

impl ReviewSink for CsvReviewSink {
    fn record(&self, entry: &ReviewEntry) {
        if let Err(e) = self.append(entry) {
            tracing::warn!(
                "Failed to queue line {} of {} for review at {:?}: {}",
                entry.line_no,
                entry.source_file,
                self.path,
                e
            );
        }
    }
}

/// Read every row of a review queue file
///
/// Missing files read as empty; malformed rows are skipped.
pub fn read_review_queue(path: &Path) -> Result<Vec<ReviewedLine>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(&file);

    let mut rows = Vec::new();
    for (row_num, result) in reader.deserialize::<ReviewedLine>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!("Skipping review row {}: {}", row_num + 1, e),
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} review rows from {:?}", rows.len(), path);
    Ok(rows)
}
