//! Labelled line tables.
//!
//! A training table maps raw log lines to their [`Label`]. It backs a
//! lookup classifier and grows as reviewed lines are folded back in.

use crate::classify::LineClassifier;
use crate::normalize::lookup_key;
use crate::review::ReviewedLine;
use crate::{Classification, Label, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Confidence given to a case- or spacing-insensitive match
const FUZZY_MATCH_CONFIDENCE: f64 = 0.9;

/// One row of the training table
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LabelledLine {
    pub raw_line: String,
    pub label: String,
}

/// Read a `raw_line,label` CSV, skipping malformed rows
pub fn read_labelled_lines(path: &Path) -> Result<Vec<LabelledLine>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<LabelledLine>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!("Skipping labelled row: {}", e),
        }
    }
    Ok(rows)
}

/// Write a `raw_line,label` CSV, replacing the file
pub fn write_labelled_lines(path: &Path, rows: &[LabelledLine]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    tracing::info!("Wrote {} labelled lines to {:?}", rows.len(), path);
    Ok(())
}

/// Fold reviewed lines into the training rows
///
/// Only reviewed rows with a non-empty label are kept. Duplicate lines
/// keep their last label, at the position of that last occurrence.
pub fn merge_labels(training: Vec<LabelledLine>, reviewed: &[ReviewedLine]) -> Vec<LabelledLine> {
    let labelled = reviewed.iter().filter_map(|row| {
        let label = row.label.as_deref()?.trim();
        (!label.is_empty()).then(|| LabelledLine {
            raw_line: row.raw_line.clone(),
            label: label.to_string(),
        })
    });

    let combined: Vec<LabelledLine> = training.into_iter().chain(labelled).collect();

    let mut last_seen = HashMap::new();
    for (i, row) in combined.iter().enumerate() {
        last_seen.insert(row.raw_line.clone(), i);
    }

    combined
        .into_iter()
        .enumerate()
        .filter(|(i, row)| last_seen.get(&row.raw_line) == Some(i))
        .map(|(_, row)| row)
        .collect()
}

/// Classifier answering from a table of already-labelled lines
///
/// Exact (trimmed) matches answer with full confidence; matches that differ
/// only in case or spacing answer slightly lower. Anything else is `OTHER`
/// with zero confidence, which sends it to review.
#[derive(Clone, Debug, Default)]
pub struct LabelTableClassifier {
    exact: HashMap<String, Label>,
    folded: HashMap<String, Label>,
}

impl LabelTableClassifier {
    pub fn from_rows(rows: &[LabelledLine]) -> Self {
        let mut table = Self::default();
        for row in rows {
            match row.label.parse::<Label>() {
                Ok(label) => {
                    table.exact.insert(row.raw_line.trim().to_string(), label);
                    table.folded.insert(lookup_key(&row.raw_line), label);
                }
                Err(e) => tracing::warn!("Ignoring row {:?}: {}", row.raw_line, e),
            }
        }
        table
    }

    /// Load the table from a `raw_line,label` CSV
    pub fn load_from(path: &Path) -> Result<Self> {
        let table = Self::from_rows(&read_labelled_lines(path)?);
        tracing::info!("Loaded {} labelled lines from {:?}", table.len(), path);
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

impl LineClassifier for LabelTableClassifier {
    fn classify(&self, line: &str) -> Result<Classification> {
        if let Some(label) = self.exact.get(line.trim()) {
            return Ok(Classification::new(*label, 1.0));
        }
        if let Some(label) = self.folded.get(&lookup_key(line)) {
            return Ok(Classification::new(*label, FUZZY_MATCH_CONFIDENCE));
        }
        Ok(Classification::unknown())
    }
}
