//! Export of parsed records.
//!
//! The combined CSV has one row per set, prefixed with the source file:
//! `_source_file,date,program,exercise,set_no,weight_kg,reps,time_sec,iso_load,volume,notes`.

use crate::{Result, SetRecord, SourcedRecord};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "_source_file")]
    source_file: String,
    date: String,
    program: Option<String>,
    exercise: String,
    set_no: Option<u32>,
    weight_kg: Option<f64>,
    reps: Option<i32>,
    time_sec: Option<f64>,
    iso_load: Option<f64>,
    volume: Option<f64>,
    notes: Option<String>,
}

impl From<&SourcedRecord> for CsvRow {
    fn from(row: &SourcedRecord) -> Self {
        let r = &row.record;
        CsvRow {
            source_file: row.source_file.clone(),
            date: r.date.clone(),
            program: r.program.clone(),
            exercise: r.exercise.clone(),
            set_no: r.set_no,
            weight_kg: r.weight_kg,
            reps: r.reps,
            time_sec: r.time_sec,
            iso_load: r.iso_load,
            volume: r.volume,
            notes: r.notes.clone(),
        }
    }
}

impl From<CsvRow> for SourcedRecord {
    fn from(row: CsvRow) -> Self {
        SourcedRecord {
            source_file: row.source_file,
            record: SetRecord {
                date: row.date,
                program: row.program,
                exercise: row.exercise,
                set_no: row.set_no,
                weight_kg: row.weight_kg,
                reps: row.reps,
                time_sec: row.time_sec,
                iso_load: row.iso_load,
                volume: row.volume,
                notes: row.notes,
            },
        }
    }
}

/// Write all records to a CSV file, replacing it
///
/// The file is synced to disk before returning.
pub fn write_records_csv(path: &Path, rows: &[SourcedRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(CsvRow::from(row))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

/// Read records back from a CSV written by [`write_records_csv`]
///
/// Rows that fail to deserialize are logged and skipped.
pub fn read_records_csv(path: &Path) -> Result<Vec<SourcedRecord>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => rows.push(SourcedRecord::from(row)),
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    tracing::debug!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Write records as JSON lines
pub fn write_records_jsonl<W: Write>(mut writer: W, rows: &[SourcedRecord]) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
