//! Core domain types for workout-log parsing.
//!
//! This module defines the fundamental types used throughout the system:
//! - Parsed set records and the per-file parse context
//! - Line labels and classifier answers
//! - Review queue entries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Records
// ============================================================================

/// One structured set extracted from a log line
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SetRecord {
    pub date: String,
    pub program: Option<String>,
    pub exercise: String,
    pub set_no: Option<u32>,
    pub weight_kg: Option<f64>,
    pub reps: Option<i32>,
    pub time_sec: Option<f64>,
    /// weight x time, only for timed holds
    pub iso_load: Option<f64>,
    /// weight x reps
    pub volume: Option<f64>,
    pub notes: Option<String>,
}

impl SetRecord {
    /// Append a note, joining onto any existing note with `" ; "`
    pub fn append_note(&mut self, note: &str) {
        self.notes = Some(match self.notes.take() {
            Some(existing) => format!("{} ; {}", existing, note),
            None => note.to_string(),
        });
    }
}

/// A set record tagged with the file it came from
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SourcedRecord {
    pub source_file: String,
    #[serde(flatten)]
    pub record: SetRecord,
}

// ============================================================================
// Parse Context
// ============================================================================

/// Running context while walking one file
///
/// A fresh context is created per file and is never shared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseContext {
    pub current_date: Option<String>,
    pub current_program: Option<String>,
    pub current_exercise: Option<String>,
}

impl ParseContext {
    /// Date and exercise are both known, so a set can be recorded
    pub fn is_active(&self) -> bool {
        self.current_date.is_some() && self.current_exercise.is_some()
    }

    /// Start a new dated session; the previous exercise no longer applies
    pub fn start_session(&mut self, date: String, program: String) {
        self.current_date = Some(date);
        self.current_program = Some(program);
        self.current_exercise = None;
    }

    pub fn clear_exercise(&mut self) {
        self.current_exercise = None;
    }

    /// Build a record from the current context, if it is active
    pub fn record(&self) -> Option<SetRecord> {
        Some(SetRecord {
            date: self.current_date.clone()?,
            program: self.current_program.clone(),
            exercise: self.current_exercise.clone()?,
            ..SetRecord::default()
        })
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Line category produced by the fallback classifier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Set,
    Exercise,
    Note,
    Section,
    Other,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Set => "SET",
            Label::Exercise => "EXERCISE",
            Label::Note => "NOTE",
            Label::Section => "SECTION",
            Label::Other => "OTHER",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "SET" => Ok(Label::Set),
            "EXERCISE" => Ok(Label::Exercise),
            "NOTE" => Ok(Label::Note),
            "SECTION" => Ok(Label::Section),
            "OTHER" => Ok(Label::Other),
            other => Err(crate::Error::Label(other.to_string())),
        }
    }
}

/// A classifier answer for one line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub label: Label,
    pub confidence: f64,
}

impl Classification {
    pub fn new(label: Label, confidence: f64) -> Self {
        Self { label, confidence }
    }

    /// Outcome used when the classifier could not answer at all
    pub fn unknown() -> Self {
        Self::new(Label::Other, 0.0)
    }
}

// ============================================================================
// Review Queue
// ============================================================================

/// A low-confidence line quarantined for human review
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReviewEntry {
    #[serde(rename = "raw_line")]
    pub line: String,
    pub confidence: f64,
    pub source_file: String,
    pub line_no: usize,
}
