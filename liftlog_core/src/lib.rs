#![forbid(unsafe_code)]

//! Core parsing engine for free-form workout logs.
//!
//! This crate provides:
//! - Domain types (set records, parse context, labels, review entries)
//! - Line grammar and numeric field derivation
//! - Exercise name normalization
//! - Classifier fallback with a review queue for unsure lines
//! - Export, daily summaries and label maintenance

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod fields;
pub mod normalize;
pub mod grammar;
pub mod classify;
pub mod parser;
pub mod review;
pub mod labels;
pub mod export;
pub mod summary;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use normalize::{default_synonyms, SynonymTable};
pub use classify::{
    LineClassifier, MemoryReviewSink, NoClassifier, NoReview, ReviewSink,
    DEFAULT_CONFIDENCE_THRESHOLD,
};
pub use parser::{parse_log, LogParser, ParseStats};
pub use review::CsvReviewSink;
pub use labels::LabelTableClassifier;
