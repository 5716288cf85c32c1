//! Error types for the liftlog_core library.
//!
//! The parser itself never fails; these errors come from the adapters
//! around it (config, review queue, label tables, exports).

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Line classifier failed to answer
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Unknown line label
    #[error("Unknown label: {0}")]
    Label(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
