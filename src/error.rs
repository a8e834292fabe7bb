//! Error types for the report writer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing reports or loading report inputs.
///
/// Sink failures are never retried by the session; they surface here and
/// the hosting application decides what to do with them.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write report to {path}: {source}")]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid function catalog {path}: {reason}")]
    Catalog { path: PathBuf, reason: String },

    #[error("Invalid event on line {line}: {source}")]
    Event {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
