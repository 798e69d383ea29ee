//! Error types for dataset preparation and statistics

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building datasets or computing stats
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to traverse directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),

    #[error("Source directory not found: {0}")]
    MissingSource(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid pattern '{pattern}' for extra tag '{tag}': {source}")]
    InvalidRegex {
        tag: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File name is not an integer timestamp: {0}")]
    InvalidTimestamp(PathBuf),

    #[error("Unexpected tag conflict for '{name}': '{existing}' vs '{incoming}'")]
    UnexpectedTagConflict {
        name: String,
        existing: String,
        incoming: String,
    },

    #[error("Could not find a free output name for '{0}'")]
    NameExhausted(String),
}

impl DatasetError {
    /// Attach the offending path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }
}
