use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or querying an ability catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unable to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to deserialize catalog json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog contains no abilities")]
    Empty,

    #[error("ability '{0}' is listed more than once")]
    DuplicateName(String),

    #[error("ability '{name}' has invalid combo '{combo}' (expected 3 of q/w/e)")]
    InvalidCombo { name: String, combo: String },

    #[error("ability '{0}' not found in catalog")]
    NotFound(String),
}

/// Failures while setting up the log file
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("unable to create log directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
