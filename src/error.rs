use std::path::PathBuf;
use thiserror::Error;

/// The main error type for lhcbdata operations.
#[derive(Debug, Error)]
pub enum LhcbDataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset JSON from {path}: {source}")]
    DatasetJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write dataset JSON to {path}: {source}")]
    DatasetJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse configuration from {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid datatype pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Dataset has no file named {name}")]
    NotFound { name: String },

    #[error("Index {index} out of range for dataset of {len} file(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("{operation}: {message}")]
    Remote { operation: String, message: String },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}
