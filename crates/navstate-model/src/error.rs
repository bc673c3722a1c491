use std::path::PathBuf;

use thiserror::Error;

/// Session-storage backend failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to {operation} session storage at {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session storage at {path} is not a JSON object")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize session storage")]
    Serialization(#[source] serde_json::Error),
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
