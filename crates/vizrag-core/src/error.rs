use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid collection name '{0}'")]
    InvalidCollectionName(String),

    #[error("Failed to load corpus {}: {reason}", path.display())]
    CorpusLoad { path: PathBuf, reason: String },

    #[error("Storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timed out after {waited:?} waiting for lock {}", path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    #[error("Embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Wrap an I/O failure together with the path it happened on.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage { path: path.into(), source }
    }

    /// Errors the caller can reasonably retry or re-prompt on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidQuery(_) | Self::LockTimeout { .. } | Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
