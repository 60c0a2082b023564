//! Structured error types for folio-core.
//!
//! Uses `thiserror` for the library surface; the binary crate wraps these
//! in `anyhow` at its outer edge.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for folio-core operations
#[derive(Error, Debug)]
pub enum FolioError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Persistent store operation failed
    #[error("Store error for key '{key}': {reason}")]
    Store { key: String, reason: String },

    /// A persisted record could not be decoded
    #[error("Corrupt record under key '{key}': {reason}")]
    CorruptRecord { key: String, reason: String },
}

/// Result type alias for folio-core operations
pub type Result<T> = std::result::Result<T, FolioError>;

impl FolioError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a store error
    pub fn store(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Store {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a corrupt record error
    pub fn corrupt_record(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Locate a config/store path under the home directory, used by both
/// [`crate::config`] and [`crate::store`].
pub(crate) fn home_relative(rel: &str) -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(rel)
}
