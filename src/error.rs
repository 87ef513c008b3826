//! Error handling module for the bonsai engine
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Absence of a record is never an error: lookups return `Option` instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the bonsai engine
#[derive(Error, Debug)]
pub enum BonsaiError {
    /// Backing store unreadable or unwritable
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A durable record exists but does not deserialize into a tree
    #[error("Corrupt record {key} at {}: {source}", path.display())]
    CorruptRecord {
        key: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record exists where the caller asked not to overwrite one
    #[error("A tree is already stored for '{0}'")]
    AlreadyStored(String),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Strict key parsing rejected a style/season/age key
    #[error("Unknown {kind} '{key}'")]
    UnknownKey { kind: &'static str, key: String },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for bonsai operations
pub type Result<T> = std::result::Result<T, BonsaiError>;

// Convenient error constructors
impl BonsaiError {
    /// Create an IO error carrying the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a corrupt record error
    pub fn corrupt(key: impl Into<String>, path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::CorruptRecord {
            key: key.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unknown key error
    pub fn unknown_key(kind: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownKey {
            kind,
            key: key.into(),
        }
    }

    /// True when the error is a data-integrity failure rather than an IO failure
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptRecord { .. })
    }
}
