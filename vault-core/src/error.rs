//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Vault Store
//!
//! Every fallible operation in the crate returns `AppResult<T>`. Lookups of
//! unknown ids are not errors (they are silent no-ops); what remains is
//! persistence, configuration and input validation at the front-end boundary.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Convenient alias carrying the unified error type.
pub type AppResult<T> = Result<T, AppError>;

/// Unified error type for all vault operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization or deserialization error (JSON collections).
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config rendering error.
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A persisted key could not be written.
    #[error("Persistence failed for key '{key}': {reason}")]
    Persistence { key: String, reason: String },

    /// Text that is not a well-formed virtual directory path.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Input validation errors raised at the front-end boundary.
    #[error("Invalid input: {field} - {message}")]
    InvalidInput {
        field: String, // "name", "id", ...
        message: String,
    },

    /// Requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create a persistence failure error
    pub fn persistence<S1: Into<String>, S2: Into<String>>(key: S1, reason: S2) -> Self {
        Self::Persistence {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path<S1: Into<String>, S2: Into<String>>(path: S1, reason: S2) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an input validation error
    pub fn invalid_input<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}
