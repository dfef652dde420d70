//! Error types for quotebook-core

use thiserror::Error;

/// Result type alias using quotebook-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotebook-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Key-value store unavailable or failing
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Remote fetch/push failure (including timeouts)
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed import payload
    #[error("Import failed: {0}")]
    ImportParse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Quote not found
    #[error("Quote not found: {0}")]
    NotFound(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Persistence(error.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Network(format!("request timed out: {error}"))
        } else {
            Self::Network(error.to_string())
        }
    }
}

impl Error {
    /// Whether this error came from the key-value store.
    pub const fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
