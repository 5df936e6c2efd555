//! Error types for the tracker core.

use thiserror::Error;

/// Errors surfaced by the entry store and its collaborators.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// User-supplied input was rejected (empty name, non-positive number, ...)
    #[error("{0}")]
    Validation(String),

    /// A persisted record exists but could not be parsed
    #[error("Failed to parse stored record '{key}': {source}")]
    StorageRead {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The key-value store itself failed
    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    /// CSV input could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TrackerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(anyhow::Error::new(err).context("Failed to encode record"))
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
