//! Error types for the physrag assistant.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! retrieval, completion, prompt, and serialization failures.

use thiserror::Error;

/// Unified error type for the physrag assistant.
///
/// Only `Config` is fatal: it aborts startup. Retrieval, completion and
/// prompt failures abort a single question and are reported inside that
/// question's answer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or mismatched index, record store, manifest or settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding or nearest-neighbor index failures
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Completion service transport or model failures
    #[error("Completion error: {0}")]
    Completion(String),

    /// Template registration and rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error must abort the process instead of a single question.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_is_fatal() {
        assert!(AppError::Config("missing index".to_string()).is_fatal());
        assert!(!AppError::Retrieval("timeout".to_string()).is_fatal());
        assert!(!AppError::Completion("503".to_string()).is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Retrieval("index offline".to_string());
        assert_eq!(err.to_string(), "Retrieval error: index offline");
    }
}
