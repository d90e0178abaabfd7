//! Error types and error handling for the semdex service.
//!
//! This module defines the error types used throughout the
//! application. Protocol-specific error handling (MCP error codes)
//! lives in the adapter modules.

use thiserror::Error;

/// Result type alias for semdex operations
pub type Result<T> = std::result::Result<T, SemdexError>;

/// Main error type for the semdex service
#[derive(Error, Debug)]
pub enum SemdexError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("No indexable files found in: {0}")]
    EmptyDirectory(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Vector store error: {0}")]
    StoreFailed(String),

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl SemdexError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, SemdexError::PathNotFound(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            SemdexError::InvalidArgument(_) | SemdexError::ConfigError(_)
        )
    }

    /// Check if the vector store could not be reached or the
    /// collection does not exist yet.
    ///
    /// `query` recovers this condition into a user-visible sentinel
    /// instead of propagating it.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, SemdexError::StoreUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_not_found_is_not_found() {
        let err = SemdexError::PathNotFound("docs/missing.md".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_bad_request());
        assert!(!err.is_store_unavailable());
    }

    #[test]
    fn test_invalid_argument_is_bad_request() {
        let err = SemdexError::InvalidArgument("confirm must be true".to_string());
        assert!(err.is_bad_request());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_store_unavailable_classification() {
        let err = SemdexError::StoreUnavailable("collection not found".to_string());
        assert!(err.is_store_unavailable());
        assert!(!err.is_bad_request());
    }

    #[test]
    fn test_embedding_failed_is_internal() {
        let err = SemdexError::EmbeddingFailed("no vector returned".to_string());
        assert!(!err.is_not_found());
        assert!(!err.is_bad_request());
        assert!(!err.is_store_unavailable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SemdexError::from(io_err);
        assert!(!err.is_not_found()); // IoError is internal, not "not found"
    }

    #[test]
    fn test_error_message() {
        let err = SemdexError::EmptyDirectory("empty-dir".to_string());
        assert!(err.message().contains("empty-dir"));
        assert!(err.message().contains("No indexable files"));
    }
}
