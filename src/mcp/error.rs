//! MCP-specific error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Tool error (code {0}): {1}")]
    ToolError(i32, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<crate::core::error::SemdexError> for McpError {
    fn from(err: crate::core::error::SemdexError) -> Self {
        use crate::core::error::SemdexError;
        use crate::mcp::protocol;

        match err {
            SemdexError::PathNotFound(p) => McpError::ToolError(
                protocol::PATH_NOT_FOUND,
                format!("Path not found: {p}"),
            ),
            SemdexError::EmptyDirectory(p) => McpError::ToolError(
                protocol::EMPTY_DIRECTORY,
                format!("No indexable files found in: {p}"),
            ),
            SemdexError::InvalidArgument(s) => McpError::InvalidParams(s),
            SemdexError::EmbeddingFailed(s) => McpError::ToolError(
                protocol::EMBEDDING_FAILED,
                format!("Embedding failed: {s}"),
            ),
            SemdexError::StoreUnavailable(s) => McpError::ToolError(
                protocol::STORE_ERROR,
                format!("Vector store unavailable: {s}"),
            ),
            SemdexError::StoreFailed(s) => {
                McpError::ToolError(protocol::STORE_ERROR, format!("Vector store error: {s}"))
            }
            SemdexError::IndexingFailed(s) => McpError::ToolError(
                protocol::INDEXING_FAILED,
                format!("Indexing failed: {s}"),
            ),
            SemdexError::ConfigError(s) => {
                McpError::InvalidParams(format!("Configuration error: {s}"))
            }
            SemdexError::IoError(e) => McpError::InternalError(format!("I/O error: {e}")),
            SemdexError::SerdeError(e) => {
                McpError::InternalError(format!("Serialization error: {e}"))
            }
            SemdexError::TomlError(e) => {
                McpError::InternalError(format!("Configuration parse error: {e}"))
            }
            SemdexError::Unexpected(s) => McpError::InternalError(s),
        }
    }
}
