//! index_documents tool implementation

use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use crate::mcp::tools::handler::{text_content, McpToolHandler};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct IndexDocumentsArgs {
    path: String,
}

/// Indexes a file or directory into the vector store.
pub struct IndexDocumentsHandler {
    services: Arc<Services>,
}

impl IndexDocumentsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for IndexDocumentsHandler {
    fn name(&self) -> &str {
        "index_documents"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "index_documents".to_string(),
            description: "Add documents from specified path for RAG indexing".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path containing files/directories to index (relative to the working directory)"
                    }
                },
                "required": ["path"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: IndexDocumentsArgs = serde_json::from_value(args)
            .map_err(|e| McpError::InvalidParams(format!("Invalid arguments: {e}")))?;

        if args.path.trim().is_empty() {
            return Err(McpError::InvalidParams("path is required".to_string()));
        }

        let stats = self.services.pipeline.index(&args.path).await?;

        Ok(text_content(format!(
            "Successfully indexed {}: {} files, {} chunks stored ({} chunks skipped) in {}ms",
            args.path,
            stats.files_indexed,
            stats.chunks_indexed,
            stats.chunks_skipped,
            stats.duration_ms
        )))
    }
}
