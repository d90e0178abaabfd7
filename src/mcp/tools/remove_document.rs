//! remove_document tool implementation

use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use crate::mcp::tools::handler::{text_content, McpToolHandler};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct RemoveDocumentArgs {
    path: String,
}

/// Removes every indexed chunk of one source document.
pub struct RemoveDocumentHandler {
    services: Arc<Services>,
}

impl RemoveDocumentHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for RemoveDocumentHandler {
    fn name(&self) -> &str {
        "remove_document"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "remove_document".to_string(),
            description: "Remove a specific document from the index by file path".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Source path of the document/file to remove (relative to the working directory)"
                    }
                },
                "required": ["path"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: RemoveDocumentArgs = serde_json::from_value(args)
            .map_err(|e| McpError::InvalidParams(format!("Invalid arguments: {e}")))?;

        self.services.pipeline.remove_by_source(&args.path).await?;

        Ok(text_content(format!(
            "Successfully removed document: {}",
            args.path
        )))
    }
}
