//! list_documents tool implementation

use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use crate::mcp::tools::handler::{text_content, McpToolHandler};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Lists the distinct source paths currently in the index.
pub struct ListDocumentsHandler {
    services: Arc<Services>,
}

impl ListDocumentsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for ListDocumentsHandler {
    fn name(&self) -> &str {
        "list_documents"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_documents".to_string(),
            description: "List all document paths in the index".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(&self, _args: Value) -> Result<ToolResult, McpError> {
        let paths = self.services.pipeline.list_sources().await?;

        let text = if paths.is_empty() {
            "No documents found in the index.".to_string()
        } else {
            format!(
                "Found {} unique document paths in the index:\n\n{}",
                paths.len(),
                paths
                    .iter()
                    .map(|p| format!("- {p}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
        };

        Ok(text_content(text))
    }
}
