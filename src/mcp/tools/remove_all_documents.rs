//! remove_all_documents tool implementation

use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use crate::mcp::tools::handler::{text_content, McpToolHandler};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct RemoveAllDocumentsArgs {
    #[serde(default)]
    confirm: bool,
}

/// Wipes the entire index after explicit confirmation.
pub struct RemoveAllDocumentsHandler {
    services: Arc<Services>,
}

impl RemoveAllDocumentsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for RemoveAllDocumentsHandler {
    fn name(&self) -> &str {
        "remove_all_documents"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "remove_all_documents".to_string(),
            description: "Remove all documents from the index".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": {
                        "type": "boolean",
                        "description": "Confirmation flag (must be true) to remove all indexed data for this project"
                    }
                },
                "required": ["confirm"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: RemoveAllDocumentsArgs = serde_json::from_value(args)
            .map_err(|e| McpError::InvalidParams(format!("Invalid arguments: {e}")))?;

        // The pipeline rejects unconfirmed calls before any store contact
        let removed = self.services.pipeline.remove_all(args.confirm).await?;

        Ok(text_content(format!(
            "Successfully removed all documents from the index ({removed} records deleted)."
        )))
    }
}
