//! query_documents tool implementation

use crate::core::services::Services;
use crate::core::types::MetadataFilter;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use crate::mcp::tools::handler::{text_content, McpToolHandler};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct QueryDocumentsArgs {
    query: String,
    #[serde(default)]
    k: Option<usize>,
    #[serde(default)]
    filter: Option<Value>,
}

/// Searches the index and returns formatted document blocks.
pub struct QueryDocumentsHandler {
    services: Arc<Services>,
}

impl QueryDocumentsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for QueryDocumentsHandler {
    fn name(&self) -> &str {
        "query_documents"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "query_documents".to_string(),
            description: "Query indexed documents using RAG".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The question to search documents for"
                    },
                    "k": {
                        "type": "number",
                        "description": "Number of chunks to return (default: 15)"
                    },
                    "filter": {
                        "type": "object",
                        "description": "Optional metadata filter (e.g., {\"contentType\": \"code\"})"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: QueryDocumentsArgs = serde_json::from_value(args)
            .map_err(|e| McpError::InvalidParams(format!("Invalid arguments: {e}")))?;

        // Validate the filter shape before anything else runs
        let filter = match args.filter {
            Some(Value::Null) | None => None,
            Some(value) => Some(MetadataFilter::from_value(value)?),
        };

        let result = self
            .services
            .pipeline
            .query(&args.query, args.k, filter)
            .await?;

        Ok(text_content(result))
    }
}
