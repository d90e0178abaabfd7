//! MCP tool implementations

mod handler;
mod index_documents;
mod list_documents;
mod query_documents;
mod registry;
mod remove_all_documents;
mod remove_document;

pub use handler::{text_content, McpToolHandler};
pub use index_documents::IndexDocumentsHandler;
pub use list_documents::ListDocumentsHandler;
pub use query_documents::QueryDocumentsHandler;
pub use registry::ToolRegistry;
pub use remove_all_documents::RemoveAllDocumentsHandler;
pub use remove_document::RemoveDocumentHandler;
