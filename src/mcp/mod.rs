//! MCP (Model Context Protocol) adapter: JSON-RPC 2.0 over stdio.

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use error::McpError;
pub use server::McpServer;
