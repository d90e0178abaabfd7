//! Semdex MCP (Model Context Protocol) Server
//!
//! A stdio-based MCP server exposing the document index as tools for
//! MCP clients. All logging goes to stderr; stdout carries the
//! protocol.

use semdex::core::config::Config;
use semdex::core::services::Services;
use semdex::mcp::McpServer;
use std::sync::Arc;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr) // Critical: stderr not stdout
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false) // No color codes
        .compact() // Concise format
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        std::process::exit(1);
    });
    config.log_config();

    // Create services
    let services = match Services::new(config) {
        Ok(services) => Arc::new(services),
        Err(e) => {
            eprintln!("Failed to initialize services: {e}");
            std::process::exit(1);
        }
    };

    // Create and run MCP server
    let mut server = McpServer::new(services);

    if let Err(e) = server.run().await {
        eprintln!("MCP server error: {e}");
        std::process::exit(1);
    }
}
