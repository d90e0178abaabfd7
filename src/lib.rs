//! Semdex - Semantic Document Index for Project Directories
//!
//! A RAG indexing service over a project working directory: files are
//! split into content-aware chunks, embedded through an external
//! provider, and stored in an external vector store for similarity
//! queries.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types
//!   - chunker (content-aware splitting)
//!   - ignore + scanner (filtered BFS filesystem walk)
//!   - embed / store (provider and vector-store seams + connectors)
//!   - pipeline (index, query, remove, list)
//!   - services (unified service container)
//!
//! - **mcp**: MCP adapter (depends on core)
//!   - server, tools, protocol
//!
//! # Key Features
//!
//! - UTF-8 safe chunking (character-based, never panics)
//! - gitignore-semantics scan filtering
//! - Bounded-concurrency embedding with per-chunk failure recovery
//! - MCP server (5 tools) with startup auto-indexing

// Core domain logic (protocol-agnostic)
pub mod core;

// MCP (Model Context Protocol) adapter
pub mod mcp;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, SemdexError};
pub use core::pipeline::IndexPipeline;
pub use core::services::Services;
pub use core::types::*;
