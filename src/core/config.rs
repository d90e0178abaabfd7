//! Configuration management for the semdex service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{Result, SemdexError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// Index the working root in the background at startup
    #[serde(default = "default_auto_index")]
    pub auto_index: bool,
}

/// Query configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Default number of results to return
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum results per query
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Maximum query string length
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

/// Embedding provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding service
    #[serde(default = "default_embedding_url")]
    pub url: String,

    /// Model name passed to the provider
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Maximum in-flight embedding requests during indexing
    #[serde(default = "default_embedding_concurrency")]
    pub concurrency: usize,
}

/// Vector store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Store backend: "chroma" or "memory"
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// Base URL of the vector store service
    #[serde(default = "default_store_url")]
    pub url: String,

    /// Collection name holding this project's records
    #[serde(default = "default_collection")]
    pub collection: String,
}

// Default value functions
fn default_chunk_size() -> usize {
    500
}

fn default_overlap() -> usize {
    50
}

fn default_max_file_size() -> usize {
    10
}

fn default_auto_index() -> bool {
    true
}

fn default_k() -> usize {
    15
}

fn default_max_k() -> usize {
    100
}

fn default_max_query_length() -> usize {
    500
}

fn default_embedding_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_embedding_concurrency() -> usize {
    4
}

fn default_store_backend() -> String {
    "chroma".to_string()
}

fn default_store_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_collection() -> String {
    "semdex-unified".to_string()
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            max_file_size_mb: default_max_file_size(),
            auto_index: default_auto_index(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            max_query_length: default_max_query_length(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: default_embedding_url(),
            model: default_embedding_model(),
            concurrency: default_embedding_concurrency(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            url: default_store_url(),
            collection: default_collection(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SemdexError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// The TOML file is taken from `SEMDEX_CONFIG` if set, otherwise
    /// `./semdex.toml` if present.
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("SEMDEX_CONFIG") {
            Self::from_file(config_path)?
        } else if Path::new("semdex.toml").exists() {
            Self::from_file("semdex.toml")?
        } else {
            Self::default()
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Indexing configuration
        if let Ok(chunk_size) = env::var("SEMDEX_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.parse() {
                self.indexing.chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("SEMDEX_CHUNK_OVERLAP") {
            if let Ok(o) = overlap.parse() {
                self.indexing.overlap = o;
            }
        }
        if let Ok(max_size) = env::var("SEMDEX_MAX_FILE_SIZE_MB") {
            if let Ok(size) = max_size.parse() {
                self.indexing.max_file_size_mb = size;
            }
        }
        if let Ok(auto) = env::var("SEMDEX_AUTO_INDEX") {
            self.indexing.auto_index = auto != "false" && auto != "0";
        }

        // Query configuration
        if let Ok(default_k) = env::var("SEMDEX_DEFAULT_K") {
            if let Ok(k) = default_k.parse() {
                self.query.default_k = k;
            }
        }
        if let Ok(max_k) = env::var("SEMDEX_MAX_K") {
            if let Ok(k) = max_k.parse() {
                self.query.max_k = k;
            }
        }

        // Embedding configuration
        if let Ok(url) = env::var("SEMDEX_EMBEDDING_URL") {
            self.embedding.url = url;
        }
        if let Ok(model) = env::var("SEMDEX_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Ok(concurrency) = env::var("SEMDEX_EMBEDDING_CONCURRENCY") {
            if let Ok(c) = concurrency.parse() {
                self.embedding.concurrency = c;
            }
        }

        // Store configuration
        if let Ok(backend) = env::var("SEMDEX_STORE_BACKEND") {
            self.store.backend = backend;
        }
        if let Ok(url) = env::var("SEMDEX_STORE_URL") {
            self.store.url = url;
        }
        if let Ok(collection) = env::var("SEMDEX_COLLECTION") {
            self.store.collection = collection;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.chunk_size == 0 {
            return Err(SemdexError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if self.indexing.overlap >= self.indexing.chunk_size {
            return Err(SemdexError::ConfigError(
                "Overlap must be less than chunk size".to_string(),
            ));
        }

        if self.query.default_k == 0 {
            return Err(SemdexError::ConfigError(
                "Default k must be non-zero".to_string(),
            ));
        }

        if self.query.default_k > self.query.max_k {
            return Err(SemdexError::ConfigError(
                "Default k cannot exceed max k".to_string(),
            ));
        }

        if self.embedding.concurrency == 0 {
            return Err(SemdexError::ConfigError(
                "Embedding concurrency must be non-zero".to_string(),
            ));
        }

        match self.store.backend.as_str() {
            "chroma" | "memory" => {}
            other => {
                return Err(SemdexError::ConfigError(format!(
                    "Unknown store backend: {other}"
                )))
            }
        }

        Ok(())
    }

    /// Log active configuration at startup
    pub fn log_config(&self) {
        tracing::info!(
            "Indexing: chunk_size={} overlap={} max_file_size={}MB auto_index={}",
            self.indexing.chunk_size,
            self.indexing.overlap,
            self.indexing.max_file_size_mb,
            self.indexing.auto_index
        );
        tracing::info!(
            "Query: default_k={} max_k={}",
            self.query.default_k,
            self.query.max_k
        );
        tracing::info!(
            "Embedding: url={} model={} concurrency={}",
            self.embedding.url,
            self.embedding.model,
            self.embedding.concurrency
        );
        tracing::info!(
            "Store: backend={} url={} collection={}",
            self.store.backend,
            self.store.url,
            self.store.collection
        );
    }
}
