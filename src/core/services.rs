//! Service container.
//!
//! Wires configuration to concrete embedding and store backends and
//! hands out the shared pipeline. Protocol adapters hold one clone of
//! this and never construct backends themselves.

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::config::Config;
use crate::core::embed::{Embedder, OllamaEmbedder};
use crate::core::error::{Result, SemdexError};
use crate::core::pipeline::IndexPipeline;
use crate::core::store::{ChromaStore, MemoryStore, VectorStore};

/// Shared service handles for the process.
#[derive(Clone)]
pub struct Services {
    pub pipeline: Arc<IndexPipeline>,
    pub config: Arc<Config>,
}

impl Services {
    /// Build services from config, choosing backends by
    /// `store.backend` and rooting the pipeline at the process
    /// working directory.
    pub fn new(config: Config) -> Result<Self> {
        let root = std::env::current_dir()?;

        let embedder: Arc<dyn Embedder> = Arc::new(OllamaEmbedder::new(&config.embedding));
        let store: Arc<dyn VectorStore> = match config.store.backend.as_str() {
            "chroma" => Arc::new(ChromaStore::new(&config.store)),
            "memory" => Arc::new(MemoryStore::new()),
            other => {
                return Err(SemdexError::ConfigError(format!(
                    "Unknown store backend: {other}"
                )))
            }
        };

        Ok(Self::with_backends(config, root, embedder, store))
    }

    /// Build services around caller-supplied backends. Used by tests
    /// to inject mocks and in-memory stores.
    pub fn with_backends(
        config: Config,
        root: PathBuf,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        let pipeline = Arc::new(IndexPipeline::new(root, &config, embedder, store));
        Self {
            pipeline,
            config: Arc::new(config),
        }
    }
}
