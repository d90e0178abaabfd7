//! Embedding provider seam.

mod ollama;

pub use ollama::OllamaEmbedder;

use async_trait::async_trait;

use crate::core::error::Result;

/// Turns text into a dense vector.
///
/// Implementations are shared across concurrent indexing workers, so
/// they take `&self` and must be `Send + Sync`.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text. An empty vector is an error; callers never
    /// store zero-dimensional records.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
