//! Ollama embedding connector.
//!
//! Talks to a local Ollama instance over its embeddings endpoint.
//! The provider is stateless; one `reqwest::Client` is reused across
//! requests for connection pooling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::config::EmbeddingConfig;
use crate::core::embed::Embedder;
use crate::core::error::{Result, SemdexError};

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

/// HTTP client for the Ollama `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/embeddings", config.url.trim_end_matches('/')),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingsRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                SemdexError::EmbeddingFailed(format!("Embedding provider unreachable: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SemdexError::EmbeddingFailed(format!(
                "Embedding provider returned {status}: {body}"
            )));
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| {
            SemdexError::EmbeddingFailed(format!("Invalid embedding response: {e}"))
        })?;

        if parsed.embedding.is_empty() {
            return Err(SemdexError::EmbeddingFailed(format!(
                "Model '{}' returned an empty embedding",
                self.model
            )));
        }

        Ok(parsed.embedding)
    }
}
