//! Chroma REST connector.
//!
//! Thin client over the Chroma v1 HTTP API. The collection is created
//! lazily (`get_or_create`) on first use and its id memoized for the
//! life of the process, so a store that is down at startup only fails
//! the operations that actually touch it.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use crate::core::config::StoreConfig;
use crate::core::error::{Result, SemdexError};
use crate::core::store::VectorStore;
use crate::core::types::{
    MetadataFilter, RecordMetadata, RecordSummary, ScoredRecord, VectorRecord,
};

/// HTTP client for one Chroma collection.
pub struct ChromaStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    collection_id: OnceCell<String>,
}

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<RecordMetadata>>>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    ids: Vec<String>,
    #[serde(default)]
    metadatas: Option<Vec<Option<RecordMetadata>>>,
}

impl ChromaStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            collection_id: OnceCell::new(),
        }
    }

    /// Resolve the collection id, creating the collection on first use.
    async fn collection_id(&self) -> Result<&str> {
        let id = self
            .collection_id
            .get_or_try_init(|| async {
                let response = self
                    .client
                    .post(format!("{}/api/v1/collections", self.base_url))
                    .json(&json!({
                        "name": self.collection,
                        "get_or_create": true,
                    }))
                    .send()
                    .await
                    .map_err(unreachable_store)?;

                if !response.status().is_success() {
                    return Err(status_error(response).await);
                }

                let parsed: CollectionResponse = response
                    .json()
                    .await
                    .map_err(|e| SemdexError::StoreFailed(format!("Invalid collection response: {e}")))?;
                Ok::<String, SemdexError>(parsed.id)
            })
            .await?;
        Ok(id)
    }

    /// POST to a collection endpoint, mapping HTTP failures to the
    /// store error taxonomy.
    async fn post(&self, endpoint: &str, body: Value) -> Result<reqwest::Response> {
        let id = self.collection_id().await?;
        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{}/{}",
                self.base_url, id, endpoint
            ))
            .json(&body)
            .send()
            .await
            .map_err(unreachable_store)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response)
    }
}

fn unreachable_store(e: reqwest::Error) -> SemdexError {
    SemdexError::StoreUnavailable(format!("Vector store unreachable: {e}"))
}

async fn status_error(response: reqwest::Response) -> SemdexError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::NOT_FOUND {
        SemdexError::StoreUnavailable(format!("Collection not found: {body}"))
    } else {
        SemdexError::StoreFailed(format!("Vector store returned {status}: {body}"))
    }
}

#[async_trait]
impl VectorStore for ChromaStore {
    async fn add(&self, records: Vec<VectorRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let embeddings: Vec<&[f32]> = records.iter().map(|r| r.embedding.as_slice()).collect();
        let metadatas: Vec<Value> = records
            .iter()
            .map(|r| serde_json::to_value(&r.metadata))
            .collect::<std::result::Result<_, _>>()?;
        let documents: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();

        self.post(
            "add",
            json!({
                "ids": ids,
                "embeddings": embeddings,
                "metadatas": metadatas,
                "documents": documents,
            }),
        )
        .await?;
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredRecord>> {
        let mut body = json!({
            "query_embeddings": [embedding],
            "n_results": k,
            "include": ["metadatas", "documents", "distances"],
        });
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            body["where"] = Value::Object(filter.as_object().clone());
        }

        let response = self.post("query", body).await?;
        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| SemdexError::StoreFailed(format!("Invalid query response: {e}")))?;

        let ids = parsed.ids.into_iter().next().unwrap_or_default();
        let distances = parsed
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();
        let metadatas = parsed
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default();
        let documents = parsed
            .documents
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();

        let mut hits = Vec::with_capacity(ids.len());
        for (i, id) in ids.into_iter().enumerate() {
            let metadata = match metadatas.get(i).cloned().flatten() {
                Some(metadata) => metadata,
                None => {
                    tracing::warn!("Query hit {id} has no metadata, dropping");
                    continue;
                }
            };
            // Chroma reports distance, smaller is closer
            let score = 1.0 - distances.get(i).copied().unwrap_or(1.0);
            let text = documents.get(i).cloned().flatten().unwrap_or_default();
            hits.push(ScoredRecord {
                id,
                score,
                metadata,
                text,
            });
        }
        Ok(hits)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.post("delete", json!({ "ids": ids })).await?;
        Ok(())
    }

    async fn delete_by_filter(&self, filter: &MetadataFilter) -> Result<()> {
        self.post(
            "delete",
            json!({ "where": Value::Object(filter.as_object().clone()) }),
        )
        .await?;
        Ok(())
    }

    async fn get(&self, filter: Option<&MetadataFilter>) -> Result<Vec<RecordSummary>> {
        let mut body = json!({ "include": ["metadatas"] });
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            body["where"] = Value::Object(filter.as_object().clone());
        }

        let response = self.post("get", body).await?;
        let parsed: GetResponse = response
            .json()
            .await
            .map_err(|e| SemdexError::StoreFailed(format!("Invalid get response: {e}")))?;

        let metadatas = parsed.metadatas.unwrap_or_default();
        let mut summaries = Vec::with_capacity(parsed.ids.len());
        for (i, id) in parsed.ids.into_iter().enumerate() {
            let metadata = match metadatas.get(i).cloned().flatten() {
                Some(metadata) => metadata,
                None => {
                    tracing::warn!("Record {id} has no metadata, dropping");
                    continue;
                }
            };
            summaries.push(RecordSummary { id, metadata });
        }
        Ok(summaries)
    }

    async fn count(&self) -> Result<usize> {
        let id = self.collection_id().await?;
        let response = self
            .client
            .get(format!(
                "{}/api/v1/collections/{}/count",
                self.base_url, id
            ))
            .send()
            .await
            .map_err(unreachable_store)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        response
            .json::<usize>()
            .await
            .map_err(|e| SemdexError::StoreFailed(format!("Invalid count response: {e}")))
    }
}
