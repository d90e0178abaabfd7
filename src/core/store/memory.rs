//! In-memory vector store.
//!
//! Brute-force cosine similarity over a `Vec` behind `std::sync::RwLock`.
//! Used as the `memory` backend and throughout the test suites; no
//! persistence across restarts.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::core::error::{Result, SemdexError};
use crate::core::store::VectorStore;
use crate::core::types::{MetadataFilter, RecordSummary, ScoredRecord, VectorRecord};

/// Insertion-ordered in-memory backend.
pub struct MemoryStore {
    records: RwLock<Vec<VectorRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

fn lock_poisoned() -> SemdexError {
    SemdexError::StoreFailed("store lock poisoned".to_string())
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn add(&self, records: Vec<VectorRecord>) -> Result<()> {
        let mut stored = self.records.write().map_err(|_| lock_poisoned())?;
        for record in records {
            // Upsert on id, keeping the original position
            if let Some(existing) = stored.iter_mut().find(|r| r.id == record.id) {
                *existing = record;
            } else {
                stored.push(record);
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredRecord>> {
        let stored = self.records.read().map_err(|_| lock_poisoned())?;

        let mut hits: Vec<ScoredRecord> = stored
            .iter()
            .filter(|r| filter.map_or(true, |f| f.matches(&r.metadata)))
            .map(|r| ScoredRecord {
                id: r.id.clone(),
                score: cosine_sim(embedding, &r.embedding),
                metadata: r.metadata.clone(),
                text: r.text.clone(),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<()> {
        let mut stored = self.records.write().map_err(|_| lock_poisoned())?;
        stored.retain(|r| !ids.contains(&r.id));
        Ok(())
    }

    async fn delete_by_filter(&self, filter: &MetadataFilter) -> Result<()> {
        let mut stored = self.records.write().map_err(|_| lock_poisoned())?;
        stored.retain(|r| !filter.matches(&r.metadata));
        Ok(())
    }

    async fn get(&self, filter: Option<&MetadataFilter>) -> Result<Vec<RecordSummary>> {
        let stored = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(stored
            .iter()
            .filter(|r| filter.map_or(true, |f| f.matches(&r.metadata)))
            .map(|r| RecordSummary {
                id: r.id.clone(),
                metadata: r.metadata.clone(),
            })
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        let stored = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(stored.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RecordMetadata;

    fn record(id: &str, embedding: Vec<f32>, path: &str, content_type: &str) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            embedding,
            metadata: RecordMetadata {
                source_path: path.to_string(),
                content_type: content_type.to_string(),
                language: None,
            },
            text: format!("text of {id}"),
        }
    }

    #[tokio::test]
    async fn test_add_and_count() {
        let store = MemoryStore::new();
        store
            .add(vec![
                record("a-0", vec![1.0, 0.0], "a.txt", "text"),
                record("a-1", vec![0.0, 1.0], "a.txt", "text"),
            ])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_add_same_id_upserts() {
        let store = MemoryStore::new();
        store
            .add(vec![record("a-0", vec![1.0, 0.0], "a.txt", "text")])
            .await
            .unwrap();
        store
            .add(vec![record("a-0", vec![0.0, 1.0], "a.txt", "text")])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_query_ranks_by_similarity() {
        let store = MemoryStore::new();
        store
            .add(vec![
                record("far", vec![0.0, 1.0], "a.txt", "text"),
                record("near", vec![1.0, 0.1], "b.txt", "text"),
            ])
            .await
            .unwrap();

        let hits = store.query(&[1.0, 0.0], 2, None).await.unwrap();
        assert_eq!(hits[0].id, "near");
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn test_query_respects_k_and_filter() {
        let store = MemoryStore::new();
        store
            .add(vec![
                record("c-0", vec![1.0, 0.0], "a.rs", "code"),
                record("t-0", vec![1.0, 0.0], "a.md", "text"),
                record("c-1", vec![0.9, 0.1], "b.rs", "code"),
            ])
            .await
            .unwrap();

        let filter = MetadataFilter::equals("contentType", "code");
        let hits = store.query(&[1.0, 0.0], 1, Some(&filter)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].metadata.content_type, "code");
    }

    #[tokio::test]
    async fn test_delete_by_ids_ignores_unknown() {
        let store = MemoryStore::new();
        store
            .add(vec![record("a-0", vec![1.0], "a.txt", "text")])
            .await
            .unwrap();

        store
            .delete_by_ids(&["a-0".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_by_filter() {
        let store = MemoryStore::new();
        store
            .add(vec![
                record("a-0", vec![1.0], "a.txt", "text"),
                record("b-0", vec![1.0], "b.txt", "text"),
            ])
            .await
            .unwrap();

        let filter = MetadataFilter::equals("sourcePath", "a.txt");
        store.delete_by_filter(&filter).await.unwrap();

        let remaining = store.get(None).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].metadata.source_path, "b.txt");
    }

    #[tokio::test]
    async fn test_get_preserves_insertion_order() {
        let store = MemoryStore::new();
        store
            .add(vec![
                record("z-0", vec![1.0], "z.txt", "text"),
                record("a-0", vec![1.0], "a.txt", "text"),
            ])
            .await
            .unwrap();

        let summaries = store.get(None).await.unwrap();
        assert_eq!(summaries[0].id, "z-0");
        assert_eq!(summaries[1].id, "a-0");
    }

    #[test]
    fn test_cosine_sim_edge_cases() {
        assert_eq!(cosine_sim(&[], &[]), 0.0);
        assert_eq!(cosine_sim(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_sim(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert!((cosine_sim(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
