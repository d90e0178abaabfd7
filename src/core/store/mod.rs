//! Vector store seam and backends.

mod chroma;
mod memory;

pub use chroma::ChromaStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::types::{MetadataFilter, RecordSummary, ScoredRecord, VectorRecord};

/// Persistence and similarity search over embedded chunks.
///
/// Connection failures and missing collections surface as
/// `StoreUnavailable`; other backend errors as `StoreFailed`.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert records in one batch. Ids are caller-assigned; adding
    /// an existing id upserts.
    async fn add(&self, records: Vec<VectorRecord>) -> Result<()>;

    /// Top-`k` nearest records by similarity, most relevant first,
    /// optionally restricted by a metadata equality filter.
    async fn query(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredRecord>>;

    /// Delete by id. Ids with no record are not an error.
    async fn delete_by_ids(&self, ids: &[String]) -> Result<()>;

    /// Delete every record whose metadata matches the filter.
    async fn delete_by_filter(&self, filter: &MetadataFilter) -> Result<()>;

    /// Enumerate ids and metadata, optionally filtered. Insertion
    /// order is preserved.
    async fn get(&self, filter: Option<&MetadataFilter>) -> Result<Vec<RecordSummary>>;

    /// Number of records currently stored.
    async fn count(&self) -> Result<usize>;
}
