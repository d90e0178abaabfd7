//! Domain data structures shared across the indexing pipeline and
//! the vector store seam.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::{Result, SemdexError};

/// Content classification for a chunk, derived from the source file
/// extension (or, for markdown fences, the block kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Code,
    Unknown,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Code => "code",
            ContentType::Unknown => "unknown",
        }
    }
}

/// A unit of retrievable content.
///
/// `source_path` is stamped by the scanner (relative to the scan
/// root, POSIX slashes); the chunker never sets it.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub content_type: ContentType,
    pub language: Option<String>,
    pub source_path: Option<String>,
}

impl Chunk {
    pub fn new(text: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            text: text.into(),
            content_type,
            language: None,
            source_path: None,
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }
}

/// Flat scalar metadata persisted alongside each record.
///
/// Field names match the wire keys the store filters on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(rename = "sourcePath")]
    pub source_path: String,

    #[serde(rename = "contentType")]
    pub content_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// The persisted form of a chunk in the vector store.
#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    pub metadata: RecordMetadata,
    pub text: String,
}

/// Record id + metadata, as returned by enumeration.
#[derive(Debug, Clone)]
pub struct RecordSummary {
    pub id: String,
    pub metadata: RecordMetadata,
}

/// A query hit in store relevance order.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub id: String,
    pub score: f32,
    pub metadata: RecordMetadata,
    pub text: String,
}

/// Metadata-equality filter, passed through to the vector store
/// unmodified.
///
/// Only flat objects with scalar values are accepted; anything else
/// is rejected before the store is contacted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFilter(Map<String, Value>);

impl MetadataFilter {
    /// Single-field equality filter.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = Map::new();
        map.insert(field.into(), value.into());
        Self(map)
    }

    /// Validate an arbitrary JSON value as a filter.
    pub fn from_value(value: Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(SemdexError::InvalidArgument(format!(
                    "Filter must be a JSON object, got: {other}"
                )))
            }
        };

        for (key, val) in &map {
            if !matches!(val, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
                return Err(SemdexError::InvalidArgument(format!(
                    "Filter field '{key}' must be a string, number, or boolean"
                )));
            }
        }

        Ok(Self(map))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw JSON object, for connectors that forward the filter
    /// on the wire (e.g. a Chroma `where` clause).
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Check a record's metadata against every constraint.
    pub fn matches(&self, metadata: &RecordMetadata) -> bool {
        let flat = match serde_json::to_value(metadata) {
            Ok(Value::Object(map)) => map,
            _ => return false,
        };
        self.0
            .iter()
            .all(|(key, expected)| flat.get(key) == Some(expected))
    }
}

/// Statistics for one scan of a directory tree.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Files read and chunked
    pub files_scanned: usize,
    /// Files skipped (unreadable, non-UTF-8, oversized)
    pub files_skipped: usize,
}

/// Statistics for one indexing run.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub chunks_indexed: usize,
    /// Chunks dropped because the embedding provider returned no vector
    pub chunks_skipped: usize,
    pub duration_ms: u64,
}
