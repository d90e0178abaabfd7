//! Indexing pipeline orchestration.
//!
//! Coordinates the end-to-end workflow behind every caller-facing
//! operation:
//! 1. Scan / read files
//! 2. Chunk content
//! 3. Embed chunks (bounded concurrency)
//! 4. Batch into the vector store
//!
//! plus query, removal, and enumeration over the same store handle.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::chunker::Chunker;
use crate::core::config::Config;
use crate::core::embed::Embedder;
use crate::core::error::{Result, SemdexError};
use crate::core::scanner::Scanner;
use crate::core::store::VectorStore;
use crate::core::types::{Chunk, IndexStats, MetadataFilter, RecordMetadata, VectorRecord};

/// Returned by `query` when the store is unreachable or the
/// collection does not exist yet.
pub const STORE_UNAVAILABLE_MESSAGE: &str = "Error: Documents not indexed yet or index is not \
     configured correctly. Please run index_documents first.";

/// Returned by `query` when the search matched nothing.
pub const NO_RESULTS_MESSAGE: &str = "No relevant documents found in the index.";

/// Orchestrates indexing, querying, and removal.
///
/// Record ids are `{sourcePath}-{ordinal}` with the ordinal counted
/// per source file, so re-indexing an unchanged file overwrites the
/// same ids. Re-indexing a *changed* file must be preceded by
/// `remove_by_source`; stale ordinals are not garbage-collected.
pub struct IndexPipeline {
    root: PathBuf,
    chunker: Chunker,
    scanner: Scanner,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    default_k: usize,
    max_k: usize,
    max_query_length: usize,
    embed_concurrency: usize,
}

impl IndexPipeline {
    pub fn new(
        root: PathBuf,
        config: &Config,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        let chunker = Chunker::new(config.indexing.chunk_size, config.indexing.overlap);
        let scanner = Scanner::new(chunker.clone(), config.indexing.max_file_size_mb);

        Self {
            root,
            chunker,
            scanner,
            embedder,
            store,
            default_k: config.query.default_k,
            max_k: config.query.max_k,
            max_query_length: config.query.max_query_length,
            embed_concurrency: config.embedding.concurrency.max(1),
        }
    }

    /// Index a file or directory under the working root.
    ///
    /// Chunks are embedded with bounded concurrency; a chunk whose
    /// embedding fails is logged and skipped without aborting the
    /// batch. All surviving records go to the store in one `add`.
    pub async fn index(&self, path: &str) -> Result<IndexStats> {
        let start = Instant::now();

        let resolved = self.resolve(path);
        if !resolved.exists() {
            return Err(SemdexError::PathNotFound(path.to_string()));
        }

        tracing::info!("Indexing {}", resolved.display());

        let mut stats = IndexStats::default();
        let chunks = if resolved.is_dir() {
            let (chunks, scan_stats) = self.scanner.scan(&resolved)?;
            stats.files_indexed = scan_stats.files_scanned;
            stats.files_skipped = scan_stats.files_skipped;

            if scan_stats.files_scanned == 0 {
                return Err(SemdexError::EmptyDirectory(path.to_string()));
            }

            let prefix = self.source_prefix(path, &resolved);
            chunks
                .into_iter()
                .map(|mut chunk| {
                    if let (Some(prefix), Some(source)) = (&prefix, &chunk.source_path) {
                        chunk.source_path = Some(format!("{prefix}/{source}"));
                    }
                    chunk
                })
                .collect()
        } else {
            stats.files_indexed = 1;
            self.chunk_file(path, &resolved)?
        };

        let records = self.embed_chunks(chunks, &mut stats).await?;

        stats.chunks_indexed = records.len();
        if !records.is_empty() {
            self.store.add(records).await?;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Indexed {}: {} files, {} chunks stored, {} chunks skipped in {}ms",
            path,
            stats.files_indexed,
            stats.chunks_indexed,
            stats.chunks_skipped,
            stats.duration_ms
        );

        Ok(stats)
    }

    /// Search the index and format the hits for the caller.
    ///
    /// Store-unavailable and zero-hit conditions are recovered into
    /// fixed messages rather than errors; embedding failures
    /// propagate.
    pub async fn query(
        &self,
        query: &str,
        k: Option<usize>,
        filter: Option<MetadataFilter>,
    ) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SemdexError::InvalidArgument(
                "Query text is required".to_string(),
            ));
        }
        if query.chars().count() > self.max_query_length {
            return Err(SemdexError::InvalidArgument(format!(
                "Query exceeds maximum length of {} characters",
                self.max_query_length
            )));
        }
        if k == Some(0) {
            return Err(SemdexError::InvalidArgument(
                "k must be positive".to_string(),
            ));
        }

        let k = k.unwrap_or(self.default_k).min(self.max_k);

        let embedding = self.embedder.embed(query).await?;

        let hits = match self.store.query(&embedding, k, filter.as_ref()).await {
            Ok(hits) => hits,
            Err(e) if e.is_store_unavailable() => {
                tracing::warn!("Query fell back to unavailable-store message: {}", e);
                return Ok(STORE_UNAVAILABLE_MESSAGE.to_string());
            }
            Err(e) => return Err(e),
        };

        if hits.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        tracing::debug!("Query matched {} records", hits.len());

        let blocks: Vec<String> = hits
            .iter()
            .enumerate()
            .map(|(i, hit)| {
                let file_name = hit
                    .metadata
                    .source_path
                    .rsplit('/')
                    .next()
                    .unwrap_or(&hit.metadata.source_path);
                let doc_name = sanitize_doc_name(&format!("{}_chunk{}", file_name, i + 1));
                format!(
                    "[DOCUMENT:{doc_name}]\n{}\n[/DOCUMENT:{doc_name}]",
                    hit.text.trim()
                )
            })
            .collect();

        Ok(blocks.join("\n\n"))
    }

    /// Remove every record indexed from one source path. Removing a
    /// path with no records succeeds.
    pub async fn remove_by_source(&self, path: &str) -> Result<()> {
        let path = path.trim();
        if path.is_empty() {
            return Err(SemdexError::InvalidArgument(
                "Document path is required".to_string(),
            ));
        }

        let filter = MetadataFilter::equals("sourcePath", normalize_request_path(path));
        self.store.delete_by_filter(&filter).await?;

        tracing::info!("Removed records for source {}", path);
        Ok(())
    }

    /// Remove every record in the index. Requires explicit
    /// confirmation; without it the store is never contacted.
    pub async fn remove_all(&self, confirm: bool) -> Result<usize> {
        if !confirm {
            return Err(SemdexError::InvalidArgument(
                "Confirmation required: pass confirm=true to remove all documents".to_string(),
            ));
        }

        let summaries = self.store.get(None).await?;
        if summaries.is_empty() {
            return Ok(0);
        }

        let ids: Vec<String> = summaries.into_iter().map(|s| s.id).collect();
        let count = ids.len();
        self.store.delete_by_ids(&ids).await?;

        tracing::info!("Removed all {} records from the index", count);
        Ok(count)
    }

    /// Distinct source paths currently in the index, in
    /// first-sighting order.
    pub async fn list_sources(&self) -> Result<Vec<String>> {
        let summaries = self.store.get(None).await?;

        let mut seen = HashSet::new();
        let mut sources = Vec::new();
        for summary in summaries {
            if seen.insert(summary.metadata.source_path.clone()) {
                sources.push(summary.metadata.source_path);
            }
        }
        Ok(sources)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }

    /// Prefix applied to scanner-relative source paths so they stay
    /// relative to the working root.
    fn source_prefix(&self, path: &str, resolved: &Path) -> Option<String> {
        let normalized = match resolved.strip_prefix(&self.root) {
            Ok(relative) => posix(relative),
            Err(_) => normalize_request_path(path),
        };
        if normalized.is_empty() || normalized == "." {
            None
        } else {
            Some(normalized)
        }
    }

    /// Read and chunk a single requested file.
    fn chunk_file(&self, path: &str, resolved: &Path) -> Result<Vec<Chunk>> {
        let content = fs::read_to_string(resolved)?;

        let extension = resolved
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        let source_path = match resolved.strip_prefix(&self.root) {
            Ok(relative) => posix(relative),
            Err(_) => normalize_request_path(path),
        };

        Ok(self
            .chunker
            .chunk(&content, extension)
            .into_iter()
            .map(|mut chunk| {
                chunk.source_path = Some(source_path.clone());
                chunk
            })
            .collect())
    }

    /// Embed chunks through a bounded worker pool and assemble
    /// records in chunk order. Ids are assigned before embedding so
    /// failures cannot shift ordinals.
    async fn embed_chunks(
        &self,
        chunks: Vec<Chunk>,
        stats: &mut IndexStats,
    ) -> Result<Vec<VectorRecord>> {
        let mut ordinals: HashMap<String, usize> = HashMap::new();
        let semaphore = Arc::new(Semaphore::new(self.embed_concurrency));
        let mut join_set = JoinSet::new();

        for (position, chunk) in chunks.into_iter().enumerate() {
            let source_path = match chunk.source_path {
                Some(source_path) => source_path,
                None => {
                    tracing::warn!("Dropping chunk without a source path");
                    stats.chunks_skipped += 1;
                    continue;
                }
            };

            let ordinal = ordinals.entry(source_path.clone()).or_insert(0);
            let id = format!("{source_path}-{ordinal}");
            *ordinal += 1;

            let metadata = RecordMetadata {
                source_path,
                content_type: chunk.content_type.as_str().to_string(),
                language: chunk.language,
            };
            let text = chunk.text;

            let embedder = Arc::clone(&self.embedder);
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return (position, id, metadata, text, Err(SemdexError::Unexpected(
                            format!("Embedding pool closed: {e}"),
                        )))
                    }
                };
                let result = embedder.embed(&text).await;
                (position, id, metadata, text, result)
            });
        }

        let mut completed = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((position, id, metadata, text, Ok(embedding))) => {
                    completed.push((
                        position,
                        VectorRecord {
                            id,
                            embedding,
                            metadata,
                            text,
                        },
                    ));
                }
                Ok((_, id, _, _, Err(e))) => {
                    tracing::warn!("Skipping chunk {}: {}", id, e);
                    stats.chunks_skipped += 1;
                }
                Err(e) => {
                    tracing::warn!("Embedding task failed: {}", e);
                    stats.chunks_skipped += 1;
                }
            }
        }

        completed.sort_by_key(|(position, _)| *position);
        Ok(completed.into_iter().map(|(_, record)| record).collect())
    }
}

/// Forward slashes for a path already known to be relative.
fn posix(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}

/// Normalize a caller-supplied path for use in source metadata:
/// backslashes to slashes, leading `./` and trailing `/` stripped.
fn normalize_request_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let normalized = normalized.strip_prefix("./").unwrap_or(&normalized);
    normalized.trim_end_matches('/').to_string()
}

/// Collapse anything outside `[A-Za-z0-9_]` so result labels survive
/// downstream prompt parsing.
fn sanitize_doc_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
