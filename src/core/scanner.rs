//! Breadth-first filesystem scanner.
//!
//! Walks a directory tree with an explicit worklist, applying the
//! ignore filter at every level so excluded directories are pruned
//! before their contents are ever enumerated. Only a failure to read
//! the scan root is fatal; everything below it degrades to a logged
//! skip so one unreadable file never aborts a run.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::chunker::Chunker;
use crate::core::error::{Result, SemdexError};
use crate::core::ignore::IgnoreFilter;
use crate::core::types::{Chunk, ScanStats};

/// Recursive scanner producing chunks for every indexable file.
pub struct Scanner {
    chunker: Chunker,

    /// Files above this size are skipped, 0 disables the cap
    max_file_size_bytes: u64,
}

impl Scanner {
    pub fn new(chunker: Chunker, max_file_size_mb: usize) -> Self {
        Self {
            chunker,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        }
    }

    /// Scan `root` breadth-first, chunking every file the ignore
    /// rules admit.
    ///
    /// Each chunk is stamped with its source path relative to `root`,
    /// using forward slashes on every platform. Symlink cycles are
    /// broken by tracking visited directories by canonical path.
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<(Vec<Chunk>, ScanStats)> {
        let root = root.as_ref();
        let filter = IgnoreFilter::build(root)?;

        let mut chunks = Vec::new();
        let mut stats = ScanStats::default();

        let mut queue: VecDeque<PathBuf> = VecDeque::new();
        let mut visited: HashSet<PathBuf> = HashSet::new();

        queue.push_back(root.to_path_buf());
        if let Ok(canonical) = root.canonicalize() {
            visited.insert(canonical);
        }

        let mut first = true;
        while let Some(dir) = queue.pop_front() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if first => {
                    return Err(SemdexError::PathNotFound(format!(
                        "{}: {e}",
                        root.display()
                    )));
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                    continue;
                }
            };
            first = false;

            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!("Skipping directory entry in {}: {}", dir.display(), e);
                        continue;
                    }
                };
                let path = entry.path();
                let is_dir = path.is_dir();

                if filter.is_ignored(&path, is_dir) {
                    tracing::debug!("Ignoring {}", path.display());
                    continue;
                }

                if is_dir {
                    // Canonicalize to detect symlink cycles
                    match path.canonicalize() {
                        Ok(canonical) => {
                            if visited.insert(canonical) {
                                queue.push_back(path);
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Skipping directory {}: {}", path.display(), e);
                        }
                    }
                } else if path.is_file() {
                    match self.scan_file(root, &path) {
                        Some(file_chunks) => {
                            stats.files_scanned += 1;
                            chunks.extend(file_chunks);
                        }
                        None => stats.files_skipped += 1,
                    }
                }
            }
        }

        tracing::info!(
            "Scanned {} ({} files, {} skipped, {} chunks)",
            root.display(),
            stats.files_scanned,
            stats.files_skipped,
            chunks.len()
        );

        Ok((chunks, stats))
    }

    /// Read and chunk one file, stamping relative source paths.
    /// Returns `None` when the file is skipped.
    fn scan_file(&self, root: &Path, path: &Path) -> Option<Vec<Chunk>> {
        if self.max_file_size_bytes > 0 {
            match fs::metadata(path) {
                Ok(meta) if meta.len() > self.max_file_size_bytes => {
                    tracing::warn!(
                        "Skipping {} ({} bytes exceeds size limit)",
                        path.display(),
                        meta.len()
                    );
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    return None;
                }
            }
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                return None;
            }
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        let source_path = relative_posix(root, path);

        let chunks = self
            .chunker
            .chunk(&content, extension)
            .into_iter()
            .map(|mut chunk| {
                chunk.source_path = Some(source_path.clone());
                chunk
            })
            .collect();

        Some(chunks)
    }
}

/// Path of `path` relative to `root` with forward slashes, falling
/// back to the full path when `path` is not under `root`.
fn relative_posix(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for component in relative.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}
