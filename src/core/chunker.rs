//! Content-aware, UTF-8 safe chunking.
//!
//! Splits raw file content into retrieval units based on a
//! content-type hint derived from the file extension: markdown is
//! scanned for fenced code blocks, code files split on blank-line
//! boundaries, and everything else goes through a character-based
//! sliding window. All sizes are measured in **characters**, not
//! bytes, so chunk boundaries always fall on valid character
//! boundaries.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::core::types::{Chunk, ContentType};

/// Fallback window size when an invalid chunk size is configured
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Extension (without dot, lowercase) to content type.
static EXTENSION_TYPES: Lazy<HashMap<&'static str, ContentType>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for ext in ["md", "txt", "json", "yaml", "yml", "toml"] {
        map.insert(ext, ContentType::Text);
    }
    for ext in [
        "ts", "js", "jsx", "tsx", "py", "java", "go", "cs", "rs", "c", "cpp", "rb", "sh", "html",
        "css",
    ] {
        map.insert(ext, ContentType::Code);
    }
    map
});

/// Lowercase an extension and strip a leading dot, if present.
fn normalize_extension(extension: &str) -> String {
    extension.strip_prefix('.').unwrap_or(extension).to_lowercase()
}

/// Look up the content type for a normalized extension.
fn content_type_for(extension: &str) -> ContentType {
    EXTENSION_TYPES
        .get(extension)
        .copied()
        .unwrap_or(ContentType::Unknown)
}

/// Content-aware chunker.
///
/// Construction clamps invalid parameters instead of failing:
/// `chunk()` never errors, and an internal failure yields an empty
/// sequence for the caller to log.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Number of characters per sliding window
    chunk_size: usize,

    /// Number of characters repeated between consecutive windows
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// A zero `chunk_size` falls back to [`DEFAULT_CHUNK_SIZE`]; an
    /// `overlap >= chunk_size` is clamped to `chunk_size / 2` so the
    /// window step stays positive and the scan always advances.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = if chunk_size == 0 {
            tracing::warn!(
                "Chunk size must be positive, using default {}",
                DEFAULT_CHUNK_SIZE
            );
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };

        let overlap = if overlap >= chunk_size {
            let clamped = chunk_size / 2;
            tracing::warn!(
                "Chunk size ({}) should be greater than overlap ({}), clamping overlap to {}",
                chunk_size,
                overlap,
                clamped
            );
            clamped
        } else {
            overlap
        };

        Self {
            chunk_size,
            overlap,
        }
    }

    /// Get the chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the overlap size in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Window advance in characters; always > 0 by construction.
    fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Chunk file content according to its extension.
    ///
    /// The extension may be given with or without the leading dot and
    /// is matched case-insensitively. Unmapped extensions use text
    /// chunking but are tagged `unknown`.
    pub fn chunk(&self, content: &str, file_extension: &str) -> Vec<Chunk> {
        let extension = normalize_extension(file_extension);
        match content_type_for(&extension) {
            ContentType::Text if extension == "md" => self.chunk_markdown(content),
            ContentType::Text => self.chunk_text(content, ContentType::Text),
            ContentType::Code => self.chunk_code(content, &extension),
            ContentType::Unknown => {
                tracing::debug!(
                    "Unknown file extension '{}', using generic text chunking",
                    extension
                );
                self.chunk_text(content, ContentType::Unknown)
            }
        }
    }

    /// Generic sliding-window chunking over characters.
    ///
    /// Windows are tracked with exact character bounds; the final
    /// window always reaches the end of the content, so no separate
    /// tail-coverage pass is needed. Whitespace-only windows are
    /// dropped without affecting advancement.
    pub fn chunk_text(&self, content: &str, content_type: ContentType) -> Vec<Chunk> {
        // (byte offset, char) pairs keep every slice on a character
        // boundary regardless of multi-byte sequences.
        let char_indices: Vec<(usize, char)> = content.char_indices().collect();

        if char_indices.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < char_indices.len() {
            let end = (start + self.chunk_size).min(char_indices.len());

            let byte_start = char_indices[start].0;
            let byte_end = if end < char_indices.len() {
                char_indices[end].0
            } else {
                content.len()
            };

            let window = &content[byte_start..byte_end];
            if !window.trim().is_empty() {
                chunks.push(Chunk::new(window, content_type));
            }

            start += self.step();
        }

        chunks
    }

    /// Markdown-aware chunking.
    ///
    /// Text between fences goes through the sliding window tagged
    /// `text`; each fenced body becomes exactly one `code` chunk
    /// carrying the declared language tag, fence delimiters excluded.
    /// Whitespace-only bodies emit nothing but still advance the
    /// cursor. An unclosed fence is not a fence: the remainder is
    /// chunked as text.
    fn chunk_markdown(&self, content: &str) -> Vec<Chunk> {
        // (byte offset, line without terminator, segment length)
        let mut lines = Vec::new();
        let mut offset = 0;
        for segment in content.split_inclusive('\n') {
            let line = segment
                .strip_suffix('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .unwrap_or(segment);
            lines.push((offset, line, segment.len()));
            offset += segment.len();
        }

        let mut chunks = Vec::new();
        let mut cursor = 0; // byte offset of the first unconsumed byte
        let mut i = 0;

        while i < lines.len() {
            let (line_start, line, line_len) = lines[i];

            let tag = match fence_open(line) {
                Some(tag) => tag,
                None => {
                    i += 1;
                    continue;
                }
            };

            let close = (i + 1..lines.len()).find(|&j| lines[j].1.trim_end() == "```");
            let Some(close) = close else {
                break;
            };

            // Text preceding the fence
            if line_start > cursor {
                let segment = &content[cursor..line_start];
                if !segment.trim().is_empty() {
                    chunks.extend(self.chunk_text(segment, ContentType::Text));
                }
            }

            // Fenced body, delimiters and the body's final newline excluded
            let body_start = line_start + line_len;
            let body_end = lines[close].0;
            let body = &content[body_start..body_end];
            let body = body
                .strip_suffix('\n')
                .map(|b| b.strip_suffix('\r').unwrap_or(b))
                .unwrap_or(body);

            if !body.trim().is_empty() {
                let language = if tag.is_empty() {
                    None
                } else {
                    Some(tag.to_lowercase())
                };
                chunks.push(Chunk::new(body, ContentType::Code).with_language(language));
            }

            cursor = lines[close].0 + lines[close].2;
            i = close + 1;
        }

        // Trailing text after the last fence
        if cursor < content.len() {
            let tail = &content[cursor..];
            if !tail.trim().is_empty() {
                chunks.extend(self.chunk_text(tail, ContentType::Text));
            }
        }

        chunks
    }

    /// Generic code chunking: split on runs of blank lines, keeping
    /// each block's internal indentation intact. Blocks have no size
    /// cap; callers with embedding-length limits must split further
    /// upstream.
    fn chunk_code(&self, content: &str, extension: &str) -> Vec<Chunk> {
        let language = if extension.is_empty() {
            None
        } else {
            Some(extension.to_string())
        };

        let mut chunks = Vec::new();
        let mut block = String::new();

        let mut flush = |block: &mut String| {
            if !block.trim().is_empty() {
                chunks.push(
                    Chunk::new(block.as_str(), ContentType::Code)
                        .with_language(language.clone()),
                );
            }
            block.clear();
        };

        for line in content.lines() {
            if line.trim().is_empty() {
                flush(&mut block);
            } else {
                if !block.is_empty() {
                    block.push('\n');
                }
                block.push_str(line);
            }
        }
        flush(&mut block);

        chunks
    }
}

/// Parse an opening fence line: three backticks followed immediately
/// by an optional word-character language tag and nothing else.
fn fence_open(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("```")?.trim_end();
    if rest.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Some(rest)
    } else {
        None
    }
}
