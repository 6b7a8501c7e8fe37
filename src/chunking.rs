//! Chunking policy: windowing extracted page text and assigning point ids.
//!
//! The [`WindowChunker`] produces consecutive character windows of a fixed
//! maximum length starting every `stride` characters. `stride < max_len`
//! gives overlapping chunks, `stride == max_len` gives disjoint ones.
//! Windows whose trimmed content is empty are skipped.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::document::Chunk;

/// Default modulus for [`IdStrategy::TruncatedHash`], matching the id space
/// expected by numeric-id vector stores.
pub const DEFAULT_ID_MODULUS: u64 = 100_000_000;

/// How point identifiers are derived for new chunks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    /// Derive the id from a SHA-256 hash of (chunk text, source name,
    /// batch index), reduced modulo `modulus`.
    ///
    /// Ids are deterministic and collision-resistant as a best-effort
    /// uniqueness measure, not a cryptographic guarantee: with the default
    /// modulus of 10^8, collisions are possible and a colliding point
    /// silently overwrites the earlier one in the store.
    TruncatedHash {
        /// Upper bound (exclusive) for generated ids.
        modulus: u64,
    },
    /// Assign ids from a monotonic counter owned by the [`PointIdGen`].
    ///
    /// Guarantees uniqueness per generator (in practice: per retriever),
    /// but ids are not reproducible across runs and every generator starts
    /// at zero — two retrievers writing to the same collection will
    /// overwrite each other's points. Use one retriever per collection
    /// with this strategy.
    Sequential,
}

impl Default for IdStrategy {
    fn default() -> Self {
        Self::TruncatedHash { modulus: DEFAULT_ID_MODULUS }
    }
}

/// Generates point identifiers according to an [`IdStrategy`].
///
/// Thread-safe; the sequential strategy uses an atomic counter.
#[derive(Debug)]
pub struct PointIdGen {
    strategy: IdStrategy,
    next: AtomicU64,
}

impl PointIdGen {
    /// Create a new generator for the given strategy.
    pub fn new(strategy: IdStrategy) -> Self {
        Self { strategy, next: AtomicU64::new(0) }
    }

    /// Produce an id for a chunk.
    ///
    /// `index` is the chunk's sequential position within the ingestion
    /// batch; together with the text and source name it makes hash-derived
    /// ids deterministic for reproducible ingestion.
    pub fn id_for(&self, text: &str, source: &str, index: u64) -> u64 {
        match &self.strategy {
            IdStrategy::TruncatedHash { modulus } => {
                let mut hasher = Sha256::new();
                hasher.update(text.as_bytes());
                hasher.update([0u8]);
                hasher.update(source.as_bytes());
                hasher.update([0u8]);
                hasher.update(index.to_le_bytes());
                let digest = hasher.finalize();
                let mut head = [0u8; 8];
                head.copy_from_slice(&digest[..8]);
                u64::from_be_bytes(head) % (*modulus).max(1)
            }
            IdStrategy::Sequential => self.next.fetch_add(1, Ordering::Relaxed),
        }
    }
}

/// A strategy for splitting extracted page texts into chunks.
pub trait Chunker: Send + Sync {
    /// Split page texts into chunks tagged with the source document name.
    ///
    /// Returns an empty `Vec` when every page is empty or whitespace.
    fn chunk(&self, pages: &[String], source: &str, ids: &PointIdGen) -> Vec<Chunk>;
}

/// Splits text into fixed-size character windows with a configurable stride.
///
/// # Example
///
/// ```rust,ignore
/// use notes_rag::{WindowChunker, Chunker, PointIdGen, IdStrategy};
///
/// let chunker = WindowChunker::new(800, 600);
/// let ids = PointIdGen::new(IdStrategy::default());
/// let chunks = chunker.chunk(&pages, "lecture-3.pdf", &ids);
/// ```
#[derive(Debug, Clone)]
pub struct WindowChunker {
    max_len: usize,
    stride: usize,
}

impl WindowChunker {
    /// Create a new `WindowChunker`.
    ///
    /// # Arguments
    ///
    /// * `max_len` — maximum number of characters per chunk
    /// * `stride` — distance in characters between window starts
    pub fn new(max_len: usize, stride: usize) -> Self {
        Self { max_len, stride }
    }
}

/// Produce character windows of `text`, respecting UTF-8 boundaries.
///
/// Window positions are counted in characters, not bytes, so multilingual
/// text never splits mid-codepoint.
fn char_windows(text: &str, max_len: usize, stride: usize) -> Vec<&str> {
    if text.is_empty() || max_len == 0 {
        return Vec::new();
    }

    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    bounds.push(text.len());
    let char_count = bounds.len() - 1;

    let mut windows = Vec::new();
    let mut start = 0;
    while start < char_count {
        let end = (start + max_len).min(char_count);
        windows.push(&text[bounds[start]..bounds[end]]);
        if stride == 0 {
            break;
        }
        start += stride;
    }

    windows
}

impl Chunker for WindowChunker {
    fn chunk(&self, pages: &[String], source: &str, ids: &PointIdGen) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for page in pages {
            for window in char_windows(page, self.max_len, self.stride) {
                if window.trim().is_empty() {
                    continue;
                }
                let index = chunks.len() as u64;
                chunks.push(Chunk {
                    id: ids.id_for(window, source, index),
                    text: window.to_string(),
                    source: source.to_string(),
                });
            }
        }

        chunks
    }
}
