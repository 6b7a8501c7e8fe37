//! Embedder trait and the deterministic hash fallback.
//!
//! Every embedder in this crate produces vectors of [`EMBEDDING_DIM`]
//! components. Two embeddings are only comparable when produced by the same
//! embedding strategy: ingesting with one embedder and querying with another
//! silently degrades relevance, so a pipeline must use a single embedder for
//! both paths.

use async_trait::async_trait;
use sha2::{Digest, Sha512};

use crate::error::Result;

/// The fixed dimensionality of every embedding in the system.
pub const EMBEDDING_DIM: usize = 384;

/// Converts text into fixed-dimension embedding vectors.
///
/// Implementations must be deterministic: embedding the same text twice
/// yields identical vectors. The default
/// [`embed_batch`](Embedder::embed_batch) calls
/// [`embed`](Embedder::embed) sequentially; backends with native batching
/// should override it.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this embedder.
    fn dimensions(&self) -> usize;
}

/// A degraded-mode fallback embedder derived from a cryptographic hash.
///
/// Each of the 384 dimensions is one bit of the SHA-512 digest of the input
/// text, mapped to `+1.0` or `-1.0`. Identical text always maps to an
/// identical vector, which keeps ingestion and retrieval functional when no
/// ML runtime is available — but the vectors carry **no semantic meaning**,
/// so nearest-neighbor ranking is essentially random with respect to
/// question meaning. Use [`SemanticEmbedder`](crate::semantic::SemanticEmbedder)
/// wherever the `semantic` feature can be enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashEmbedder;

impl HashEmbedder {
    /// Create a new hash embedder.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let digest = Sha512::digest(text.as_bytes());

        let mut vector = Vec::with_capacity(EMBEDDING_DIM);
        for i in 0..EMBEDDING_DIM {
            let bit = (digest[i / 8] >> (7 - (i % 8))) & 1;
            vector.push(if bit == 1 { 1.0 } else { -1.0 });
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_embedding_is_deterministic() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed("what is a loop in python?").await.unwrap();
        let b = embedder.embed("what is a loop in python?").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn hash_embedding_has_384_signed_unit_components() {
        let embedder = HashEmbedder::new();
        let vector = embedder.embed("css selectors").await.unwrap();
        assert_eq!(vector.len(), EMBEDDING_DIM);
        assert!(vector.iter().all(|v| *v == 1.0 || *v == -1.0));
    }

    #[tokio::test]
    async fn different_texts_embed_differently() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed("functions").await.unwrap();
        let b = embedder.embed("variables").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn batch_matches_single_embeds() {
        let embedder = HashEmbedder::new();
        let batch = embedder.embed_batch(&["one", "two"]).await.unwrap();
        assert_eq!(batch[0], embedder.embed("one").await.unwrap());
        assert_eq!(batch[1], embedder.embed("two").await.unwrap());
    }
}
