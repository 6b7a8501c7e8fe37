//! Vector store trait for persisting and searching indexed points.

use async_trait::async_trait;

use crate::document::{IndexedPoint, ScoredPoint};
use crate::error::Result;

/// A storage backend for embedding vectors with nearest-neighbor search.
///
/// Implementations manage named collections of [`IndexedPoint`]s using
/// cosine similarity as the distance metric. Stores own their concurrency
/// control; the pipeline never wraps calls in additional locking.
///
/// # Example
///
/// ```rust,ignore
/// use notes_rag::{VectorStore, InMemoryVectorStore, EMBEDDING_DIM};
///
/// let store = InMemoryVectorStore::new();
/// store.ensure_collection("lecture_notes", EMBEDDING_DIM).await?;
/// store.upsert("lecture_notes", &points).await?;
/// let hits = store.query("lecture_notes", &query_vector, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection with the given dimensionality.
    /// No-op if it already exists.
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Insert or overwrite points in a collection.
    ///
    /// Each call is independent and atomic from the caller's perspective;
    /// there is no cross-call transaction.
    async fn upsert(&self, collection: &str, points: &[IndexedPoint]) -> Result<()>;

    /// Return the `limit` points nearest to `vector`, ordered by
    /// descending cosine similarity.
    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>>;

    /// Return the number of points stored in a collection.
    async fn count(&self, collection: &str) -> Result<u64>;
}
