//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps collections in a `HashMap` behind a
//! `tokio::sync::RwLock`. It is suitable for development and tests; the
//! production backend is [`QdrantVectorStore`](crate::qdrant::QdrantVectorStore).

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexedPoint, ScoredPoint};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// An in-memory vector store using cosine similarity for search.
///
/// Collections map point ids to points, so upserting a point with an
/// existing id overwrites it, matching the overwrite-on-collision behavior
/// of numeric-id stores.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, HashMap<u64, IndexedPoint>>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    fn missing(collection: &str) -> RagError {
        RagError::VectorStore {
            backend: "InMemory".to_string(),
            message: format!("collection '{collection}' does not exist"),
        }
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ensure_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: &[IndexedPoint]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;
        for point in points {
            store.insert(point.id, point.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| Self::missing(collection))?;

        let mut scored: Vec<ScoredPoint> = store
            .values()
            .map(|point| ScoredPoint {
                payload: point.payload.clone(),
                score: cosine_similarity(&point.vector, vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| Self::missing(collection))?;
        Ok(store.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PointPayload;

    fn point(id: u64, vector: Vec<f32>, text: &str) -> IndexedPoint {
        IndexedPoint {
            id,
            vector,
            payload: PointPayload { text: text.to_string(), source: "test.pdf".to_string() },
        }
    }

    #[tokio::test]
    async fn query_orders_by_descending_similarity() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection("c", 2).await.unwrap();
        store
            .upsert(
                "c",
                &[
                    point(1, vec![1.0, 0.0], "aligned"),
                    point(2, vec![0.0, 1.0], "orthogonal"),
                    point(3, vec![1.0, 1.0], "diagonal"),
                ],
            )
            .await
            .unwrap();

        let hits = store.query("c", &[1.0, 0.0], 10).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].payload.text, "aligned");
        assert_eq!(hits[1].payload.text, "diagonal");
        assert_eq!(hits[2].payload.text, "orthogonal");
    }

    #[tokio::test]
    async fn query_respects_limit() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection("c", 2).await.unwrap();
        let points: Vec<IndexedPoint> =
            (0..10).map(|i| point(i, vec![1.0, i as f32], "t")).collect();
        store.upsert("c", &points).await.unwrap();

        let hits = store.query("c", &[1.0, 0.0], 3).await.unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn upsert_with_same_id_overwrites() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection("c", 2).await.unwrap();
        store.upsert("c", &[point(7, vec![1.0, 0.0], "first")]).await.unwrap();
        store.upsert("c", &[point(7, vec![1.0, 0.0], "second")]).await.unwrap();
        assert_eq!(store.count("c").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ensure_collection_is_idempotent() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection("c", 2).await.unwrap();
        store.upsert("c", &[point(1, vec![1.0, 0.0], "kept")]).await.unwrap();
        store.ensure_collection("c", 2).await.unwrap();
        assert_eq!(store.count("c").await.unwrap(), 1);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
