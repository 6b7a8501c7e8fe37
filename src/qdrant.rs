//! Qdrant vector store backend.
//!
//! Provides [`QdrantVectorStore`] which implements
//! [`VectorStore`](crate::vectorstore::VectorStore) using the
//! [qdrant-client](https://docs.rs/qdrant-client) crate over gRPC.
//! This module is only available when the `qdrant` feature is enabled.

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::{debug, warn};

use crate::document::{IndexedPoint, PointPayload, ScoredPoint};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Collections are created with cosine distance. Point payloads carry the
/// chunk text and source document name as string fields.
///
/// # Example
///
/// ```rust,ignore
/// use notes_rag::qdrant::QdrantVectorStore;
///
/// let store = QdrantVectorStore::new("http://localhost:6334", None)?;
/// store.ensure_collection("lecture_notes", 384).await?;
/// ```
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    /// Create a new Qdrant vector store for the given URL, with an optional
    /// API key for Qdrant Cloud.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Init`] if the client cannot be constructed.
    pub fn new(url: &str, api_key: Option<&str>) -> Result<Self> {
        let mut builder = Qdrant::from_url(url);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        let client = builder.build().map_err(|e| RagError::Init {
            component: "qdrant".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { client })
    }

    /// Create a new Qdrant vector store from the `QDRANT_URL` and optional
    /// `QDRANT_API_KEY` environment variables.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("QDRANT_URL").map_err(|_| RagError::Init {
            component: "qdrant".to_string(),
            message: "QDRANT_URL environment variable not set".to_string(),
        })?;
        let api_key = std::env::var("QDRANT_API_KEY").ok();
        Self::new(&url, api_key.as_deref())
    }

    /// Create a new Qdrant vector store from an existing client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::VectorStore { backend: "qdrant".to_string(), message: e.to_string() }
    }

    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let collections = self.client.list_collections().await.map_err(Self::map_err)?;
        if collections.collections.iter().any(|c| c.name == name) {
            debug!(collection = name, "qdrant collection already exists, skipping creation");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection = name, dimensions, "created qdrant collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: &[IndexedPoint]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = points
            .iter()
            .map(|point| {
                let payload = Payload::try_from(serde_json::json!({
                    "text": point.payload.text,
                    "source": point.payload.source,
                }))
                .unwrap_or_default();
                PointStruct::new(point.id, point.vector.clone(), payload)
            })
            .collect();

        let count = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection, count, "upserted points to qdrant");
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, vector.to_vec(), limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        // Points with a missing or non-string text field are skipped rather
        // than failing the whole query.
        let results = response
            .result
            .into_iter()
            .filter_map(|scored| {
                let Some(text) = scored.payload.get("text").and_then(Self::extract_string) else {
                    warn!(collection, "skipping point with malformed payload");
                    return None;
                };
                let source = scored
                    .payload
                    .get("source")
                    .and_then(Self::extract_string)
                    .unwrap_or_default();
                Some(ScoredPoint { payload: PointPayload { text, source }, score: scored.score })
            })
            .collect();

        Ok(results)
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        let response = self
            .client
            .count(CountPointsBuilder::new(collection).exact(true))
            .await
            .map_err(Self::map_err)?;
        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }
}
