//! Retrieval orchestrator: ingestion and similarity search.
//!
//! The [`Retriever`] composes a [`PdfExtractor`], a [`Chunker`], an
//! [`Embedder`], and a [`VectorStore`] into the two pipeline operations:
//! ingesting documents and retrieving contexts for a query.
//!
//! Ingestion and query MUST use the same embedding strategy; embeddings
//! from different embedders are not comparable, and mixing them silently
//! degrades relevance. Build one [`Embedder`] per process and hand the same
//! handle to every retriever.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use notes_rag::{
//!     Document, HashEmbedder, InMemoryVectorStore, LopdfExtractor, RagConfig, Retriever,
//! };
//!
//! let retriever = Retriever::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(HashEmbedder::new()))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .extractor(Arc::new(LopdfExtractor::new()))
//!     .build()?;
//!
//! retriever.ensure_collection().await?;
//! let stored = retriever.ingest(&Document::new("lecture-3.pdf", bytes)).await?;
//! let contexts = retriever.retrieve("what is a loop?", 5).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chunking::{Chunker, PointIdGen, WindowChunker};
use crate::config::RagConfig;
use crate::document::{Document, IndexedPoint, PointPayload};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::extract::PdfExtractor;
use crate::vectorstore::VectorStore;

/// Orchestrates chunking, embedding, and vector storage.
///
/// Construct one via [`Retriever::builder()`].
pub struct Retriever {
    config: RagConfig,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    extractor: Arc<dyn PdfExtractor>,
    chunker: Arc<dyn Chunker>,
    ids: PointIdGen,
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Create the configured collection in the vector store if it does not
    /// already exist, sized to the embedder's dimensionality.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if the vector store operation fails.
    pub async fn ensure_collection(&self) -> Result<()> {
        let name = &self.config.collection;
        self.vector_store.ensure_collection(name, self.embedder.dimensions()).await.map_err(
            |e| {
                error!(collection = %name, error = %e, "failed to ensure collection");
                RagError::Pipeline(format!("failed to ensure collection '{name}': {e}"))
            },
        )
    }

    /// Ingest a document: extract pages, chunk, embed, and store.
    ///
    /// Returns the number of chunks stored. Points are upserted in batches
    /// of [`RagConfig::batch_size`]; each batch is committed independently,
    /// so a failure aborts ingestion without corrupting batches already
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Extraction`] if the PDF cannot be read, or
    /// [`RagError::Pipeline`] if embedding or storage fails.
    pub async fn ingest(&self, document: &Document) -> Result<usize> {
        let pages = self.extractor.extract_pages(&document.bytes).await?;
        self.ingest_pages(&document.name, &pages).await
    }

    /// Ingest already-extracted page texts under the given source name.
    pub async fn ingest_pages(&self, source: &str, pages: &[String]) -> Result<usize> {
        let chunks = self.chunker.chunk(pages, source, &self.ids);
        if chunks.is_empty() {
            info!(document = %source, chunk_count = 0, "ingested document (no text)");
            return Ok(0);
        }

        for batch in chunks.chunks(self.config.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
                error!(document = %source, error = %e, "embedding failed during ingestion");
                RagError::Pipeline(format!("embedding failed for document '{source}': {e}"))
            })?;

            let points: Vec<IndexedPoint> = batch
                .iter()
                .zip(embeddings)
                .map(|(chunk, vector)| IndexedPoint {
                    id: chunk.id,
                    vector,
                    payload: PointPayload {
                        text: chunk.text.clone(),
                        source: chunk.source.clone(),
                    },
                })
                .collect();

            self.vector_store.upsert(&self.config.collection, &points).await.map_err(|e| {
                error!(document = %source, error = %e, "upsert failed during ingestion");
                RagError::Pipeline(format!("upsert failed for document '{source}': {e}"))
            })?;
        }

        let chunk_count = chunks.len();
        info!(document = %source, chunk_count, "ingested document");
        Ok(chunk_count)
    }

    /// Retrieve up to `limit` context texts for `query`, most similar first.
    ///
    /// A vector store failure degrades to an empty result so the pipeline
    /// answers with the no-information sentinel instead of crashing; only
    /// an embedding failure is an error.
    pub async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let vector = self.embedder.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::Pipeline(format!("query embedding failed: {e}"))
        })?;

        let scored =
            match self.vector_store.query(&self.config.collection, &vector, limit).await {
                Ok(scored) => scored,
                Err(e) => {
                    warn!(collection = %self.config.collection, error = %e,
                        "vector store query failed, returning no contexts");
                    return Ok(Vec::new());
                }
            };

        info!(context_count = scored.len(), "retrieved contexts");
        Ok(scored.into_iter().map(|p| p.payload.text).collect())
    }

    /// Return the number of points stored in the configured collection.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if the vector store operation fails.
    pub async fn stored_count(&self) -> Result<u64> {
        self.vector_store.count(&self.config.collection).await.map_err(|e| {
            RagError::Pipeline(format!(
                "count failed for collection '{}': {e}",
                self.config.collection
            ))
        })
    }
}

/// Builder for constructing a [`Retriever`].
///
/// `config`, `embedder`, `vector_store`, and `extractor` are required. The
/// chunker defaults to a [`WindowChunker`] sized from the configuration.
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn Embedder>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    extractor: Option<Arc<dyn PdfExtractor>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RetrieverBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedder used for both ingestion and queries.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the PDF extraction collaborator.
    pub fn extractor(mut self, extractor: Arc<dyn PdfExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Override the chunker (defaults to a [`WindowChunker`] built from the
    /// configured `chunk_max_len` and `chunk_stride`).
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`Retriever`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<Retriever> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        let extractor =
            self.extractor.ok_or_else(|| RagError::Config("extractor is required".to_string()))?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(WindowChunker::new(config.chunk_max_len, config.chunk_stride)));
        let ids = PointIdGen::new(config.id_strategy.clone());

        Ok(Retriever { config, embedder, vector_store, extractor, chunker, ids })
    }
}
