//! Semantic embedder backed by a local sentence-embedding model.
//!
//! This module is only available when the `semantic` feature is enabled.

use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::debug;

use crate::embedding::{Embedder, EMBEDDING_DIM};
use crate::error::{RagError, Result};

/// An [`Embedder`] backed by the `paraphrase-multilingual-MiniLM-L12-v2`
/// sentence-embedding model running locally through
/// [fastembed](https://docs.rs/fastembed).
///
/// The model produces 384-dimensional dense vectors that capture meaning
/// across languages. Construction loads the ONNX model and is expensive;
/// do it once per process and share the embedder (it is `Send + Sync`, and
/// embedding calls are cheap). Inference is CPU-bound and runs on the
/// blocking thread pool.
///
/// # Example
///
/// ```rust,ignore
/// use notes_rag::SemanticEmbedder;
///
/// let embedder = SemanticEmbedder::new()?;
/// let vector = embedder.embed("merhaba dünya").await?;
/// assert_eq!(vector.len(), 384);
/// ```
pub struct SemanticEmbedder {
    model: Arc<TextEmbedding>,
}

impl SemanticEmbedder {
    /// Load the multilingual MiniLM model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Init`] if the model cannot be fetched or loaded.
    pub fn new() -> Result<Self> {
        let options = InitOptions::new(EmbeddingModel::ParaphraseMLMiniLML12V2)
            .with_show_download_progress(false);
        let model = TextEmbedding::try_new(options).map_err(|e| RagError::Init {
            component: "fastembed".to_string(),
            message: format!("failed to load embedding model: {e}"),
        })?;
        Ok(Self { model: Arc::new(model) })
    }

    async fn embed_owned(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let count = texts.len();
        debug!(batch_size = count, "embedding with local model");

        let embeddings = tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| RagError::Embedding {
                provider: "fastembed".to_string(),
                message: format!("embedding task failed: {e}"),
            })?
            .map_err(|e| RagError::Embedding {
                provider: "fastembed".to_string(),
                message: e.to_string(),
            })?;

        if embeddings.len() != count {
            return Err(RagError::Embedding {
                provider: "fastembed".to_string(),
                message: format!("expected {count} embeddings, got {}", embeddings.len()),
            });
        }
        Ok(embeddings)
    }
}

#[async_trait]
impl Embedder for SemanticEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_owned(vec![text.to_string()]).await?;
        embeddings.pop().ok_or_else(|| RagError::Embedding {
            provider: "fastembed".to_string(),
            message: "model returned no embedding".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed_owned(texts.iter().map(|t| (*t).to_string()).collect()).await
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }
}
