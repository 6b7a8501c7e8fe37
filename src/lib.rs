//! # notes-rag
//!
//! Retrieval-augmented question answering over PDF lecture notes.
//!
//! The crate ingests PDF documents, stores chunked text as 384-dimensional
//! vector embeddings, and answers questions by retrieving the most similar
//! chunks and handing them to a chat model with a strict
//! answer-only-from-context policy. The interactive shell (UI, upload
//! widgets, chat history) is the caller's concern; this crate is the
//! pipeline underneath it.
//!
//! ## Components
//!
//! - [`Embedder`] — text to fixed-dimension vectors. [`SemanticEmbedder`]
//!   (feature `semantic`) runs a multilingual sentence-embedding model
//!   locally; [`HashEmbedder`] is a deterministic degraded-mode fallback
//!   whose vectors carry no semantic meaning.
//! - [`WindowChunker`] — fixed-size character windows with a configurable
//!   stride.
//! - [`VectorStore`] — upsert / nearest-neighbor / count contract;
//!   [`QdrantVectorStore`] (feature `qdrant`) for production,
//!   [`InMemoryVectorStore`] for development and tests.
//! - [`Retriever`] — orchestrates extraction, chunking, embedding, and
//!   storage for ingestion, and embedding plus similarity search for
//!   queries.
//! - [`AnswerComposer`] — grounded prompt construction and generation via a
//!   [`ChatModel`] such as [`GroqChatModel`] (feature `groq`).
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use notes_rag::{
//!     AnswerComposer, Document, GroqChatModel, LopdfExtractor, QdrantVectorStore, RagConfig,
//!     Retriever, SemanticEmbedder,
//! };
//!
//! let config = RagConfig::from_env()?;
//! let embedder = Arc::new(SemanticEmbedder::new()?);
//!
//! let retriever = Retriever::builder()
//!     .config(config.clone())
//!     .embedder(embedder)
//!     .vector_store(Arc::new(QdrantVectorStore::from_env()?))
//!     .extractor(Arc::new(LopdfExtractor::new()))
//!     .build()?;
//! retriever.ensure_collection().await?;
//!
//! let composer = AnswerComposer::new(Arc::new(GroqChatModel::from_env()?), config.clone());
//!
//! retriever.ingest(&Document::new("lecture-3.pdf", bytes)).await?;
//! let contexts = retriever.retrieve("What is a loop?", config.retrieval_limit).await?;
//! let answer = composer.compose("What is a loop?", &contexts).await;
//! ```
//!
//! Ingestion and query must use the same embedding strategy; vectors from
//! different embedders are not comparable.

pub mod chat;
pub mod chunking;
pub mod composer;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
#[cfg(feature = "groq")]
pub mod groq;
pub mod inmemory;
#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod retriever;
#[cfg(feature = "semantic")]
pub mod semantic;
pub mod vectorstore;

pub use chat::{ChatError, ChatModel};
pub use chunking::{Chunker, IdStrategy, PointIdGen, WindowChunker, DEFAULT_ID_MODULUS};
pub use composer::{AnswerComposer, SENTINEL_ANSWER};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, IndexedPoint, PointPayload, ScoredPoint};
pub use embedding::{Embedder, HashEmbedder, EMBEDDING_DIM};
pub use error::{RagError, Result};
pub use extract::PdfExtractor;
#[cfg(feature = "pdf")]
pub use extract::LopdfExtractor;
#[cfg(feature = "groq")]
pub use groq::GroqChatModel;
pub use inmemory::InMemoryVectorStore;
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
pub use retriever::{Retriever, RetrieverBuilder};
#[cfg(feature = "semantic")]
pub use semantic::SemanticEmbedder;
pub use vectorstore::VectorStore;
