//! Data types for documents, chunks, and indexed points.

use serde::{Deserialize, Serialize};

/// An uploaded document awaiting ingestion.
///
/// Documents are ephemeral: they exist only while their text is extracted,
/// chunked, and stored. Nothing in the pipeline holds on to the raw bytes
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The display name of the document, recorded as the `source` of every
    /// chunk derived from it.
    pub name: String,
    /// The raw file bytes as uploaded.
    pub bytes: Vec<u8>,
}

impl Document {
    /// Create a new document from a name and raw bytes.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }
}

/// A bounded-length fragment of extracted document text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The point identifier assigned by the configured
    /// [`IdStrategy`](crate::chunking::IdStrategy).
    pub id: u64,
    /// The text content of the chunk.
    pub text: String,
    /// The name of the document this chunk was extracted from.
    pub source: String,
}

/// The payload stored alongside each vector in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointPayload {
    /// The chunk text.
    pub text: String,
    /// The source document name.
    pub source: String,
}

/// A (id, vector, payload) triple as persisted by a
/// [`VectorStore`](crate::vectorstore::VectorStore).
///
/// Points are immutable once stored; re-ingesting a document creates new
/// points rather than updating existing ones in place.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPoint {
    /// The point identifier.
    pub id: u64,
    /// The embedding vector for the payload text.
    pub vector: Vec<f32>,
    /// The stored payload.
    pub payload: PointPayload,
}

/// A retrieved point paired with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    /// The stored payload.
    pub payload: PointPayload,
    /// Cosine similarity to the query vector (higher is more relevant).
    pub score: f32,
}
