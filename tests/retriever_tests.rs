//! End-to-end pipeline tests with fake collaborators.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use notes_rag::{
    AnswerComposer, ChatError, ChatModel, Document, Embedder, HashEmbedder, IndexedPoint,
    InMemoryVectorStore, PdfExtractor, RagConfig, RagError, Retriever, ScoredPoint,
    SENTINEL_ANSWER, VectorStore,
};

/// Hands back preset page texts regardless of the bytes.
struct StubExtractor {
    pages: Vec<String>,
}

#[async_trait]
impl PdfExtractor for StubExtractor {
    async fn extract_pages(&self, _bytes: &[u8]) -> notes_rag::Result<Vec<String>> {
        Ok(self.pages.clone())
    }
}

/// Delegates to an inner store while counting upsert calls.
struct CountingStore {
    inner: InMemoryVectorStore,
    upserts: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self { inner: InMemoryVectorStore::new(), upserts: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl VectorStore for CountingStore {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> notes_rag::Result<()> {
        self.inner.ensure_collection(name, dimensions).await
    }

    async fn upsert(&self, collection: &str, points: &[IndexedPoint]) -> notes_rag::Result<()> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(collection, points).await
    }

    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> notes_rag::Result<Vec<ScoredPoint>> {
        self.inner.query(collection, vector, limit).await
    }

    async fn count(&self, collection: &str) -> notes_rag::Result<u64> {
        self.inner.count(collection).await
    }
}

/// Fails every query, for exercising the degraded retrieval path.
struct BrokenStore;

#[async_trait]
impl VectorStore for BrokenStore {
    async fn ensure_collection(&self, _name: &str, _dimensions: usize) -> notes_rag::Result<()> {
        Ok(())
    }

    async fn upsert(&self, _collection: &str, _points: &[IndexedPoint]) -> notes_rag::Result<()> {
        Ok(())
    }

    async fn query(
        &self,
        _collection: &str,
        _vector: &[f32],
        _limit: usize,
    ) -> notes_rag::Result<Vec<ScoredPoint>> {
        Err(RagError::VectorStore {
            backend: "broken".to_string(),
            message: "connection refused".to_string(),
        })
    }

    async fn count(&self, _collection: &str) -> notes_rag::Result<u64> {
        Ok(0)
    }
}

/// Always fails, for the non-fatal generation path.
struct BrokenModel;

#[async_trait]
impl ChatModel for BrokenModel {
    async fn complete(
        &self,
        _system: &str,
        _user: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String, ChatError> {
        Err(ChatError::Transport("connection reset".to_string()))
    }
}

fn config(max_len: usize, stride: usize) -> RagConfig {
    RagConfig::builder()
        .chunk_max_len(max_len)
        .chunk_stride(stride)
        .retrieval_limit(5)
        .build()
        .unwrap()
}

fn retriever_with_store<S: VectorStore + 'static>(
    config: RagConfig,
    store: Arc<S>,
    pages: Vec<String>,
) -> Retriever {
    Retriever::builder()
        .config(config)
        .embedder(Arc::new(HashEmbedder::new()))
        .vector_store(store)
        .extractor(Arc::new(StubExtractor { pages }))
        .build()
        .unwrap()
}

#[tokio::test]
async fn exact_fit_page_stores_one_chunk() {
    let store = Arc::new(InMemoryVectorStore::new());
    let retriever =
        retriever_with_store(config(500, 500), Arc::clone(&store), vec!["x".repeat(500)]);
    retriever.ensure_collection().await.unwrap();

    let before = retriever.stored_count().await.unwrap();
    let stored = retriever.ingest(&Document::new("single.pdf", vec![0u8])).await.unwrap();

    assert_eq!(stored, 1);
    assert_eq!(retriever.stored_count().await.unwrap(), before + 1);
}

#[tokio::test]
async fn identical_documents_with_different_names_stay_distinct() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pages = vec!["the same lecture content in both files".to_string()];
    let retriever = retriever_with_store(config(800, 600), Arc::clone(&store), pages);
    retriever.ensure_collection().await.unwrap();

    retriever.ingest(&Document::new("first.pdf", vec![])).await.unwrap();
    retriever.ingest(&Document::new("second.pdf", vec![])).await.unwrap();

    assert_eq!(retriever.stored_count().await.unwrap(), 2);

    let vector = HashEmbedder::new().embed("the same lecture content in both files").await.unwrap();
    let hits = store.query(retriever.config().collection.as_str(), &vector, 10).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].payload.text, hits[1].payload.text);
    assert_ne!(hits[0].payload.source, hits[1].payload.source);
}

#[tokio::test]
async fn ingestion_upserts_in_batches() {
    let store = Arc::new(CountingStore::new());
    // 5 disjoint chunks with batch_size 2 means 3 upsert calls.
    let config = RagConfig::builder()
        .chunk_max_len(10)
        .chunk_stride(10)
        .batch_size(2)
        .build()
        .unwrap();
    let retriever =
        retriever_with_store(config, Arc::clone(&store), vec!["a".repeat(50)]);
    retriever.ensure_collection().await.unwrap();

    let stored = retriever.ingest(&Document::new("batched.pdf", vec![])).await.unwrap();

    assert_eq!(stored, 5);
    assert_eq!(store.upserts.load(Ordering::SeqCst), 3);
    assert_eq!(store.count("lecture_notes").await.unwrap(), 5);
}

#[tokio::test]
async fn empty_document_stores_nothing() {
    let store = Arc::new(InMemoryVectorStore::new());
    let retriever = retriever_with_store(config(800, 600), Arc::clone(&store), vec![]);
    retriever.ensure_collection().await.unwrap();

    let stored = retriever.ingest(&Document::new("empty.pdf", vec![])).await.unwrap();
    assert_eq!(stored, 0);
    assert_eq!(retriever.stored_count().await.unwrap(), 0);
}

#[tokio::test]
async fn retrieve_returns_at_most_limit_most_similar_first() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pages = vec![
        "loops repeat a block of statements".to_string(),
        "functions group reusable code".to_string(),
        "css describes how pages look".to_string(),
    ];
    // One chunk per page.
    let retriever = retriever_with_store(config(100, 100), Arc::clone(&store), pages);
    retriever.ensure_collection().await.unwrap();
    retriever.ingest(&Document::new("notes.pdf", vec![])).await.unwrap();

    let contexts =
        retriever.retrieve("loops repeat a block of statements", 2).await.unwrap();

    assert!(contexts.len() <= 2);
    // The hash embedder maps identical text to an identical vector, so the
    // verbatim chunk ranks first with cosine similarity 1.
    assert_eq!(contexts[0], "loops repeat a block of statements");
}

#[tokio::test]
async fn query_far_from_everything_yields_sentinel_answer() {
    let store = Arc::new(InMemoryVectorStore::new());
    let retriever = retriever_with_store(config(800, 600), Arc::clone(&store), vec![]);
    retriever.ensure_collection().await.unwrap();

    // Nothing ingested: nearest-neighbor search returns no points.
    let contexts = retriever.retrieve("anything at all", 5).await.unwrap();
    assert!(contexts.is_empty());

    let composer = AnswerComposer::new(Arc::new(BrokenModel), RagConfig::default());
    let answer = composer.compose("anything at all", &contexts).await;
    assert_eq!(answer, SENTINEL_ANSWER);
}

#[tokio::test]
async fn store_failure_degrades_to_empty_retrieval() {
    let retriever =
        retriever_with_store(config(800, 600), Arc::new(BrokenStore), vec![]);

    let contexts = retriever.retrieve("any question", 5).await.unwrap();
    assert!(contexts.is_empty());
}

#[tokio::test]
async fn model_failure_becomes_error_answer() {
    let composer = AnswerComposer::new(Arc::new(BrokenModel), RagConfig::default());
    let answer = composer.compose("a question", &["a context".to_string()]).await;

    assert!(!answer.is_empty());
    assert!(answer.contains("could not generate"));
    assert!(answer.contains("connection reset"));
}

#[cfg(feature = "pdf")]
#[tokio::test]
async fn malformed_pdf_fails_ingestion_with_extraction_error() {
    use notes_rag::LopdfExtractor;

    let retriever = Retriever::builder()
        .config(RagConfig::default())
        .embedder(Arc::new(HashEmbedder::new()))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .extractor(Arc::new(LopdfExtractor::new()))
        .build()
        .unwrap();
    retriever.ensure_collection().await.unwrap();

    let result = retriever.ingest(&Document::new("broken.pdf", b"not a pdf".to_vec())).await;
    assert!(matches!(result, Err(RagError::Extraction(_))));
}
