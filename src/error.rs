//! Error types for the `notes-rag` crate.

use thiserror::Error;

use crate::chat::ChatError;

/// Errors that can occur in the RAG pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// A collaborator was unreachable or misconfigured at construction time.
    ///
    /// Initialization failures are fatal for the session and are never
    /// retried silently.
    #[error("Initialization error ({component}): {message}")]
    Init {
        /// The component that failed to initialize.
        component: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A PDF could not be read or its text could not be extracted.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The language-model collaborator failed.
    ///
    /// This variant never reaches callers of
    /// [`AnswerComposer::compose`](crate::composer::AnswerComposer::compose),
    /// which formats the failure into a non-fatal answer string instead.
    #[error("Generation error: {0}")]
    Generation(#[from] ChatError),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in the pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
