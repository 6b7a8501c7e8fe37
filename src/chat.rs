//! Chat model trait for generating grounded answers.

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by a [`ChatModel`] collaborator.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request never reached the API (DNS, TLS, connection reset).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The API rejected the credential.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The API throttled the request.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The API returned any other error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// The HTTP status code returned by the API.
        status: u16,
        /// The error detail from the response body.
        message: String,
    },
}

/// A language model that completes a prompt into generated text.
///
/// Implementations wrap a specific chat-completion backend. The pipeline
/// only ever calls [`complete`](ChatModel::complete) with a system
/// instruction and a single user prompt; conversation history is owned by
/// the caller and never passed down here.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a completion for the given system instruction and user prompt.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ChatError>;
}
