//! Groq chat model using the OpenAI-compatible chat completions API.
//!
//! This module is only available when the `groq` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::chat::{ChatError, ChatModel};
use crate::error::{RagError, Result};

/// The Groq chat completions endpoint.
const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// The default chat model.
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// A [`ChatModel`] backed by the [Groq](https://groq.com/) API.
///
/// Uses `reqwest` to call the OpenAI-compatible `/chat/completions`
/// endpoint directly.
///
/// # Example
///
/// ```rust,ignore
/// use notes_rag::groq::GroqChatModel;
///
/// let model = GroqChatModel::new("gsk_...")?;
/// let answer = model.complete("You are helpful.", "Say hi.", 0.5, 64).await?;
/// ```
pub struct GroqChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GroqChatModel {
    /// Create a new model client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Init`] if the API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Init {
                component: "groq".to_string(),
                message: "API key must not be empty".to_string(),
            });
        }

        Ok(Self { client: reqwest::Client::new(), api_key, model: DEFAULT_MODEL.into() })
    }

    /// Create a new model client from the `GROQ_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| RagError::Init {
            component: "groq".to_string(),
            message: "GROQ_API_KEY environment variable not set".to_string(),
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `llama-3.1-8b-instant`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

// ── Groq API request/response types ────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── ChatModel implementation ───────────────────────────────────────

#[async_trait]
impl ChatModel for GroqChatModel {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> std::result::Result<String, ChatError> {
        debug!(model = %self.model, prompt_len = user.len(), "requesting chat completion");

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "chat request failed");
                ChatError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(%status, "chat API error");
            return Err(match status.as_u16() {
                401 | 403 => ChatError::Auth(detail),
                429 => ChatError::RateLimited(detail),
                code => ChatError::Api { status: code, message: detail },
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse chat response");
            ChatError::Api {
                status: status.as_u16(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        chat_response.choices.into_iter().next().map(|c| c.message.content).ok_or_else(|| {
            ChatError::Api {
                status: status.as_u16(),
                message: "response contained no choices".to_string(),
            }
        })
    }
}
