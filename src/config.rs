//! Configuration for the RAG pipeline.

use serde::{Deserialize, Serialize};

use crate::chunking::IdStrategy;
use crate::error::{RagError, Result};

/// Configuration parameters for ingestion, retrieval, and answer generation.
///
/// Defaults mirror the operating constants of the original notes assistant:
/// 800-character chunks on a 600-character stride, five retrieved contexts,
/// temperature 0.5, and 1500-token answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Name of the vector store collection.
    pub collection: String,
    /// Maximum chunk size in characters.
    pub chunk_max_len: usize,
    /// Distance in characters between consecutive chunk starts.
    /// `chunk_stride < chunk_max_len` gives overlapping chunks.
    pub chunk_stride: usize,
    /// Number of contexts to retrieve per query.
    pub retrieval_limit: usize,
    /// Number of points upserted per batch during ingestion. Bounds peak
    /// memory and request size; not a correctness knob.
    pub batch_size: usize,
    /// Sampling temperature passed to the chat model.
    pub temperature: f32,
    /// Maximum number of tokens the chat model may generate.
    pub max_tokens: u32,
    /// Language the assistant answers in.
    pub answer_language: String,
    /// How point identifiers are assigned to chunks.
    pub id_strategy: IdStrategy,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            collection: "lecture_notes".to_string(),
            chunk_max_len: 800,
            chunk_stride: 600,
            retrieval_limit: 5,
            batch_size: 10,
            temperature: 0.5,
            max_tokens: 1500,
            answer_language: "English".to_string(),
            id_strategy: IdStrategy::default(),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Build a configuration from `RAG_*` environment variables, falling
    /// back to the defaults for anything unset.
    ///
    /// Recognized variables: `RAG_COLLECTION`, `RAG_CHUNK_MAX_LEN`,
    /// `RAG_CHUNK_STRIDE`, `RAG_RETRIEVAL_LIMIT`, `RAG_BATCH_SIZE`,
    /// `RAG_TEMPERATURE`, `RAG_MAX_TOKENS`, `RAG_ANSWER_LANGUAGE`,
    /// `RAG_ID_STRATEGY` (`truncated-hash` or `sequential`).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a set variable fails to parse or the
    /// resulting configuration is inconsistent.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder();

        if let Ok(v) = std::env::var("RAG_COLLECTION") {
            builder = builder.collection(v);
        }
        if let Ok(v) = std::env::var("RAG_CHUNK_MAX_LEN") {
            builder = builder.chunk_max_len(parse_var("RAG_CHUNK_MAX_LEN", &v)?);
        }
        if let Ok(v) = std::env::var("RAG_CHUNK_STRIDE") {
            builder = builder.chunk_stride(parse_var("RAG_CHUNK_STRIDE", &v)?);
        }
        if let Ok(v) = std::env::var("RAG_RETRIEVAL_LIMIT") {
            builder = builder.retrieval_limit(parse_var("RAG_RETRIEVAL_LIMIT", &v)?);
        }
        if let Ok(v) = std::env::var("RAG_BATCH_SIZE") {
            builder = builder.batch_size(parse_var("RAG_BATCH_SIZE", &v)?);
        }
        if let Ok(v) = std::env::var("RAG_TEMPERATURE") {
            builder = builder.temperature(parse_var("RAG_TEMPERATURE", &v)?);
        }
        if let Ok(v) = std::env::var("RAG_MAX_TOKENS") {
            builder = builder.max_tokens(parse_var("RAG_MAX_TOKENS", &v)?);
        }
        if let Ok(v) = std::env::var("RAG_ANSWER_LANGUAGE") {
            builder = builder.answer_language(v);
        }
        if let Ok(v) = std::env::var("RAG_ID_STRATEGY") {
            builder = builder.id_strategy(match v.as_str() {
                "truncated-hash" => IdStrategy::default(),
                "sequential" => IdStrategy::Sequential,
                other => {
                    return Err(RagError::Config(format!(
                        "RAG_ID_STRATEGY must be 'truncated-hash' or 'sequential', got '{other}'"
                    )));
                }
            });
        }

        builder.build()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| RagError::Config(format!("invalid value '{value}' for {name}")))
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the vector store collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    /// Set the maximum chunk size in characters.
    pub fn chunk_max_len(mut self, max_len: usize) -> Self {
        self.config.chunk_max_len = max_len;
        self
    }

    /// Set the distance between consecutive chunk starts in characters.
    pub fn chunk_stride(mut self, stride: usize) -> Self {
        self.config.chunk_stride = stride;
        self
    }

    /// Set the number of contexts retrieved per query.
    pub fn retrieval_limit(mut self, limit: usize) -> Self {
        self.config.retrieval_limit = limit;
        self
    }

    /// Set the ingestion upsert batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the chat model sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the maximum number of generated tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set the language answers are written in.
    pub fn answer_language(mut self, language: impl Into<String>) -> Self {
        self.config.answer_language = language.into();
        self
    }

    /// Set the point id strategy.
    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.config.id_strategy = strategy;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `chunk_max_len == 0` or `chunk_stride == 0`
    /// - `chunk_stride > chunk_max_len` (windows would skip text)
    /// - `retrieval_limit == 0` or `batch_size == 0`
    pub fn build(self) -> Result<RagConfig> {
        let c = &self.config;
        if c.chunk_max_len == 0 {
            return Err(RagError::Config("chunk_max_len must be greater than zero".to_string()));
        }
        if c.chunk_stride == 0 {
            return Err(RagError::Config("chunk_stride must be greater than zero".to_string()));
        }
        if c.chunk_stride > c.chunk_max_len {
            return Err(RagError::Config(format!(
                "chunk_stride ({}) must not exceed chunk_max_len ({})",
                c.chunk_stride, c.chunk_max_len
            )));
        }
        if c.retrieval_limit == 0 {
            return Err(RagError::Config("retrieval_limit must be greater than zero".to_string()));
        }
        if c.batch_size == 0 {
            return Err(RagError::Config("batch_size must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}
