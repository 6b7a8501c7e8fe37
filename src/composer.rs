//! Grounded answer composition.
//!
//! The [`AnswerComposer`] turns retrieved contexts and a question into a
//! grounded prompt and delegates to a [`ChatModel`]. It enforces the
//! answer-only-from-context policy, short-circuits to a fixed sentinel when
//! nothing was retrieved, and formats model failures into a non-fatal
//! answer string so one bad call never breaks a chat session.

use std::sync::Arc;

use tracing::{error, info};

use crate::chat::ChatModel;
use crate::config::RagConfig;
use crate::error::RagError;

/// The fixed answer returned when retrieval produced no contexts.
///
/// Returned without invoking the chat model, so an empty knowledge base
/// costs nothing and answers predictably.
pub const SENTINEL_ANSWER: &str =
    "No information about this topic was found in the ingested notes. Please ingest a PDF first.";

/// Builds grounded prompts from retrieved contexts and delegates generation
/// to a [`ChatModel`].
///
/// # Example
///
/// ```rust,ignore
/// use notes_rag::{AnswerComposer, RagConfig};
///
/// let composer = AnswerComposer::new(Arc::new(model), RagConfig::default());
/// let answer = composer.compose("What is a loop?", &contexts).await;
/// ```
pub struct AnswerComposer {
    model: Arc<dyn ChatModel>,
    config: RagConfig,
}

impl AnswerComposer {
    /// Create a new composer over the given chat model and configuration.
    pub fn new(model: Arc<dyn ChatModel>, config: RagConfig) -> Self {
        Self { model, config }
    }

    /// The system instruction embedding the grounding policy.
    fn system_instruction(&self) -> String {
        format!(
            "You are a helpful study-notes assistant. You answer in {} using ONLY the \
             provided notes. Never invent information that is not in the notes.",
            self.config.answer_language
        )
    }

    /// The user prompt: the concatenated contexts, the question, and the
    /// grounding instructions.
    fn build_prompt(&self, question: &str, contexts: &[String]) -> String {
        let context_block = contexts.join("\n\n");
        format!(
            "You are a study-notes assistant. Answer the question based ONLY on the notes \
             below.\n\nNOTES:\n{context_block}\n\nQUESTION: {question}\n\nIMPORTANT: Use only \
             information written in the notes above. If the answer is not in the notes, say \
             that the notes do not contain this information.\n\nANSWER (in {}):",
            self.config.answer_language
        )
    }

    /// Compose an answer to `question` grounded in `contexts`.
    ///
    /// Empty `contexts` yield [`SENTINEL_ANSWER`] immediately. A chat model
    /// failure yields a formatted error string describing the cause; this
    /// method never returns an error.
    pub async fn compose(&self, question: &str, contexts: &[String]) -> String {
        if contexts.is_empty() {
            info!("no contexts retrieved, returning sentinel answer");
            return SENTINEL_ANSWER.to_string();
        }

        let prompt = self.build_prompt(question, contexts);
        let result = self
            .model
            .complete(
                &self.system_instruction(),
                &prompt,
                self.config.temperature,
                self.config.max_tokens,
            )
            .await;

        match result {
            Ok(answer) => {
                info!(context_count = contexts.len(), "composed grounded answer");
                answer
            }
            Err(e) => {
                let e = RagError::Generation(e);
                error!(error = %e, "chat model failed, returning error answer");
                format!("The assistant could not generate an answer: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::chat::ChatError;

    /// Records every prompt it receives and counts invocations.
    #[derive(Default)]
    struct RecordingModel {
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        async fn complete(
            &self,
            _system: &str,
            user: &str,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(user.to_string());
            if self.fail {
                Err(ChatError::RateLimited("try again later".to_string()))
            } else {
                Ok("a grounded answer".to_string())
            }
        }
    }

    fn composer(model: Arc<RecordingModel>) -> AnswerComposer {
        AnswerComposer::new(model, RagConfig::default())
    }

    #[tokio::test]
    async fn empty_contexts_return_sentinel_without_calling_model() {
        let model = Arc::new(RecordingModel::default());
        let answer = composer(Arc::clone(&model)).compose("what is css?", &[]).await;
        assert_eq!(answer, SENTINEL_ANSWER);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn prompt_contains_every_context_and_the_question() {
        let model = Arc::new(RecordingModel::default());
        let contexts =
            vec!["loops repeat statements".to_string(), "css styles web pages".to_string()];
        let answer = composer(Arc::clone(&model)).compose("what is a loop?", &contexts).await;

        assert_eq!(answer, "a grounded answer");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        let prompt = model.last_prompt.lock().unwrap().clone().unwrap();
        for context in &contexts {
            assert!(prompt.contains(context));
        }
        assert!(prompt.contains("what is a loop?"));
    }

    #[tokio::test]
    async fn contexts_are_joined_in_order_by_blank_lines() {
        let model = Arc::new(RecordingModel::default());
        let contexts = vec!["first".to_string(), "second".to_string()];
        composer(Arc::clone(&model)).compose("q", &contexts).await;

        let prompt = model.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("first\n\nsecond"));
    }

    #[tokio::test]
    async fn model_failure_becomes_error_answer_not_panic() {
        let model = Arc::new(RecordingModel { fail: true, ..Default::default() });
        let answer =
            composer(Arc::clone(&model)).compose("q", &["context".to_string()]).await;
        assert!(answer.contains("could not generate"));
        assert!(answer.contains("Generation error"));
        assert!(answer.contains("rate limited"));
    }

    #[tokio::test]
    async fn answer_language_appears_in_prompt() {
        let model = Arc::new(RecordingModel::default());
        let config = RagConfig::builder().answer_language("Turkish").build().unwrap();
        let dyn_model: Arc<dyn ChatModel> = model.clone();
        let composer = AnswerComposer::new(dyn_model, config);
        composer.compose("q", &["context".to_string()]).await;

        let prompt = model.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("ANSWER (in Turkish):"));
    }
}
