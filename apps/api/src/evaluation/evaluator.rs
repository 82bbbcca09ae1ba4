//! Answer evaluation — pluggable, trait-based judge for one question/answer pair.
//!
//! Default: `LlmAnswerEvaluator` (chat-completion call through `llm_client`).
//! `AppState` holds an `Arc<dyn AnswerEvaluator>`; tests swap in a scripted fake.

use async_trait::async_trait;
use tracing::warn;

use crate::evaluation::judgment::{parse_judgment, Evaluation, Fallback};
use crate::evaluation::prompts::{build_grading_prompt, GRADING_TEMPERATURE};
use crate::language::{detect_locale, GRADING_FALLBACK};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    /// Judges `answer` against `question`. Failures degrade to an empty judgment
    /// tagged with the failure kind; this never errors.
    async fn evaluate(&self, question: &str, answer: &str) -> Evaluation;
}

pub struct LlmAnswerEvaluator {
    llm: LlmClient,
}

impl LlmAnswerEvaluator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AnswerEvaluator for LlmAnswerEvaluator {
    async fn evaluate(&self, question: &str, answer: &str) -> Evaluation {
        let locale = detect_locale(question, GRADING_FALLBACK);
        let prompt = build_grading_prompt(question, answer, locale);

        let content = match self
            .llm
            .call_text(&prompt, JSON_ONLY_SYSTEM, GRADING_TEMPERATURE)
            .await
        {
            Ok(content) => content,
            Err(LlmError::Api { status, message }) => {
                warn!("Grading call rejected by LLM endpoint ({status}): {message}");
                return Evaluation::degraded(Fallback::UpstreamStatus { status });
            }
            Err(LlmError::Http(e)) => {
                warn!("Grading call failed in transport: {e}");
                return Evaluation::degraded(Fallback::Transport);
            }
            Err(e) => {
                warn!("Grading call returned no usable content: {e}");
                return Evaluation::degraded(Fallback::Parse);
            }
        };

        match parse_judgment(&content) {
            Ok(judgment) => Evaluation::graded(judgment),
            Err(e) => {
                warn!("Could not parse grading reply ({e}); raw content: {content}");
                Evaluation::degraded(Fallback::Parse)
            }
        }
    }
}
