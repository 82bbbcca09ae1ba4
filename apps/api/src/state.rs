use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::evaluator::AnswerEvaluator;
use crate::grading::locks::GradingLocks;
use crate::llm_client::LlmClient;
use crate::store::GradingStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GradingStore>,
    /// Pluggable answer judge. Default: LlmAnswerEvaluator over `llm`.
    pub evaluator: Arc<dyn AnswerEvaluator>,
    /// Used directly by question generation.
    pub llm: LlmClient,
    /// At most one grading run per result at a time.
    pub grading_locks: GradingLocks,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    /// State over an in-memory store, a scripted evaluator and `llm`.
    pub fn for_tests(
        store: Arc<crate::store::memory::MemoryGradingStore>,
        evaluator: crate::grading::grader::fakes::ScriptedEvaluator,
        llm: LlmClient,
    ) -> Self {
        Self {
            store,
            evaluator: Arc::new(evaluator),
            llm,
            grading_locks: GradingLocks::new(),
            config: Config {
                database_url: "postgres://unused".to_string(),
                llm_api_url: "http://127.0.0.1:9".to_string(),
                llm_api_key: "test-key".to_string(),
                llm_model: "test-model".to_string(),
                llm_timeout_secs: 5,
                pass_policy: crate::grading::scoring::PassPolicy::Fixed,
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }
}
