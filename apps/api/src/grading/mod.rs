// Answer grading engine: single-answer grading, whole-attempt aggregation, result view.
// All LLM calls go through evaluation → llm_client.

pub mod aggregator;
pub mod grader;
pub mod handlers;
pub mod locks;
pub mod reader;
pub mod scoring;
