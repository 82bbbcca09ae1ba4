// Answer evaluation: grading prompt → LLM call → parsed judgment.
// All LLM calls go through llm_client.

pub mod evaluator;
pub mod judgment;
pub mod prompts;
