// Shared system prompts. Each feature that needs LLM calls defines its own
// prompts.rs alongside it; this file only carries cross-cutting fragments.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for free-text generation calls.
pub const ASSISTANT_SYSTEM: &str = "You are a helpful AI assistant.";
