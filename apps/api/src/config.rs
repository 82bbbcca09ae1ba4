use anyhow::{bail, Context, Result};

use crate::grading::scoring::PassPolicy;

const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "llama3-8b-8192";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub llm_api_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub pass_policy: PassPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            llm_api_url: optional_env("LLM_API_URL", DEFAULT_LLM_API_URL),
            llm_api_key: require_env("GROQ_API_KEY")?,
            llm_model: optional_env("LLM_MODEL_NAME", DEFAULT_LLM_MODEL),
            llm_timeout_secs: optional_env("LLM_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            pass_policy: parse_pass_policy(&optional_env("PASSING_SCORE_SOURCE", "fixed"))?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

/// `fixed` keeps the built-in pass threshold; `test` reads `job_tests.passing_score`.
pub fn parse_pass_policy(raw: &str) -> Result<PassPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "fixed" | "" => Ok(PassPolicy::Fixed),
        "test" => Ok(PassPolicy::PerTest),
        other => bail!("PASSING_SCORE_SOURCE must be 'fixed' or 'test', got '{other}'"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
