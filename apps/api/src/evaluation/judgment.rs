//! The LLM's graded opinion on one answer, and how a reply is turned into one.

use serde::{Deserialize, Serialize};

use crate::llm_client::strip_json_fences;

/// Graded opinion on one answer. `score` is always within 0–100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub score: u8,
    pub comment: String,
    pub suggestion: String,
}

/// Why a judgment had to be replaced by the empty (score 0) judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fallback {
    /// The endpoint answered with a non-success status.
    UpstreamStatus { status: u16 },
    /// The request never produced a response (connect, timeout, body read).
    Transport,
    /// The reply was not a JSON object with the expected keys.
    Parse,
}

/// Result of evaluating one answer. Never an error: degraded grading is carried in
/// `fallback` so callers can tell "scored low" apart from "could not be scored".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub judgment: Judgment,
    pub fallback: Option<Fallback>,
}

impl Evaluation {
    pub fn graded(judgment: Judgment) -> Self {
        Self {
            judgment,
            fallback: None,
        }
    }

    pub fn degraded(fallback: Fallback) -> Self {
        Self {
            judgment: Judgment::default(),
            fallback: Some(fallback),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct RawJudgment {
    score: f64,
    comment: String,
    #[serde(default)]
    suggestion: Option<String>,
}

/// Parses an assistant reply as a judgment. Code fences are tolerated; `score` and
/// `comment` are required. Fractional scores round, out-of-range scores clamp.
pub fn parse_judgment(content: &str) -> Result<Judgment, serde_json::Error> {
    let raw: RawJudgment = serde_json::from_str(strip_json_fences(content))?;
    Ok(Judgment {
        score: raw.score.round().clamp(0.0, 100.0) as u8,
        comment: raw.comment.trim().to_string(),
        suggestion: raw.suggestion.unwrap_or_default().trim().to_string(),
    })
}
