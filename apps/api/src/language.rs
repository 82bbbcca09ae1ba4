//! Locale detection used to pick a prompt language.
//!
//! Detection is best-effort: every failure resolves to the caller's fallback.

use serde::{Deserialize, Serialize};
use whatlang::Lang;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Vi,
    En,
}

/// Fallback when grading a question/answer pair whose language cannot be detected.
pub const GRADING_FALLBACK: Locale = Locale::Vi;

/// Fallback when generating questions from an undetectable job description.
pub const GENERATION_FALLBACK: Locale = Locale::En;

/// Classifies `text` as Vietnamese or English. Any other reliably detected language
/// maps to English; empty, short or ambiguous text maps to `fallback`.
pub fn detect_locale(text: &str, fallback: Locale) -> Locale {
    let text = text.trim();
    if text.is_empty() {
        return fallback;
    }
    match whatlang::detect(text) {
        Some(info) if info.is_reliable() => match info.lang() {
            Lang::Vie => Locale::Vi,
            _ => Locale::En,
        },
        _ => fallback,
    }
}
