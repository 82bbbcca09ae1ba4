use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One candidate answer. Grading fields stay `None` until the answer is graded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerRow {
    pub answer_id: i64,
    pub result_id: i64,
    pub question_id: i64,
    pub answer_text: String,
    pub is_correct: Option<bool>,
    /// Raw 0–100 judgment score.
    pub score: Option<i16>,
    pub points_earned: Option<f64>,
    pub comment: Option<String>,
    pub suggestion: Option<String>,
    pub graded_with_fallback: bool,
    pub submitted_at: DateTime<Utc>,
}

impl AnswerRow {
    /// Whitespace-only answers count as empty.
    pub fn has_text(&self) -> bool {
        !self.answer_text.trim().is_empty()
    }
}

/// One test attempt.
///
/// `total_score` is the sum of per-answer 0–100 scores and `percentage` is their mean,
/// not a weighted point total.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResultRow {
    pub result_id: i64,
    pub application_id: i64,
    pub test_id: i64,
    pub status: String,
    pub total_score: Option<f64>,
    pub percentage: Option<f64>,
    pub passed: Option<bool>,
    pub degraded_answers: i32,
    pub graded_at: Option<DateTime<Utc>>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Grading fields written to one answer row.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerGradeUpdate {
    pub answer_id: i64,
    pub score: i16,
    pub points_earned: f64,
    pub is_correct: bool,
    pub comment: String,
    pub suggestion: String,
    pub graded_with_fallback: bool,
    pub graded_at: DateTime<Utc>,
}

/// Aggregate fields written to a result row when an attempt is graded.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultGradeUpdate {
    pub result_id: i64,
    /// Persisted as `total_score`.
    pub score_sum: f64,
    /// Persisted as `percentage`.
    pub average_score: f64,
    pub passed: bool,
    pub degraded_answers: i32,
    pub feedback: String,
    pub graded_at: DateTime<Utc>,
}
