use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    #[default]
    Core,
    ProblemSolving,
    Fit,
}

impl QuestionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Core => "core",
            QuestionCategory::ProblemSolving => "problem_solving",
            QuestionCategory::Fit => "fit",
        }
    }

    /// Category for the n-th generated question, cycling core → problem_solving → fit.
    pub fn for_position(position: usize) -> Self {
        match position % 3 {
            0 => QuestionCategory::Core,
            1 => QuestionCategory::ProblemSolving,
            _ => QuestionCategory::Fit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub question_id: i64,
    pub test_id: i64,
    pub question_text: String,
    pub category: String,
    pub points: f64,
    pub order_index: i32,
    pub explanation: Option<String>,
    pub required: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new question. `order_index: None` appends after the test's last question.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub test_id: i64,
    pub question_text: String,
    pub category: QuestionCategory,
    pub points: f64,
    pub order_index: Option<i32>,
    pub explanation: Option<String>,
    pub required: bool,
}

/// Partial edit of an existing question; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionEdit {
    pub question_text: Option<String>,
    pub explanation: Option<String>,
    pub category: Option<QuestionCategory>,
    pub points: Option<f64>,
    pub required: Option<bool>,
}
