//! Pure scoring rules shared by single-answer and whole-attempt grading.

use serde::{Deserialize, Serialize};

/// An answer is correct at or above this 0–100 score.
pub const CORRECT_THRESHOLD: u8 = 70;

/// Built-in pass threshold for an attempt's average score.
pub const DEFAULT_PASS_THRESHOLD: f64 = 60.0;

/// Where the pass threshold comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassPolicy {
    /// Always `DEFAULT_PASS_THRESHOLD`.
    #[default]
    Fixed,
    /// `job_tests.passing_score` when set, else `DEFAULT_PASS_THRESHOLD`.
    PerTest,
}

impl PassPolicy {
    pub fn threshold(&self, test_passing_score: Option<f64>) -> f64 {
        match self {
            PassPolicy::Fixed => DEFAULT_PASS_THRESHOLD,
            PassPolicy::PerTest => test_passing_score.unwrap_or(DEFAULT_PASS_THRESHOLD),
        }
    }
}

/// Points and correctness credited for one answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnswerScore {
    pub points_earned: f64,
    pub is_correct: bool,
}

/// Aggregate over the scored answers of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttemptSummary {
    /// Sum of raw 0–100 scores (persisted as `total_score`).
    pub score_sum: f64,
    pub average_score: f64,
    pub passed: bool,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// earned = round(score / 100 × points, 2), kept within [0, points].
pub fn score_answer(score: u8, points: f64) -> AnswerScore {
    let points = points.max(0.0);
    let score = score.min(100);
    let earned = round2(f64::from(score) / 100.0 * points).clamp(0.0, points);
    AnswerScore {
        points_earned: earned,
        is_correct: score >= CORRECT_THRESHOLD,
    }
}

/// Returns `None` when no answer was scored.
pub fn summarize(scores: &[u8], pass_threshold: f64) -> Option<AttemptSummary> {
    if scores.is_empty() {
        return None;
    }
    let score_sum: f64 = scores.iter().map(|&s| f64::from(s)).sum();
    let average_score = round2(score_sum / scores.len() as f64);
    Some(AttemptSummary {
        score_sum,
        average_score,
        passed: average_score >= pass_threshold,
    })
}
