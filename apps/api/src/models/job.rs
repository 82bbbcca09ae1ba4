use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub job_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub experience_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobTestRow {
    pub test_id: i64,
    pub job_id: i64,
    pub test_name: String,
    /// Per-test threshold. Only consulted when `PASSING_SCORE_SOURCE=test`.
    pub passing_score: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
