//! Persistence seam for jobs, tests, questions, answers and results.
//!
//! `PgGradingStore` is the production backend; `memory::MemoryGradingStore` backs tests.
//! `AppState` holds an `Arc<dyn GradingStore>`.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::attempt::{AnswerGradeUpdate, AnswerRow, ResultGradeUpdate, ResultRow};
use crate::models::job::{JobRow, JobTestRow};
use crate::models::question::{NewQuestion, QuestionEdit, QuestionRow};

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgGradingStore;

#[async_trait]
pub trait GradingStore: Send + Sync {
    async fn get_job(&self, job_id: i64) -> Result<Option<JobRow>, AppError>;

    async fn get_test(&self, test_id: i64) -> Result<Option<JobTestRow>, AppError>;

    /// Returns the job's first test, creating "Auto Generated Test" when it has none.
    async fn get_or_create_test_for_job(&self, job_id: i64) -> Result<JobTestRow, AppError>;

    async fn get_question(&self, question_id: i64) -> Result<Option<QuestionRow>, AppError>;

    async fn create_question(&self, question: NewQuestion) -> Result<QuestionRow, AppError>;

    async fn update_question(
        &self,
        question_id: i64,
        edit: QuestionEdit,
    ) -> Result<Option<QuestionRow>, AppError>;

    async fn get_answer(&self, answer_id: i64) -> Result<Option<AnswerRow>, AppError>;

    /// Looks up the single answer for a `(result, question)` pair.
    async fn find_answer(
        &self,
        result_id: i64,
        question_id: i64,
    ) -> Result<Option<AnswerRow>, AppError>;

    /// All answers of an attempt, ordered by `answer_id` ascending.
    async fn answers_for_result(&self, result_id: i64) -> Result<Vec<AnswerRow>, AppError>;

    async fn get_result(&self, result_id: i64) -> Result<Option<ResultRow>, AppError>;

    /// Writes one answer's grading fields in a single statement.
    async fn save_answer_grade(&self, grade: &AnswerGradeUpdate) -> Result<(), AppError>;

    /// Writes every answer grade and the result aggregate atomically.
    async fn commit_attempt(
        &self,
        answers: &[AnswerGradeUpdate],
        result: &ResultGradeUpdate,
    ) -> Result<(), AppError>;
}
