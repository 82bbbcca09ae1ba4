//! Axum route handlers for the Grading API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::grading::aggregator::{grade_attempt, AttemptReport};
use crate::grading::grader::{grade_answer, AnswerRef, GradeReport};
use crate::grading::reader::{get_attempt_details, AttemptDetails};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateAnswerRequest {
    pub question_id: i64,
    pub answer_id: Option<i64>,
    pub result_id: Option<i64>,
}

impl ValidateAnswerRequest {
    fn answer_ref(&self) -> Result<AnswerRef, AppError> {
        match (self.answer_id, self.result_id) {
            (Some(answer_id), _) => Ok(AnswerRef::Id(answer_id)),
            (None, Some(result_id)) => Ok(AnswerRef::Result(result_id)),
            (None, None) => Err(AppError::Validation(
                "either answer_id or result_id is required".to_string(),
            )),
        }
    }
}

/// POST /api/v1/ai/questions/validate
///
/// Grades one answer and stores its points, correctness and feedback.
pub async fn handle_validate_answer(
    State(state): State<AppState>,
    Json(request): Json<ValidateAnswerRequest>,
) -> Result<Json<GradeReport>, AppError> {
    let answer_ref = request.answer_ref()?;
    let report = grade_answer(
        state.store.as_ref(),
        state.evaluator.as_ref(),
        &state.grading_locks,
        request.question_id,
        answer_ref,
    )
    .await?;
    Ok(Json(report))
}

/// POST /api/v1/ai/results/:result_id/grade
///
/// Grades every answer of a submitted attempt and stores the aggregate.
pub async fn handle_grade_attempt(
    State(state): State<AppState>,
    Path(result_id): Path<i64>,
) -> Result<Json<AttemptReport>, AppError> {
    let report = grade_attempt(
        state.store.as_ref(),
        state.evaluator.as_ref(),
        &state.grading_locks,
        state.config.pass_policy,
        result_id,
    )
    .await?;
    Ok(Json(report))
}

/// GET /api/v1/ai/results/:result_id/details
pub async fn handle_attempt_details(
    State(state): State<AppState>,
    Path(result_id): Path<i64>,
) -> Result<Json<AttemptDetails>, AppError> {
    Ok(Json(
        get_attempt_details(state.store.as_ref(), result_id).await?,
    ))
}
