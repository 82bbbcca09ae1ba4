//! Axum route handlers for question generation and customization.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::generation::generator::{
    generate_questions, save_generated_questions, DEFAULT_QUESTION_POINTS,
};
use crate::generation::prompts::QUESTION_TEMPLATES;
use crate::models::question::{NewQuestion, QuestionCategory, QuestionEdit, QuestionRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub job_id: i64,
    /// Persist the questions into the job's test.
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsResponse {
    pub job_id: i64,
    pub questions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub saved: Vec<QuestionRow>,
}

#[derive(Debug, Serialize)]
pub struct BulkGenerateResponse {
    pub results: Vec<GenerateQuestionsResponse>,
}

#[derive(Debug, Serialize)]
pub struct QuestionTemplatesResponse {
    pub templates: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
pub struct CustomizeQuestionRequest {
    pub test_id: i64,
    pub question_text: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub category: QuestionCategory,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub order_index: Option<i32>,
    #[serde(default)]
    pub required: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct QuestionSavedResponse {
    pub message: &'static str,
    pub question: QuestionRow,
}

fn validate_points(points: Option<f64>) -> Result<(), AppError> {
    match points {
        Some(p) if !p.is_finite() || p < 0.0 => Err(AppError::Validation(
            "points must be a non-negative number".to_string(),
        )),
        _ => Ok(()),
    }
}

fn validate_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "question_text cannot be empty".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ai/generate-interview-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let job = state
        .store
        .get_job(request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", request.job_id)))?;

    let questions = generate_questions(&state.llm, job.description.as_deref().unwrap_or("")).await?;

    let saved = if request.save && !questions.is_empty() {
        save_generated_questions(state.store.as_ref(), job.job_id, &questions).await?
    } else {
        vec![]
    };

    Ok(Json(GenerateQuestionsResponse {
        job_id: job.job_id,
        questions,
        saved,
    }))
}

/// POST /api/v1/ai/questions/bulk-generate
///
/// Unknown job ids are skipped. A job whose generation fails gets an empty list and
/// the batch carries on.
pub async fn handle_bulk_generate(
    State(state): State<AppState>,
    Json(job_ids): Json<Vec<i64>>,
) -> Result<Json<BulkGenerateResponse>, AppError> {
    let mut results = Vec::with_capacity(job_ids.len());

    for job_id in job_ids {
        let Some(job) = state.store.get_job(job_id).await? else {
            warn!("Bulk generation: job {job_id} not found, skipping");
            continue;
        };
        let questions =
            match generate_questions(&state.llm, job.description.as_deref().unwrap_or("")).await
            {
                Ok(questions) => questions,
                Err(e) => {
                    warn!("Bulk generation: job {job_id} failed: {e}");
                    vec![]
                }
            };
        results.push(GenerateQuestionsResponse {
            job_id,
            questions,
            saved: vec![],
        });
    }

    Ok(Json(BulkGenerateResponse { results }))
}

/// GET /api/v1/ai/question-templates
pub async fn handle_question_templates() -> Json<QuestionTemplatesResponse> {
    Json(QuestionTemplatesResponse {
        templates: QUESTION_TEMPLATES,
    })
}

/// POST /api/v1/ai/customize-questions
pub async fn handle_customize_question(
    State(state): State<AppState>,
    Json(request): Json<CustomizeQuestionRequest>,
) -> Result<Json<QuestionSavedResponse>, AppError> {
    validate_text(&request.question_text)?;
    validate_points(request.points)?;

    state
        .store
        .get_test(request.test_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test {} not found", request.test_id)))?;

    let question = state
        .store
        .create_question(NewQuestion {
            test_id: request.test_id,
            question_text: request.question_text.trim().to_string(),
            category: request.category,
            points: request.points.unwrap_or(DEFAULT_QUESTION_POINTS),
            order_index: request.order_index,
            explanation: request.explanation,
            required: request.required.unwrap_or(true),
        })
        .await?;

    Ok(Json(QuestionSavedResponse {
        message: "Question saved",
        question,
    }))
}

/// PUT /api/v1/ai/questions/:question_id/customize
pub async fn handle_update_question(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Json(edit): Json<QuestionEdit>,
) -> Result<Json<QuestionSavedResponse>, AppError> {
    if let Some(text) = &edit.question_text {
        validate_text(text)?;
    }
    validate_points(edit.points)?;

    let question = state
        .store
        .update_question(question_id, edit)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question {question_id} not found")))?;

    Ok(Json(QuestionSavedResponse {
        message: "Question updated",
        question,
    }))
}
