//! Read-only view of a graded attempt: each stored answer joined with its question.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::question::QuestionRow;
use crate::store::GradingStore;

#[derive(Debug, Clone, Serialize)]
pub struct AnswerDetail {
    pub answer_id: i64,
    pub question_id: i64,
    pub question_text: String,
    pub category: String,
    pub order_index: i32,
    pub max_points: f64,
    pub answer_text: String,
    /// Raw 0–100 judgment score, `None` until graded.
    pub score: Option<u8>,
    pub points_earned: Option<f64>,
    pub is_correct: Option<bool>,
    pub submitted_at: DateTime<Utc>,
    pub comment: Option<String>,
    pub suggestion: Option<String>,
    pub graded_with_fallback: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptDetails {
    pub result_id: i64,
    pub test_id: i64,
    pub status: String,
    pub total_score: Option<f64>,
    pub average_score: Option<f64>,
    pub passed: Option<bool>,
    pub graded_at: Option<DateTime<Utc>>,
    pub feedback: Option<String>,
    pub answers: Vec<AnswerDetail>,
}

/// Answers ordered by `answer_id`. Answers whose question no longer exists are left out.
pub async fn get_attempt_details(
    store: &dyn GradingStore,
    result_id: i64,
) -> Result<AttemptDetails, AppError> {
    let result = store
        .get_result(result_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Result {result_id} not found")))?;

    let answers = store.answers_for_result(result_id).await?;
    if answers.is_empty() {
        return Err(AppError::NotFound(format!(
            "Result {result_id} has no answers"
        )));
    }

    let mut questions: HashMap<i64, Option<QuestionRow>> = HashMap::new();
    let mut details = Vec::with_capacity(answers.len());

    for answer in answers {
        if !questions.contains_key(&answer.question_id) {
            let question = store.get_question(answer.question_id).await?;
            questions.insert(answer.question_id, question);
        }
        let Some(question) = questions.get(&answer.question_id).and_then(Option::as_ref) else {
            continue;
        };

        details.push(AnswerDetail {
            answer_id: answer.answer_id,
            question_id: question.question_id,
            question_text: question.question_text.clone(),
            category: question.category.clone(),
            order_index: question.order_index,
            max_points: question.points,
            answer_text: answer.answer_text,
            score: answer.score.and_then(|s| u8::try_from(s).ok()),
            points_earned: answer.points_earned,
            is_correct: answer.is_correct,
            submitted_at: answer.submitted_at,
            comment: answer.comment,
            suggestion: answer.suggestion,
            graded_with_fallback: answer.graded_with_fallback,
        });
    }

    Ok(AttemptDetails {
        result_id,
        test_id: result.test_id,
        status: result.status,
        total_score: result.total_score,
        average_score: result.percentage,
        passed: result.passed,
        graded_at: result.graded_at,
        feedback: result.feedback,
        answers: details,
    })
}
