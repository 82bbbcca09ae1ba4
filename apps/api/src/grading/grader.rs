//! Single-answer grading: judge one answer, convert the score to points, persist.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::evaluator::AnswerEvaluator;
use crate::evaluation::judgment::Fallback;
use crate::grading::locks::GradingLocks;
use crate::grading::scoring::score_answer;
use crate::models::attempt::{AnswerGradeUpdate, AnswerRow};
use crate::models::question::QuestionRow;
use crate::store::GradingStore;

/// Outcome of grading one answer.
#[derive(Debug, Clone, Serialize)]
pub struct GradeReport {
    pub question_id: i64,
    pub answer_id: i64,
    pub result_id: i64,
    /// Raw 0–100 judgment score.
    pub score: u8,
    pub points_earned: f64,
    pub max_points: f64,
    pub is_correct: bool,
    pub comment: String,
    pub suggestion: String,
    pub graded_with_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

/// How the caller identifies the answer to grade.
#[derive(Debug, Clone, Copy)]
pub enum AnswerRef {
    Id(i64),
    /// The answer of this result for the question being graded.
    Result(i64),
}

/// A judged answer: the report for the caller and the row update to persist.
pub(crate) struct GradedAnswer {
    pub report: GradeReport,
    pub update: AnswerGradeUpdate,
}

/// Judges a gradable answer and derives its score. No persistence.
pub(crate) async fn judge_answer(
    evaluator: &dyn AnswerEvaluator,
    question: &QuestionRow,
    answer: &AnswerRow,
) -> GradedAnswer {
    let evaluation = evaluator
        .evaluate(&question.question_text, &answer.answer_text)
        .await;

    if let Some(fallback) = &evaluation.fallback {
        warn!(
            "Answer {} graded with fallback {:?}; recorded as score 0",
            answer.answer_id, fallback
        );
    }

    let graded_with_fallback = evaluation.is_degraded();
    let judgment = evaluation.judgment;
    let scored = score_answer(judgment.score, question.points);

    GradedAnswer {
        update: AnswerGradeUpdate {
            answer_id: answer.answer_id,
            score: i16::from(judgment.score),
            points_earned: scored.points_earned,
            is_correct: scored.is_correct,
            comment: judgment.comment.clone(),
            suggestion: judgment.suggestion.clone(),
            graded_with_fallback,
            graded_at: Utc::now(),
        },
        report: GradeReport {
            question_id: question.question_id,
            answer_id: answer.answer_id,
            result_id: answer.result_id,
            score: judgment.score,
            points_earned: scored.points_earned,
            max_points: question.points,
            is_correct: scored.is_correct,
            comment: judgment.comment,
            suggestion: judgment.suggestion,
            graded_with_fallback,
            fallback: evaluation.fallback,
        },
    }
}

/// Grades one answer against one question and persists the answer's grading fields.
///
/// Lookups and the empty-answer check run before any LLM call, so those errors leave
/// the store untouched. Re-grading overwrites the previous grade.
pub async fn grade_answer(
    store: &dyn GradingStore,
    evaluator: &dyn AnswerEvaluator,
    locks: &GradingLocks,
    question_id: i64,
    answer_ref: AnswerRef,
) -> Result<GradeReport, AppError> {
    let question = store
        .get_question(question_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question {question_id} not found")))?;

    let answer = match answer_ref {
        AnswerRef::Id(answer_id) => store
            .get_answer(answer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Answer {answer_id} not found")))?,
        AnswerRef::Result(result_id) => store
            .find_answer(result_id, question_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Answer for result {result_id} and question {question_id} not found"
                ))
            })?,
    };

    if answer.question_id != question_id {
        return Err(AppError::Validation(format!(
            "Answer {} belongs to question {}, not question {question_id}",
            answer.answer_id, answer.question_id
        )));
    }

    if !answer.has_text() {
        return Err(AppError::EmptyInput(format!(
            "Answer {} is empty",
            answer.answer_id
        )));
    }

    let _guard = locks.try_acquire(answer.result_id)?;

    let graded = judge_answer(evaluator, &question, &answer).await;
    store.save_answer_grade(&graded.update).await?;

    info!(
        "Graded answer {} for question {question_id}: score={} points={}/{}",
        answer.answer_id, graded.report.score, graded.report.points_earned, question.points
    );

    Ok(graded.report)
}
