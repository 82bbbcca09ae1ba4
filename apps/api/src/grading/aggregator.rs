//! Attempt grading: judge every answer of a submitted attempt, then persist the answer
//! grades and the result aggregate in one commit.
//!
//! Flow: lock result → load answers → judge each gradable answer (sequentially) →
//!       summarize scores → build feedback transcript → commit.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::evaluation::evaluator::AnswerEvaluator;
use crate::grading::grader::{judge_answer, GradeReport};
use crate::grading::locks::GradingLocks;
use crate::grading::scoring::{summarize, PassPolicy};
use crate::models::attempt::ResultGradeUpdate;
use crate::models::question::QuestionRow;
use crate::store::GradingStore;

/// Outcome of grading a whole attempt.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptReport {
    pub result_id: i64,
    /// Sum of the raw 0–100 answer scores, not a weighted point total.
    pub total_score: f64,
    pub average_score: f64,
    pub passed: bool,
    pub pass_threshold: f64,
    pub graded_answers: usize,
    pub skipped_answers: usize,
    pub degraded_answers: usize,
    pub feedback: String,
    pub answers: Vec<GradeReport>,
}

/// Feedback line for one graded answer, keyed for ordering by question position.
struct FeedbackLine {
    order_index: i32,
    answer_id: i64,
    text: String,
}

fn feedback_line(order_index: i32, report: &GradeReport) -> String {
    if report.graded_with_fallback {
        format!("Question {order_index}: [grading unavailable]")
    } else {
        format!("Question {order_index}: {}", report.comment)
    }
}

/// Grades every answer of `result_id` and persists the aggregate.
///
/// Answers without text or without a resolvable question are skipped: they count
/// toward neither the score nor the feedback. Re-running overwrites the previous
/// aggregate.
pub async fn grade_attempt(
    store: &dyn GradingStore,
    evaluator: &dyn AnswerEvaluator,
    locks: &GradingLocks,
    pass_policy: PassPolicy,
    result_id: i64,
) -> Result<AttemptReport, AppError> {
    let _guard = locks.try_acquire(result_id)?;

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

    let pass_threshold = match pass_policy {
        PassPolicy::Fixed => pass_policy.threshold(None),
        PassPolicy::PerTest => {
            let test = store.get_test(result.test_id).await?;
            pass_policy.threshold(test.and_then(|t| t.passing_score))
        }
    };

    info!(
        "Grading result {result_id}: {} answers, pass threshold {pass_threshold}",
        answers.len()
    );

    let mut questions: HashMap<i64, Option<QuestionRow>> = HashMap::new();
    let mut scores = Vec::new();
    let mut feedback = Vec::new();
    let mut updates = Vec::new();
    let mut reports = Vec::new();
    let mut skipped = 0;

    for answer in &answers {
        if !questions.contains_key(&answer.question_id) {
            let question = store.get_question(answer.question_id).await?;
            questions.insert(answer.question_id, question);
        }
        let Some(question) = questions.get(&answer.question_id).and_then(Option::as_ref) else {
            debug!(
                "Skipping answer {}: question {} not found",
                answer.answer_id, answer.question_id
            );
            skipped += 1;
            continue;
        };
        if !answer.has_text() {
            debug!("Skipping answer {}: empty text", answer.answer_id);
            skipped += 1;
            continue;
        }

        let graded = judge_answer(evaluator, question, answer).await;

        scores.push(graded.report.score);
        feedback.push(FeedbackLine {
            order_index: question.order_index,
            answer_id: answer.answer_id,
            text: feedback_line(question.order_index, &graded.report),
        });
        updates.push(graded.update);
        reports.push(graded.report);
    }

    let summary = summarize(&scores, pass_threshold).ok_or_else(|| {
        AppError::EmptyInput(format!("Result {result_id} has no non-empty answers to grade"))
    })?;

    feedback.sort_by_key(|line| (line.order_index, line.answer_id));
    let feedback = feedback
        .into_iter()
        .map(|line| line.text)
        .collect::<Vec<_>>()
        .join("\n");

    let degraded = reports.iter().filter(|r| r.graded_with_fallback).count();

    let aggregate = ResultGradeUpdate {
        result_id,
        score_sum: summary.score_sum,
        average_score: summary.average_score,
        passed: summary.passed,
        degraded_answers: i32::try_from(degraded).unwrap_or(i32::MAX),
        feedback: feedback.clone(),
        graded_at: Utc::now(),
    };

    store.commit_attempt(&updates, &aggregate).await?;

    info!(
        "Graded result {result_id}: average={} passed={} graded={} skipped={skipped} degraded={degraded}",
        summary.average_score,
        summary.passed,
        reports.len(),
    );

    Ok(AttemptReport {
        result_id,
        total_score: summary.score_sum,
        average_score: summary.average_score,
        passed: summary.passed,
        pass_threshold,
        graded_answers: reports.len(),
        skipped_answers: skipped,
        degraded_answers: degraded,
        feedback,
        answers: reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::judgment::{Evaluation, Fallback};
    use crate::grading::grader::fakes::ScriptedEvaluator;
    use crate::store::memory::MemoryGradingStore;

    struct Attempt {
        store: MemoryGradingStore,
        test_id: i64,
        result_id: i64,
    }

    fn attempt(passing_score: Option<f64>) -> Attempt {
        let store = MemoryGradingStore::new();
        let job_id = store.insert_job(Some("Rust backend engineer"));
        let test_id = store.insert_test(job_id, passing_score);
        let result_id = store.insert_result(test_id);
        Attempt {
            store,
            test_id,
            result_id,
        }
    }

    impl Attempt {
        fn answer(&self, order_index: i32, points: f64, text: &str) -> i64 {
            let q = self.store.insert_question(
                self.test_id,
                &format!("Question {order_index}"),
                points,
                order_index,
            );
            self.store.insert_answer(self.result_id, q, text)
        }
    }

    fn three_answer_evaluator() -> ScriptedEvaluator {
        ScriptedEvaluator::new()
            .reply("a1", 80, "Strong.")
            .reply("a2", 60, "Adequate.")
            .reply("a3", 40, "Thin.")
    }

    #[tokio::test]
    async fn test_aggregate_80_60_40_passes_at_60() {
        let a = attempt(None);
        // Inserted out of question order: feedback must still follow order_index.
        a.answer(3, 10.0, "a3");
        a.answer(1, 10.0, "a1");
        a.answer(2, 20.0, "a2");
        let evaluator = three_answer_evaluator();

        let report = grade_attempt(
            &a.store,
            &evaluator,
            &GradingLocks::new(),
            PassPolicy::Fixed,
            a.result_id,
        )
        .await
        .unwrap();

        assert_eq!(report.total_score, 180.0);
        assert_eq!(report.average_score, 60.0);
        assert!(report.passed);
        assert_eq!(report.graded_answers, 3);
        assert_eq!(
            report.feedback,
            "Question 1: Strong.\nQuestion 2: Adequate.\nQuestion 3: Thin."
        );

        let stored = a.store.result(a.result_id);
        assert_eq!(stored.total_score, Some(180.0));
        assert_eq!(stored.percentage, Some(60.0));
        assert_eq!(stored.passed, Some(true));
        assert_eq!(stored.status, "graded");
        assert!(stored.graded_at.is_some());
        assert_eq!(a.store.attempt_commits(), 1);
    }

    #[tokio::test]
    async fn test_single_answer_50_fails() {
        let a = attempt(None);
        a.answer(1, 10.0, "half");
        let evaluator = ScriptedEvaluator::new().reply("half", 50, "Half right.");

        let report = grade_attempt(
            &a.store,
            &evaluator,
            &GradingLocks::new(),
            PassPolicy::Fixed,
            a.result_id,
        )
        .await
        .unwrap();

        assert_eq!(report.average_score, 50.0);
        assert!(!report.passed);
        assert_eq!(a.store.result(a.result_id).passed, Some(false));
    }

    #[tokio::test]
    async fn test_answer_points_persisted_per_weight() {
        let a = attempt(None);
        let heavy = a.answer(1, 20.0, "a1");
        let light = a.answer(2, 5.0, "a2");
        let evaluator = three_answer_evaluator();

        grade_attempt(
            &a.store,
            &evaluator,
            &GradingLocks::new(),
            PassPolicy::Fixed,
            a.result_id,
        )
        .await
        .unwrap();

        assert_eq!(a.store.answer(heavy).points_earned, Some(16.0));
        assert_eq!(a.store.answer(heavy).is_correct, Some(true));
        assert_eq!(a.store.answer(light).points_earned, Some(3.0));
        assert_eq!(a.store.answer(light).is_correct, Some(false));
    }

    #[tokio::test]
    async fn test_empty_and_orphaned_answers_are_skipped() {
        let a = attempt(None);
        a.answer(1, 10.0, "a1");
        let blank = a.answer(2, 10.0, "");
        let orphan = a.store.insert_answer(a.result_id, 424_242, "a3");
        let evaluator = three_answer_evaluator();

        let report = grade_attempt(
            &a.store,
            &evaluator,
            &GradingLocks::new(),
            PassPolicy::Fixed,
            a.result_id,
        )
        .await
        .unwrap();

        assert_eq!(report.graded_answers, 1);
        assert_eq!(report.skipped_answers, 2);
        assert_eq!(report.average_score, 80.0);
        assert_eq!(report.feedback, "Question 1: Strong.");
        assert_eq!(evaluator.calls(), 1);
        assert_eq!(a.store.answer(blank).points_earned, None);
        assert_eq!(a.store.answer(orphan).points_earned, None);
    }

    #[tokio::test]
    async fn test_unknown_result_is_not_found() {
        let a = attempt(None);
        let evaluator = ScriptedEvaluator::new();

        let err = grade_attempt(
            &a.store,
            &evaluator,
            &GradingLocks::new(),
            PassPolicy::Fixed,
            9_999,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(evaluator.calls(), 0);
    }

    #[tokio::test]
    async fn test_result_without_answers_is_rejected() {
        let a = attempt(None);
        let evaluator = ScriptedEvaluator::new();

        let err = grade_attempt(
            &a.store,
            &evaluator,
            &GradingLocks::new(),
            PassPolicy::Fixed,
            a.result_id,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("no answers")));
    }

    #[tokio::test]
    async fn test_all_blank_answers_persist_nothing() {
        let a = attempt(None);
        a.answer(1, 10.0, "");
        a.answer(2, 10.0, "  ");
        let evaluator = ScriptedEvaluator::new();

        let err = grade_attempt(
            &a.store,
            &evaluator,
            &GradingLocks::new(),
            PassPolicy::Fixed,
            a.result_id,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::EmptyInput(_)));
        assert_eq!(a.store.attempt_commits(), 0);
        assert_eq!(a.store.result(a.result_id).status, "submitted");
    }

    #[tokio::test]
    async fn test_regrading_is_idempotent_under_stable_replies() {
        let a = attempt(None);
        a.answer(1, 10.0, "a1");
        a.answer(2, 10.0, "a2");
        a.answer(3, 10.0, "a3");
        let evaluator = three_answer_evaluator();
        let locks = GradingLocks::new();

        grade_attempt(&a.store, &evaluator, &locks, PassPolicy::Fixed, a.result_id)
            .await
            .unwrap();
        let first = a.store.result(a.result_id);

        grade_attempt(&a.store, &evaluator, &locks, PassPolicy::Fixed, a.result_id)
            .await
            .unwrap();
        let second = a.store.result(a.result_id);

        assert_eq!(first.total_score, second.total_score);
        assert_eq!(first.percentage, second.percentage);
        assert_eq!(first.passed, second.passed);
        assert_eq!(first.feedback, second.feedback);
        assert_eq!(evaluator.calls(), 6);
    }

    #[tokio::test]
    async fn test_degraded_answers_are_counted_and_marked() {
        let a = attempt(None);
        a.answer(1, 10.0, "a1");
        let lost = a.answer(2, 10.0, "lost");
        let evaluator = ScriptedEvaluator::new()
            .reply("a1", 100, "Perfect.")
            .reply_with("lost", Evaluation::degraded(Fallback::Transport));

        let report = grade_attempt(
            &a.store,
            &evaluator,
            &GradingLocks::new(),
            PassPolicy::Fixed,
            a.result_id,
        )
        .await
        .unwrap();

        assert_eq!(report.degraded_answers, 1);
        assert_eq!(report.average_score, 50.0);
        assert!(report.feedback.contains("Question 2: [grading unavailable]"));
        assert!(a.store.answer(lost).graded_with_fallback);
        assert_eq!(a.store.result(a.result_id).degraded_answers, 1);
    }

    #[tokio::test]
    async fn test_fixed_policy_ignores_test_passing_score() {
        let a = attempt(Some(90.0));
        a.answer(1, 10.0, "a1");
        let evaluator = three_answer_evaluator();

        let report = grade_attempt(
            &a.store,
            &evaluator,
            &GradingLocks::new(),
            PassPolicy::Fixed,
            a.result_id,
        )
        .await
        .unwrap();

        assert_eq!(report.pass_threshold, 60.0);
        assert!(report.passed);
    }

    #[tokio::test]
    async fn test_per_test_policy_uses_test_passing_score() {
        let a = attempt(Some(90.0));
        a.answer(1, 10.0, "a1");
        let evaluator = three_answer_evaluator();

        let report = grade_attempt(
            &a.store,
            &evaluator,
            &GradingLocks::new(),
            PassPolicy::PerTest,
            a.result_id,
        )
        .await
        .unwrap();

        assert_eq!(report.pass_threshold, 90.0);
        assert!(!report.passed);
    }

    #[tokio::test]
    async fn test_concurrent_grading_of_same_result_conflicts() {
        let a = attempt(None);
        a.answer(1, 10.0, "a1");
        let evaluator = three_answer_evaluator();
        let locks = GradingLocks::new();
        let _held = locks.try_acquire(a.result_id).unwrap();

        let err = grade_attempt(&a.store, &evaluator, &locks, PassPolicy::Fixed, a.result_id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(evaluator.calls(), 0);
    }
}
