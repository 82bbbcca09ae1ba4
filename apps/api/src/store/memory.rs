//! In-memory `GradingStore` for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::models::attempt::{AnswerGradeUpdate, AnswerRow, ResultGradeUpdate, ResultRow};
use crate::models::job::{JobRow, JobTestRow};
use crate::models::question::{NewQuestion, QuestionCategory, QuestionEdit, QuestionRow};
use crate::store::GradingStore;

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    jobs: BTreeMap<i64, JobRow>,
    tests: BTreeMap<i64, JobTestRow>,
    questions: BTreeMap<i64, QuestionRow>,
    answers: BTreeMap<i64, AnswerRow>,
    results: BTreeMap<i64, ResultRow>,
    attempt_commits: usize,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn apply_answer_grade(&mut self, grade: &AnswerGradeUpdate) {
        if let Some(answer) = self.answers.get_mut(&grade.answer_id) {
            answer.score = Some(grade.score);
            answer.points_earned = Some(grade.points_earned);
            answer.is_correct = Some(grade.is_correct);
            answer.comment = Some(grade.comment.clone());
            answer.suggestion = Some(grade.suggestion.clone());
            answer.graded_with_fallback = grade.graded_with_fallback;
            answer.submitted_at = grade.graded_at;
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryGradingStore {
    tables: Mutex<Tables>,
}

impl MemoryGradingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_job(&self, description: Option<&str>) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let job_id = tables.next_id();
        tables.jobs.insert(
            job_id,
            JobRow {
                job_id,
                title: Some("Backend Engineer".to_string()),
                description: description.map(str::to_string),
                requirements: None,
                responsibilities: None,
                experience_level: None,
            },
        );
        job_id
    }

    pub fn insert_test(&self, job_id: i64, passing_score: Option<f64>) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let test_id = tables.next_id();
        tables.tests.insert(
            test_id,
            JobTestRow {
                test_id,
                job_id,
                test_name: "Backend screening".to_string(),
                passing_score,
                is_active: true,
                created_at: Utc::now(),
            },
        );
        test_id
    }

    pub fn insert_question(&self, test_id: i64, text: &str, points: f64, order_index: i32) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let question_id = tables.next_id();
        tables.questions.insert(
            question_id,
            QuestionRow {
                question_id,
                test_id,
                question_text: text.to_string(),
                category: QuestionCategory::Core.as_str().to_string(),
                points,
                order_index,
                explanation: None,
                required: true,
                created_at: Utc::now(),
            },
        );
        question_id
    }

    pub fn insert_result(&self, test_id: i64) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let result_id = tables.next_id();
        tables.results.insert(
            result_id,
            ResultRow {
                result_id,
                application_id: 1,
                test_id,
                status: "submitted".to_string(),
                total_score: None,
                percentage: None,
                passed: None,
                degraded_answers: 0,
                graded_at: None,
                feedback: None,
                created_at: Utc::now(),
            },
        );
        result_id
    }

    /// Panics on a duplicate `(result_id, question_id)` pair, mirroring the unique constraint.
    pub fn insert_answer(&self, result_id: i64, question_id: i64, text: &str) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        assert!(
            !tables
                .answers
                .values()
                .any(|a| a.result_id == result_id && a.question_id == question_id),
            "duplicate answer for result {result_id} question {question_id}"
        );
        let answer_id = tables.next_id();
        tables.answers.insert(
            answer_id,
            AnswerRow {
                answer_id,
                result_id,
                question_id,
                answer_text: text.to_string(),
                is_correct: None,
                score: None,
                points_earned: None,
                comment: None,
                suggestion: None,
                graded_with_fallback: false,
                submitted_at: Utc::now(),
            },
        );
        answer_id
    }

    pub fn answer(&self, answer_id: i64) -> AnswerRow {
        self.tables.lock().unwrap().answers[&answer_id].clone()
    }

    pub fn result(&self, result_id: i64) -> ResultRow {
        self.tables.lock().unwrap().results[&result_id].clone()
    }

    pub fn question_count(&self) -> usize {
        self.tables.lock().unwrap().questions.len()
    }

    pub fn attempt_commits(&self) -> usize {
        self.tables.lock().unwrap().attempt_commits
    }
}

#[async_trait]
impl GradingStore for MemoryGradingStore {
    async fn get_job(&self, job_id: i64) -> Result<Option<JobRow>, AppError> {
        Ok(self.tables.lock().unwrap().jobs.get(&job_id).cloned())
    }

    async fn get_test(&self, test_id: i64) -> Result<Option<JobTestRow>, AppError> {
        Ok(self.tables.lock().unwrap().tests.get(&test_id).cloned())
    }

    async fn get_or_create_test_for_job(&self, job_id: i64) -> Result<JobTestRow, AppError> {
        let existing = self
            .tables
            .lock()
            .unwrap()
            .tests
            .values()
            .find(|t| t.job_id == job_id)
            .cloned();
        match existing {
            Some(test) => Ok(test),
            None => {
                let test_id = self.insert_test(job_id, None);
                Ok(self.tables.lock().unwrap().tests[&test_id].clone())
            }
        }
    }

    async fn get_question(&self, question_id: i64) -> Result<Option<QuestionRow>, AppError> {
        Ok(self.tables.lock().unwrap().questions.get(&question_id).cloned())
    }

    async fn create_question(&self, question: NewQuestion) -> Result<QuestionRow, AppError> {
        let order_index = question.order_index.unwrap_or_else(|| {
            self.tables
                .lock()
                .unwrap()
                .questions
                .values()
                .filter(|q| q.test_id == question.test_id)
                .map(|q| q.order_index)
                .max()
                .unwrap_or(0)
                + 1
        });
        let question_id = self.insert_question(
            question.test_id,
            &question.question_text,
            question.points,
            order_index,
        );
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .questions
            .get_mut(&question_id)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("question vanished")))?;
        row.category = question.category.as_str().to_string();
        row.explanation = question.explanation;
        row.required = question.required;
        Ok(row.clone())
    }

    async fn update_question(
        &self,
        question_id: i64,
        edit: QuestionEdit,
    ) -> Result<Option<QuestionRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables.questions.get_mut(&question_id) else {
            return Ok(None);
        };
        if let Some(text) = edit.question_text {
            row.question_text = text;
        }
        if let Some(explanation) = edit.explanation {
            row.explanation = Some(explanation);
        }
        if let Some(category) = edit.category {
            row.category = category.as_str().to_string();
        }
        if let Some(points) = edit.points {
            row.points = points;
        }
        if let Some(required) = edit.required {
            row.required = required;
        }
        Ok(Some(row.clone()))
    }

    async fn get_answer(&self, answer_id: i64) -> Result<Option<AnswerRow>, AppError> {
        Ok(self.tables.lock().unwrap().answers.get(&answer_id).cloned())
    }

    async fn find_answer(
        &self,
        result_id: i64,
        question_id: i64,
    ) -> Result<Option<AnswerRow>, AppError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .answers
            .values()
            .find(|a| a.result_id == result_id && a.question_id == question_id)
            .cloned())
    }

    async fn answers_for_result(&self, result_id: i64) -> Result<Vec<AnswerRow>, AppError> {
        // BTreeMap iteration is already ordered by answer_id.
        Ok(self
            .tables
            .lock()
            .unwrap()
            .answers
            .values()
            .filter(|a| a.result_id == result_id)
            .cloned()
            .collect())
    }

    async fn get_result(&self, result_id: i64) -> Result<Option<ResultRow>, AppError> {
        Ok(self.tables.lock().unwrap().results.get(&result_id).cloned())
    }

    async fn save_answer_grade(&self, grade: &AnswerGradeUpdate) -> Result<(), AppError> {
        self.tables.lock().unwrap().apply_answer_grade(grade);
        Ok(())
    }

    async fn commit_attempt(
        &self,
        answers: &[AnswerGradeUpdate],
        result: &ResultGradeUpdate,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        for grade in answers {
            tables.apply_answer_grade(grade);
        }
        if let Some(row) = tables.results.get_mut(&result.result_id) {
            row.total_score = Some(result.score_sum);
            row.percentage = Some(result.average_score);
            row.passed = Some(result.passed);
            row.degraded_answers = result.degraded_answers;
            row.feedback = Some(result.feedback.clone());
            row.graded_at = Some(result.graded_at);
            row.status = "graded".to_string();
        }
        tables.attempt_commits += 1;
        Ok(())
    }
}
