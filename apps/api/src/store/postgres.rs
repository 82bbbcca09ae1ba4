use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::attempt::{AnswerGradeUpdate, AnswerRow, ResultGradeUpdate, ResultRow};
use crate::models::job::{JobRow, JobTestRow};
use crate::models::question::{NewQuestion, QuestionEdit, QuestionRow};
use crate::store::GradingStore;

const AUTO_TEST_NAME: &str = "Auto Generated Test";

const UPDATE_ANSWER_GRADE_SQL: &str = r#"
    UPDATE question_answers
    SET score = $2,
        points_earned = $3,
        is_correct = $4,
        comment = $5,
        suggestion = $6,
        graded_with_fallback = $7,
        submitted_at = $8
    WHERE answer_id = $1
"#;

#[derive(Clone)]
pub struct PgGradingStore {
    pool: PgPool,
}

impl PgGradingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bind_answer_grade<'q>(
    grade: &'q AnswerGradeUpdate,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    sqlx::query(UPDATE_ANSWER_GRADE_SQL)
        .bind(grade.answer_id)
        .bind(grade.score)
        .bind(grade.points_earned)
        .bind(grade.is_correct)
        .bind(&grade.comment)
        .bind(&grade.suggestion)
        .bind(grade.graded_with_fallback)
        .bind(grade.graded_at)
}

#[async_trait]
impl GradingStore for PgGradingStore {
    async fn get_job(&self, job_id: i64) -> Result<Option<JobRow>, AppError> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            SELECT job_id, title, description, requirements, responsibilities, experience_level
            FROM jobs
            WHERE job_id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_test(&self, test_id: i64) -> Result<Option<JobTestRow>, AppError> {
        Ok(
            sqlx::query_as::<_, JobTestRow>("SELECT * FROM job_tests WHERE test_id = $1")
                .bind(test_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_or_create_test_for_job(&self, job_id: i64) -> Result<JobTestRow, AppError> {
        let existing = sqlx::query_as::<_, JobTestRow>(
            "SELECT * FROM job_tests WHERE job_id = $1 ORDER BY test_id LIMIT 1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(test) = existing {
            return Ok(test);
        }

        let test = sqlx::query_as::<_, JobTestRow>(
            "INSERT INTO job_tests (job_id, test_name) VALUES ($1, $2) RETURNING *",
        )
        .bind(job_id)
        .bind(AUTO_TEST_NAME)
        .fetch_one(&self.pool)
        .await?;

        info!("Created test {} for job {job_id}", test.test_id);
        Ok(test)
    }

    async fn get_question(&self, question_id: i64) -> Result<Option<QuestionRow>, AppError> {
        Ok(sqlx::query_as::<_, QuestionRow>(
            "SELECT * FROM test_questions WHERE question_id = $1",
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_question(&self, question: NewQuestion) -> Result<QuestionRow, AppError> {
        Ok(sqlx::query_as::<_, QuestionRow>(
            r#"
            INSERT INTO test_questions
                (test_id, question_text, category, points, order_index, explanation, required)
            VALUES (
                $1, $2, $3, $4,
                COALESCE($5, (SELECT COALESCE(MAX(order_index), 0) + 1
                              FROM test_questions WHERE test_id = $1)),
                $6, $7
            )
            RETURNING *
            "#,
        )
        .bind(question.test_id)
        .bind(&question.question_text)
        .bind(question.category.as_str())
        .bind(question.points)
        .bind(question.order_index)
        .bind(&question.explanation)
        .bind(question.required)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_question(
        &self,
        question_id: i64,
        edit: QuestionEdit,
    ) -> Result<Option<QuestionRow>, AppError> {
        Ok(sqlx::query_as::<_, QuestionRow>(
            r#"
            UPDATE test_questions
            SET question_text = COALESCE($2, question_text),
                explanation = COALESCE($3, explanation),
                category = COALESCE($4, category),
                points = COALESCE($5, points),
                required = COALESCE($6, required)
            WHERE question_id = $1
            RETURNING *
            "#,
        )
        .bind(question_id)
        .bind(edit.question_text)
        .bind(edit.explanation)
        .bind(edit.category.map(|c| c.as_str()))
        .bind(edit.points)
        .bind(edit.required)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_answer(&self, answer_id: i64) -> Result<Option<AnswerRow>, AppError> {
        Ok(
            sqlx::query_as::<_, AnswerRow>("SELECT * FROM question_answers WHERE answer_id = $1")
                .bind(answer_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_answer(
        &self,
        result_id: i64,
        question_id: i64,
    ) -> Result<Option<AnswerRow>, AppError> {
        // (result_id, question_id) is unique, so at most one row matches.
        Ok(sqlx::query_as::<_, AnswerRow>(
            "SELECT * FROM question_answers WHERE result_id = $1 AND question_id = $2",
        )
        .bind(result_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn answers_for_result(&self, result_id: i64) -> Result<Vec<AnswerRow>, AppError> {
        Ok(sqlx::query_as::<_, AnswerRow>(
            "SELECT * FROM question_answers WHERE result_id = $1 ORDER BY answer_id ASC",
        )
        .bind(result_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_result(&self, result_id: i64) -> Result<Option<ResultRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ResultRow>("SELECT * FROM test_results WHERE result_id = $1")
                .bind(result_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn save_answer_grade(&self, grade: &AnswerGradeUpdate) -> Result<(), AppError> {
        bind_answer_grade(grade).execute(&self.pool).await?;
        Ok(())
    }

    async fn commit_attempt(
        &self,
        answers: &[AnswerGradeUpdate],
        result: &ResultGradeUpdate,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for grade in answers {
            bind_answer_grade(grade).execute(&mut *tx).await?;
        }

        sqlx::query(
            r#"
            UPDATE test_results
            SET total_score = $2,
                percentage = $3,
                passed = $4,
                degraded_answers = $5,
                feedback = $6,
                graded_at = $7,
                status = 'graded'
            WHERE result_id = $1
            "#,
        )
        .bind(result.result_id)
        .bind(result.score_sum)
        .bind(result.average_score)
        .bind(result.passed)
        .bind(result.degraded_answers)
        .bind(&result.feedback)
        .bind(result.graded_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
