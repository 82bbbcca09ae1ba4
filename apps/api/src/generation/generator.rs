//! Interview-question generation from a job description.
//!
//! Flow: detect locale (fallback English) → render recruiter prompt → LLM call →
//!       extract bulleted/numbered lines → optionally persist into the job's test.

use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{
    GENERATION_TEMPERATURE, QUESTION_COUNT, QUESTION_PROMPT_EN, QUESTION_PROMPT_VI,
};
use crate::language::{detect_locale, Locale, GENERATION_FALLBACK};
use crate::llm_client::prompts::ASSISTANT_SYSTEM;
use crate::llm_client::LlmClient;
use crate::models::question::{NewQuestion, QuestionCategory, QuestionRow};
use crate::store::GradingStore;

/// Weight given to generated questions.
pub const DEFAULT_QUESTION_POINTS: f64 = 10.0;

pub fn build_question_prompt(jd_text: &str, locale: Locale) -> String {
    let template = match locale {
        Locale::Vi => QUESTION_PROMPT_VI,
        Locale::En => QUESTION_PROMPT_EN,
    };
    template.replace("{jd_text}", jd_text)
}

/// Keeps lines that start with a bullet (`-`, `•`, `*`) or a list number, with the
/// marker removed. Preamble and blank lines are dropped.
pub fn extract_questions(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| strip_list_marker(line.trim()))
        .map(|q| q.trim_matches('*').trim().to_string())
        .filter(|q| !q.is_empty())
        .collect()
}

fn strip_list_marker(line: &str) -> Option<&str> {
    if let Some(rest) = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('•'))
        .or_else(|| line.strip_prefix("* "))
    {
        return Some(rest.trim_start());
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    let rest = rest
        .strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .unwrap_or(rest);
    Some(rest.trim_start())
}

/// Generates interview questions for `jd_text`. An empty description yields no
/// questions and no LLM call.
pub async fn generate_questions(llm: &LlmClient, jd_text: &str) -> Result<Vec<String>, AppError> {
    if jd_text.trim().is_empty() {
        return Ok(vec![]);
    }

    let locale = detect_locale(jd_text, GENERATION_FALLBACK);
    let prompt = build_question_prompt(jd_text, locale);

    let content = llm
        .call_text(&prompt, ASSISTANT_SYSTEM, GENERATION_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;

    let mut questions = extract_questions(&content);
    questions.truncate(QUESTION_COUNT);

    info!(
        "Generated {} interview questions ({:?}) with model {}",
        questions.len(),
        locale,
        llm.model()
    );
    Ok(questions)
}

/// Appends generated questions to the job's test, creating the test when missing.
pub async fn save_generated_questions(
    store: &dyn GradingStore,
    job_id: i64,
    questions: &[String],
) -> Result<Vec<QuestionRow>, AppError> {
    let test = store.get_or_create_test_for_job(job_id).await?;
    let mut saved = Vec::with_capacity(questions.len());

    for (position, text) in questions.iter().enumerate() {
        let row = store
            .create_question(NewQuestion {
                test_id: test.test_id,
                question_text: text.clone(),
                category: QuestionCategory::for_position(position),
                points: DEFAULT_QUESTION_POINTS,
                order_index: None,
                explanation: None,
                required: true,
            })
            .await?;
        saved.push(row);
    }

    info!(
        "Saved {} generated questions into test {} for job {job_id}",
        saved.len(),
        test.test_id
    );
    Ok(saved)
}
