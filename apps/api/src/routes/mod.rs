pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::generation::handlers as generation;
use crate::grading::handlers as grading;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Question generation & customization
        .route(
            "/api/v1/ai/generate-interview-questions",
            post(generation::handle_generate_questions),
        )
        .route(
            "/api/v1/ai/questions/bulk-generate",
            post(generation::handle_bulk_generate),
        )
        .route(
            "/api/v1/ai/question-templates",
            get(generation::handle_question_templates),
        )
        .route(
            "/api/v1/ai/customize-questions",
            post(generation::handle_customize_question),
        )
        .route(
            "/api/v1/ai/questions/:question_id/customize",
            put(generation::handle_update_question),
        )
        // Grading
        .route(
            "/api/v1/ai/questions/validate",
            post(grading::handle_validate_answer),
        )
        .route(
            "/api/v1/ai/results/:result_id/grade",
            post(grading::handle_grade_attempt),
        )
        .route(
            "/api/v1/ai/results/:result_id/details",
            get(grading::handle_attempt_details),
        )
        .with_state(state)
}
