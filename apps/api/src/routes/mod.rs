pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Live interview loop
        .route("/api/start_interview", post(handlers::handle_start_interview))
        .route(
            "/api/interview/:session_id/next_question",
            get(handlers::handle_next_question),
        )
        .route(
            "/api/interview/:session_id/next_response",
            post(handlers::handle_next_response),
        )
        .route(
            "/api/interview/:session_id/feedback",
            get(handlers::handle_feedback),
        )
        // Batch grading of a pre-existing transcript
        .route("/api/feedback", post(handlers::handle_batch_feedback))
        .with_state(state)
}
