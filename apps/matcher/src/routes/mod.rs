pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction
        .route(
            "/api/v1/extract/degrees",
            post(handlers::handle_extract_degrees),
        )
        .route(
            "/api/v1/extract/experience",
            post(handlers::handle_extract_experience),
        )
        // Matching
        .route("/api/v1/match/skills", post(handlers::handle_match_skills))
        .route("/api/v1/match/fit", post(handlers::handle_match_fit))
        // Evaluation & ranking
        .route("/api/v1/evaluate", post(handlers::handle_evaluate))
        .route("/api/v1/rank", post(handlers::handle_rank))
        .route(
            "/api/v1/rank/upload",
            post(handlers::handle_rank_upload),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
