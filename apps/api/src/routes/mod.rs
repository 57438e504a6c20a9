pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::skills::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/add-skills", post(handlers::handle_add_skills))
        .route(
            "/add-skills/report",
            post(handlers::handle_add_skills_report),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
