pub mod analysis;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze", post(analysis::handle_analyze))
        .route("/api/recent-analyses", get(analysis::handle_recent))
        .route("/api/analyses/latest", get(analysis::handle_latest))
        .with_state(state)
}
