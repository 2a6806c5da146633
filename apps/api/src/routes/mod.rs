pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::curriculum::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Curriculum API
        .route(
            "/api/v1/curricula/generate",
            post(handlers::handle_generate),
        )
        .route(
            "/api/v1/curricula/normalize",
            post(handlers::handle_normalize),
        )
        .with_state(state)
}
