//! Axum router wiring.
//!
//! GET-only routes; anything else gets the router's default 404/405.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops::info))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
