//! Assembles the Axum [`Router`] from all handler modules.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{
    config::HalConfig,
    handlers::{hello, orders, AppState},
};

/// Build the complete application router with shared state.
pub fn build_router(config: HalConfig) -> Router {
    let state = AppState { config };

    Router::new()
        .route("/", get(hello::index))
        .route("/foo", get(hello::foo))
        .route("/entity/{id}", get(orders::entity))
        .route("/status", get(orders::status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
