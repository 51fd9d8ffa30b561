//! HTTP request handlers for the demo server.
//!
//! Handlers are async functions that take the [`HalContext`] extractor and
//! return [`Hal`] or [`Reply`].
//!
//! [`HalContext`]: crate::extract::HalContext
//! [`Hal`]: crate::response::Hal
//! [`Reply`]: crate::response::Reply

pub mod hello;
pub mod orders;

use axum::extract::FromRef;

use crate::config::HalConfig;

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: HalConfig,
}

impl FromRef<AppState> for HalConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
