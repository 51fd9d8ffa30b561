//! `halkit-hello`: demo server answering with HAL documents.
//!
//! # Quick start
//!
//! ```sh
//! # Absolute self links on the default port:
//! halkit-hello
//!
//! # Path-only self links behind a canonical host name:
//! HALKIT_CANONICAL_HOST=api.example.com halkit-hello
//!
//! curl -i http://localhost:3000/foo
//! ```
//!
//! # Environment variables
//!
//! See [`halkit_axum::HalConfig`] for the full list.

use std::process;

use halkit_axum::{build_router, HalConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "halkit_axum=info,halkit=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = match HalConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        "self links: policy = {}, canonical host = {}",
        config.self_link,
        config.canonical_host.as_deref().unwrap_or("(none)")
    );

    let bind_addr = config.bind_addr;
    let app = build_router(config);

    tracing::info!("listening on {bind_addr}");
    let listener = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {bind_addr}: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        process::exit(1);
    }
}
