//! Shared helpers for the halkit end-to-end test suite.
//!
//! Provides [`spawn_server`], which binds a `TcpListener` on an ephemeral
//! port, serves the demo router on it and returns the base URL.

use halkit_axum::{build_router, HalConfig};

/// Start an ephemeral in-process demo server and return its base URL.
///
/// The server runs in a background `tokio` task bound to an OS-assigned port
/// on `127.0.0.1`, e.g. `http://127.0.0.1:51234`. Only `bind_addr` of the
/// given config is overwritten.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the server fails to start.
pub async fn spawn_server(config: HalConfig) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    let config = HalConfig {
        bind_addr: addr,
        ..config
    };
    let router = build_router(config);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance server error");
    });

    format!("http://{addr}")
}

/// Config whose canonical host makes every `self` link path-only.
pub fn canonical_config() -> HalConfig {
    HalConfig {
        canonical_host: Some("localhost".into()),
        ..HalConfig::default()
    }
}
