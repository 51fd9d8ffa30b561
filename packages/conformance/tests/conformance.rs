//! End-to-end tests for HAL responses over real HTTP.
//!
//! Each test spawns an ephemeral in-process server via
//! [`halkit_conformance::spawn_server`] and talks to it with a `reqwest`
//! client, so headers, status codes and body bytes are checked exactly as a
//! client sees them.
//!
//! # Coverage
//!
//! | Test | Behavior |
//! |------|----------|
//! | `hal_response_has_hal_content_type` | content type |
//! | `minimal_document_body_is_exact` | key order, self link |
//! | `self_link_is_absolute_without_canonical_host` | self link policy |
//! | `self_link_keeps_query_string` | self link policy |
//! | `forwarded_headers_shape_absolute_self_link` | proxies |
//! | `untrusted_forwarded_headers_are_ignored` | proxies |
//! | `path_policy_forces_relative_self_link` | self link policy |
//! | `index_links_are_templated` | link attributes |
//! | `entity_embeds_orders_as_list` | embedded list |
//! | `unknown_entity_returns_404` | errors |
//! | `status_is_plain_json_by_default` | mixed responses |
//! | `status_is_hal_on_request` | mixed responses |

use halkit::{SelfLinkPolicy, HAL_CONTENT_TYPE};
use halkit_axum::HalConfig;
use halkit_conformance::{canonical_config, spawn_server};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap()
}

fn content_type(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

// ---------------------------------------------------------------------------
// Content type and body layout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hal_response_has_hal_content_type() {
    let base = spawn_server(canonical_config()).await;
    let resp = make_client().get(format!("{base}/foo")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(content_type(&resp), HAL_CONTENT_TYPE);
}

#[tokio::test]
async fn minimal_document_body_is_exact() {
    let base = spawn_server(canonical_config()).await;
    let resp = make_client().get(format!("{base}/foo")).send().await.unwrap();

    let text = resp.text().await.unwrap();
    assert_eq!(text, r#"{"foo":"bar","_links":{"self":{"href":"/foo"}}}"#);
}

// ---------------------------------------------------------------------------
// Self links
// ---------------------------------------------------------------------------

#[tokio::test]
async fn self_link_is_absolute_without_canonical_host() {
    let base = spawn_server(HalConfig::default()).await;
    let resp = make_client().get(format!("{base}/foo")).send().await.unwrap();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["_links"]["self"]["href"], format!("{base}/foo"));
}

#[tokio::test]
async fn self_link_keeps_query_string() {
    let base = spawn_server(canonical_config()).await;
    let resp = make_client()
        .get(format!("{base}/status?format=hal"))
        .send()
        .await
        .unwrap();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["_links"]["self"]["href"], "/status?format=hal");
}

#[tokio::test]
async fn forwarded_headers_shape_absolute_self_link() {
    let config = HalConfig {
        trust_forwarded: true,
        ..HalConfig::default()
    };
    let base = spawn_server(config).await;
    let resp = make_client()
        .get(format!("{base}/foo"))
        .header("x-forwarded-proto", "https")
        .header("x-forwarded-host", "api.example.com")
        .send()
        .await
        .unwrap();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["_links"]["self"]["href"], "https://api.example.com/foo");
}

#[tokio::test]
async fn untrusted_forwarded_headers_are_ignored() {
    let base = spawn_server(HalConfig::default()).await;
    let resp = make_client()
        .get(format!("{base}/foo"))
        .header("x-forwarded-host", "evil.example")
        .send()
        .await
        .unwrap();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["_links"]["self"]["href"], format!("{base}/foo"));
}

#[tokio::test]
async fn path_policy_forces_relative_self_link() {
    let config = HalConfig {
        self_link: SelfLinkPolicy::Path,
        ..HalConfig::default()
    };
    let base = spawn_server(config).await;
    let resp = make_client().get(format!("{base}/foo")).send().await.unwrap();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["_links"]["self"]["href"], "/foo");
}

// ---------------------------------------------------------------------------
// Links and embedded resources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn index_links_are_templated() {
    let base = spawn_server(canonical_config()).await;
    let resp = make_client().get(format!("{base}/")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let links = &body["_links"];
    assert_eq!(links["foo"]["href"], "/foo");
    assert_eq!(links["entity"]["templated"], true);
    assert_eq!(links["self"]["href"], "/");
    assert!(links["foo"].get("templated").is_none(), "unset attributes are omitted");
}

#[tokio::test]
async fn entity_embeds_orders_as_list() {
    let base = spawn_server(canonical_config()).await;
    let resp = make_client()
        .get(format!("{base}/entity/7"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(content_type(&resp), HAL_CONTENT_TYPE);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], 7);

    let orders = body["_embedded"]["orders"].as_array().expect("orders is a list");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["_links"]["self"]["href"], "/entity/7/orders/1");
    assert_eq!(orders[1]["status"], "processing");

    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["id", "currentlyProcessing", "_links", "_embedded"]);
}

#[tokio::test]
async fn unknown_entity_returns_404() {
    let base = spawn_server(canonical_config()).await;
    let resp = make_client()
        .get(format!("{base}/entity/0"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "not_found");
}

// ---------------------------------------------------------------------------
// Mixed responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_is_plain_json_by_default() {
    let base = spawn_server(canonical_config()).await;
    let resp = make_client().get(format!("{base}/status")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(content_type(&resp), "application/json");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "healthy": true }));
}

#[tokio::test]
async fn status_is_hal_on_request() {
    let base = spawn_server(canonical_config()).await;
    let resp = make_client()
        .get(format!("{base}/status?format=hal"))
        .send()
        .await
        .unwrap();

    assert_eq!(content_type(&resp), HAL_CONTENT_TYPE);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["healthy"], true);
}
