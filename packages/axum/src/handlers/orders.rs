//! Order handlers showing embedded resources and mixed responses.
//!
//! - `GET /entity/{id}`: an order summary with embedded orders.
//! - `GET /status`: plain JSON, or HAL with `?format=hal`.

use axum::{
    extract::{Path, Query},
    Json,
};
use halkit::{Document, Embedded, EmbeddedMap, Link, LinkCollection};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::{
    error::AppError,
    extract::HalContext,
    response::{Hal, Reply},
};

/// `GET /entity/{id}`
///
/// Returns 404 for id `0`. Any other id yields a summary document with two
/// embedded orders, each carrying its own links.
pub async fn entity(
    HalContext(ctx): HalContext,
    Path(id): Path<u32>,
) -> Result<Hal<Document>, AppError> {
    if id == 0 {
        return Err(AppError::NotFound(format!("entity {id} not found")));
    }

    let orders = Embedded::items([
        order(id, 1, 30.0, "shipped")?,
        order(id, 2, 20.0, "processing")?,
    ])?;

    let links = LinkCollection::new([
        Link::new("collection", "/entity"),
        Link::new("find", "/entity/{id}").templated(true),
    ])?;

    let doc = Document::with_parts(
        &ctx,
        Some(fields(json!({ "id": id, "currentlyProcessing": 14 }))),
        Some(links),
        Some(EmbeddedMap::from_iter([("orders", orders)])),
    )?;
    Ok(Hal::new(doc))
}

fn order(entity: u32, n: u32, total: f64, status: &str) -> Result<Embedded, AppError> {
    let links = LinkCollection::new([
        Link::new("self", format!("/entity/{entity}/orders/{n}")),
        Link::new("customer", format!("/customers/{n}")).with_title("Customer"),
    ])?;
    let data = fields(json!({ "total": total, "currency": "USD", "status": status }));
    Ok(Embedded::with_parts(Some(data.into()), Some(links), None)?)
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub format: Option<String>,
}

/// `GET /status[?format=hal]`
///
/// The same payload either as a HAL document or as plain JSON.
pub async fn status(
    HalContext(ctx): HalContext,
    Query(query): Query<StatusQuery>,
) -> Result<Reply<Json<Value>>, AppError> {
    let body = json!({ "healthy": true });
    if query.format.as_deref() == Some("hal") {
        let doc = Document::with_parts(&ctx, Some(fields(body)), None, None)?;
        return Ok(doc.into());
    }
    Ok(Reply::Other(Json(body)))
}
