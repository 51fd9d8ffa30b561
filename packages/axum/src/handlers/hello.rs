//! `GET /foo`: the smallest useful HAL document.

use halkit::Document;
use serde_json::{json, Map, Value};

use crate::{error::AppError, extract::HalContext, response::Hal};

/// `GET /foo`
///
/// ```json
/// { "foo": "bar", "_links": { "self": { "href": "/foo" } } }
/// ```
pub async fn foo(HalContext(ctx): HalContext) -> Result<Hal<Document>, AppError> {
    let mut data = Map::new();
    data.insert("foo".into(), Value::String("bar".into()));
    let doc = Document::with_parts(&ctx, Some(data), None, None)?;
    Ok(Hal::new(doc))
}

/// `GET /`: links to everything else the server offers.
pub async fn index(HalContext(ctx): HalContext) -> Result<Hal<Document>, AppError> {
    let description = json!({
        "links": [
            { "rel": "foo", "href": "/foo" },
            { "rel": "entity", "href": "/entity/{id}", "templated": true },
            { "rel": "status", "href": "/status{?format}", "templated": true }
        ]
    });
    Ok(Hal::new(Document::from_value(&ctx, &description)?))
}
