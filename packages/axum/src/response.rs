//! Turning HAL resources into HTTP responses.
//!
//! Handlers return [`Hal`] to answer with a HAL document, or [`Reply`] when
//! the same handler may answer with either a HAL document or any other
//! response:
//!
//! ```rust,ignore
//! async fn order(HalContext(ctx): HalContext) -> Result<Hal<Document>, AppError> {
//!     Ok(Hal::new(Document::new(&ctx)))
//! }
//! ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use halkit::{Document, Resource, HAL_CONTENT_TYPE};

/// Builds the HTTP response for a serialized HAL document.
///
/// Swap in another implementation with [`Hal::with_responder`] to change
/// headers or framing without touching handlers.
pub trait HalResponder {
    fn respond(&self, status: StatusCode, body: String) -> Response;
}

/// The standard responder: the given status, `Content-Type:
/// application/hal+json` and the JSON text as body.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResponder;

impl HalResponder for DefaultResponder {
    fn respond(&self, status: StatusCode, body: String) -> Response {
        tracing::debug!(%status, bytes = body.len(), "writing HAL response");
        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(HAL_CONTENT_TYPE))],
            body,
        )
            .into_response()
    }
}

/// A HAL resource on its way out of a handler.
#[derive(Debug, Clone)]
pub struct Hal<R, P = DefaultResponder> {
    resource: R,
    status: StatusCode,
    responder: P,
}

impl<R: Resource> Hal<R> {
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            status: StatusCode::OK,
            responder: DefaultResponder,
        }
    }
}

impl<R: Resource, P: HalResponder> Hal<R, P> {
    /// Answer with `status` instead of `200 OK`.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_responder<Q: HalResponder>(self, responder: Q) -> Hal<R, Q> {
        Hal {
            resource: self.resource,
            status: self.status,
            responder,
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn into_inner(self) -> R {
        self.resource
    }
}

impl<R: Resource, P: HalResponder> IntoResponse for Hal<R, P> {
    fn into_response(self) -> Response {
        self.responder.respond(self.status, self.resource.to_json())
    }
}

impl From<Document> for Hal<Document> {
    fn from(document: Document) -> Self {
        Hal::new(document)
    }
}

/// Either a HAL document or any other response.
///
/// HAL documents get the HAL treatment; everything else goes through its
/// own [`IntoResponse`] untouched.
#[derive(Debug)]
pub enum Reply<T> {
    Hal(Hal<Document>),
    Other(T),
}

impl<T> Reply<T> {
    pub fn is_hal(&self) -> bool {
        matches!(self, Reply::Hal(_))
    }
}

impl<T> From<Document> for Reply<T> {
    fn from(document: Document) -> Self {
        Reply::Hal(Hal::new(document))
    }
}

impl<T> From<Hal<Document>> for Reply<T> {
    fn from(hal: Hal<Document>) -> Self {
        Reply::Hal(hal)
    }
}

impl<T: IntoResponse> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        match self {
            Reply::Hal(hal) => hal.into_response(),
            Reply::Other(other) => other.into_response(),
        }
    }
}
