//! Axum integration for [`halkit`].
//!
//! - [`extract::HalContext`] builds the per-request [`halkit::RequestContext`].
//! - [`response::Hal`] and [`response::Reply`] turn documents into
//!   `application/hal+json` responses and pass everything else through.
//! - [`router::build_router`] assembles the demo application served by the
//!   `halkit-hello` binary, so tests can run it in-process.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod router;

pub use config::{ConfigError, HalConfig};
pub use error::{AppError, ErrorResponse};
pub use extract::HalContext;
pub use response::{DefaultResponder, Hal, HalResponder, Reply};
pub use router::build_router;
