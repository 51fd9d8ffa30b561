//! Build HAL (Hypertext Application Language) documents and serialize them
//! for web responses.
//!
//! A HAL document is a JSON object with two reserved keys: `_links`, the
//! hyperlinks of the resource keyed by relation, and `_embedded`, nested
//! sub-resources keyed by name.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`link`] | [`Link`], [`LinkAttributes`] and the [`SelfLink`] constructors |
//! | [`collection`] | [`LinkCollection`] and the `_links` canonical form |
//! | [`document`] | [`Document`], [`Embedded`] and their recursive serialization |
//! | [`context`] | [`RequestContext`], [`SelfLinkPolicy`] and the [`SelfHref`] source trait |
//! | [`resource`] | The [`Resource`] capability web layers dispatch on |
//! | [`error`] | [`TypeError`], raised for every construction-time contract violation |
//!
//! # Quick start
//!
//! ```rust
//! use halkit::{Document, Embedded, Link, LinkCollection, RequestContext};
//! use serde_json::json;
//!
//! let ctx = RequestContext::new("http://api.example.com/orders", "http://api.example.com/")
//!     .with_canonical_host("api.example.com");
//!
//! let links = LinkCollection::new(vec![Link::new("next", "/orders?page=2")])?;
//! let mut doc = Document::with_parts(
//!     &ctx,
//!     json!({ "currentlyProcessing": 14 }).as_object().cloned(),
//!     Some(links),
//!     None,
//! )?;
//! doc.embed("latest", Embedded::fields(json!({ "total": 30 }).as_object().cloned().unwrap())?)?;
//!
//! assert_eq!(
//!     doc.to_json(),
//!     r#"{"currentlyProcessing":14,"_links":{"next":{"href":"/orders?page=2"},"self":{"href":"/orders"}},"_embedded":{"latest":{"total":30}}}"#
//! );
//! # Ok::<(), halkit::TypeError>(())
//! ```

pub mod collection;
pub mod context;
pub mod document;
pub mod error;
pub mod link;
pub mod resource;

pub use collection::LinkCollection;
pub use context::{RequestContext, SelfHref, SelfLinkPolicy};
pub use document::{Document, Embedded, EmbeddedData, EmbeddedMap, Item};
pub use error::TypeError;
pub use link::{Link, LinkAttributes, SelfLink};
pub use resource::Resource;

/// Media type of every serialized HAL document.
pub const HAL_CONTENT_TYPE: &str = "application/hal+json";

/// Maximum JSON nesting of a serialized resource, data values and embedded
/// resources included. `serde_json` refuses to parse anything deeper.
pub const MAX_DEPTH: usize = 127;
