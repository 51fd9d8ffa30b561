//! HAL links: a relation name, a target and optional metadata.
//!
//! A [`Link`] serializes to a single-key mapping keyed by its relation:
//!
//! ```json
//! { "next": { "href": "/orders?page=2", "title": "Next page" } }
//! ```
//!
//! Only the attributes in [`ATTRIBUTE_NAMES`] are ever emitted. They are
//! written after `href`, in that fixed order, and only when set.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::context::SelfHref;
use crate::error::{describe, TypeError};

/// Optional link attributes recognised by HAL, in serialization order.
pub const ATTRIBUTE_NAMES: [&str; 7] = [
    "name",
    "title",
    "type",
    "deprecation",
    "profile",
    "templated",
    "hreflang",
];

/// The optional metadata a [`Link`] may carry.
///
/// Each field maps to one entry of [`ATTRIBUTE_NAMES`]; `None` means the
/// attribute is absent from the serialized link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkAttributes {
    /// Secondary key for selecting among links sharing a rel.
    pub name: Option<String>,
    /// Human-readable label.
    pub title: Option<String>,
    /// Media type hint, serialized as `type`.
    pub media_type: Option<String>,
    /// URL documenting the link's deprecation.
    pub deprecation: Option<String>,
    /// Profile URI of the target resource.
    pub profile: Option<String>,
    /// Whether `href` is a URI template.
    pub templated: Option<bool>,
    /// Language of the target resource.
    pub hreflang: Option<String>,
}

impl LinkAttributes {
    /// Pick the allow-listed attributes out of a loose key/value map.
    ///
    /// Keys outside [`ATTRIBUTE_NAMES`] are dropped without error. An
    /// allow-listed key holding the wrong JSON type (anything but a string,
    /// or a boolean for `templated`) is rejected. `null` counts as unset.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, TypeError> {
        let mut attrs = Self::default();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            match key.as_str() {
                "templated" => {
                    let flag = value
                        .as_bool()
                        .ok_or_else(|| invalid_attribute(key, "boolean", value))?;
                    attrs.templated = Some(flag);
                }
                "name" | "title" | "type" | "deprecation" | "profile" | "hreflang" => {
                    let text = value
                        .as_str()
                        .ok_or_else(|| invalid_attribute(key, "string", value))?
                        .to_owned();
                    *attrs.slot(key) = Some(text);
                }
                _ => tracing::trace!(attribute = %key, "dropping unsupported link attribute"),
            }
        }
        Ok(attrs)
    }

    fn slot(&mut self, key: &str) -> &mut Option<String> {
        match key {
            "name" => &mut self.name,
            "title" => &mut self.title,
            "type" => &mut self.media_type,
            "deprecation" => &mut self.deprecation,
            "profile" => &mut self.profile,
            _ => &mut self.hreflang,
        }
    }

    /// `true` when no attribute is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn write_into(&self, out: &mut Map<String, Value>) {
        let strings = [
            ("name", &self.name),
            ("title", &self.title),
            ("type", &self.media_type),
            ("deprecation", &self.deprecation),
            ("profile", &self.profile),
        ];
        for (key, value) in strings {
            if let Some(v) = value {
                out.insert(key.into(), Value::String(v.clone()));
            }
        }
        if let Some(t) = self.templated {
            out.insert("templated".into(), Value::Bool(t));
        }
        if let Some(lang) = &self.hreflang {
            out.insert("hreflang".into(), Value::String(lang.clone()));
        }
    }
}

fn invalid_attribute(name: &str, expected: &'static str, value: &Value) -> TypeError {
    TypeError::InvalidAttribute {
        name: name.to_owned(),
        expected,
        found: describe(value),
    }
}

/// A single HAL link.
///
/// `rel` and `href` are fixed at construction. The [`LinkAttributes`] stay
/// mutable and are read at serialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    rel: String,
    href: String,
    attributes: LinkAttributes,
}

impl Link {
    /// An empty `rel` is accepted here; it is rejected when the link is
    /// added to a [`LinkCollection`](crate::LinkCollection) or a document.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self::with_attributes(rel, href, LinkAttributes::default())
    }

    pub fn with_attributes(
        rel: impl Into<String>,
        href: impl Into<String>,
        attributes: LinkAttributes,
    ) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            attributes,
        }
    }

    /// Build a link from a JSON object such as
    /// `{"rel": "next", "href": "/page/2", "title": "Next"}`.
    ///
    /// `rel` and `href` are required strings and `rel` must be non-empty.
    /// Other keys are filtered through [`LinkAttributes::from_map`].
    pub fn from_value(value: &Value) -> Result<Self, TypeError> {
        let Value::Object(map) = value else {
            return Err(TypeError::NotALink(describe(value)));
        };
        let rel = map.get("rel").and_then(Value::as_str).filter(|r| !r.is_empty());
        let href = map.get("href").and_then(Value::as_str);
        let (Some(rel), Some(href)) = (rel, href) else {
            return Err(TypeError::NotALink(describe(value)));
        };

        let rest: Map<String, Value> = map
            .iter()
            .filter(|(k, _)| k.as_str() != "rel" && k.as_str() != "href")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let attributes = LinkAttributes::from_map(&rest)?;
        Ok(Self::with_attributes(rel, href, attributes))
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn attributes(&self) -> &LinkAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut LinkAttributes {
        &mut self.attributes
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.attributes.name = Some(name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.attributes.title = Some(title.into());
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.attributes.media_type = Some(media_type.into());
        self
    }

    pub fn with_deprecation(mut self, deprecation: impl Into<String>) -> Self {
        self.attributes.deprecation = Some(deprecation.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.attributes.profile = Some(profile.into());
        self
    }

    pub fn templated(mut self, templated: bool) -> Self {
        self.attributes.templated = Some(templated);
        self
    }

    pub fn with_hreflang(mut self, hreflang: impl Into<String>) -> Self {
        self.attributes.hreflang = Some(hreflang.into());
        self
    }

    /// The link body without the rel key: `{"href": ..., <attrs>}`.
    pub(crate) fn body(&self) -> Value {
        let mut inner = Map::new();
        inner.insert("href".into(), Value::String(self.href.clone()));
        self.attributes.write_into(&mut inner);
        Value::Object(inner)
    }

    /// `{rel: {"href": href, <set attributes>}}`.
    pub fn to_mapping(&self) -> Value {
        let mut out = Map::new();
        out.insert(self.rel.clone(), self.body());
        Value::Object(out)
    }

    pub fn to_json(&self) -> String {
        self.to_mapping().to_string()
    }

    /// Whether this link satisfies the link contract.
    pub(crate) fn check(&self) -> Result<(), TypeError> {
        if self.rel.is_empty() {
            return Err(TypeError::NotALink(format!(
                "Link {{ rel: \"\", href: {:?} }}",
                self.href
            )));
        }
        Ok(())
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_mapping().serialize(serializer)
    }
}

/// Constructors for the `self` link of a document.
///
/// The href is resolved once, when the link is built, from whatever
/// [`SelfHref`] source the caller passes: usually a
/// [`RequestContext`](crate::RequestContext), or a fixed URL outside a web
/// request.
pub struct SelfLink;

impl SelfLink {
    pub const REL: &'static str = "self";

    #[allow(clippy::new_ret_no_self)]
    pub fn new(source: &(impl SelfHref + ?Sized)) -> Link {
        Self::with_attributes(source, LinkAttributes::default())
    }

    pub fn with_attributes(source: &(impl SelfHref + ?Sized), attributes: LinkAttributes) -> Link {
        let href = source.self_href();
        tracing::debug!(%href, "resolved self link");
        Link::with_attributes(Self::REL, href, attributes)
    }
}
