//! HAL documents and the embedded resources nested inside them.
//!
//! A [`Document`] is the top-level resource a handler returns. It always
//! carries a `self` link, resolved when the document is built. An
//! [`Embedded`] has the same shape but no automatic `self` link, and its
//! data may be a list instead of a set of fields.
//!
//! Serialization merges everything into one object, in this order:
//!
//! 1. the data fields,
//! 2. `_links`, when there is at least one link,
//! 3. `_embedded`, when there is at least one embedded resource.
//!
//! ```json
//! {
//!   "currentlyProcessing": 14,
//!   "_links": { "self": { "href": "/orders" } },
//!   "_embedded": {
//!     "orders": { "total": 30, "_links": { "foo": { "href": "www.foo.com" } } }
//!   }
//! }
//! ```

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::collection::LinkCollection;
use crate::context::SelfHref;
use crate::error::{describe, TypeError};
use crate::link::{Link, SelfLink};
use crate::resource::Resource;
use crate::MAX_DEPTH;

/// Keys HAL reserves in a resource object.
pub const RESERVED_KEYS: [&str; 2] = ["_links", "_embedded"];

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A top-level HAL resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    data: Option<Map<String, Value>>,
    links: LinkCollection,
    embedded: EmbeddedMap,
    /// Upper bound of the JSON nesting of `to_mapping()`.
    depth: usize,
}

impl Document {
    /// An empty document: no data, only the `self` link.
    pub fn new(source: &(impl SelfHref + ?Sized)) -> Self {
        let mut links = LinkCollection::default();
        links.push(SelfLink::new(source));
        Self {
            data: None,
            links,
            embedded: EmbeddedMap::default(),
            depth: object_depth(None, &EmbeddedMap::default()),
        }
    }

    /// Build a document from its parts and append the `self` link after the
    /// given links.
    pub fn with_parts(
        source: &(impl SelfHref + ?Sized),
        data: Option<Map<String, Value>>,
        links: Option<LinkCollection>,
        embedded: Option<EmbeddedMap>,
    ) -> Result<Self, TypeError> {
        if let Some(fields) = &data {
            check_reserved(fields)?;
        }
        let embedded = embedded.unwrap_or_default();
        let depth = object_depth(data.as_ref(), &embedded);
        check_depth(depth)?;

        let mut links = links.unwrap_or_default();
        links.push(SelfLink::new(source));
        Ok(Self {
            data,
            links,
            embedded,
            depth,
        })
    }

    /// Build a document from a JSON description:
    ///
    /// ```json
    /// { "data": { ... }, "links": [{ "rel": "...", "href": "..." }], "embedded": { "name": { ... } } }
    /// ```
    ///
    /// Every key is optional and `null` counts as absent. Embedded values
    /// are read with [`Embedded::from_value`].
    pub fn from_value(source: &(impl SelfHref + ?Sized), description: &Value) -> Result<Self, TypeError> {
        let parts = Description::read(description)?;
        let data = match parts.data {
            None => None,
            Some(Value::Object(fields)) => Some(fields.clone()),
            Some(other) => {
                return Err(TypeError::NotADocument(format!(
                    "data must be an object, got {}",
                    describe(other)
                )))
            }
        };
        Self::with_parts(source, data, parts.links()?, parts.embedded()?)
    }

    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    pub fn links(&self) -> &LinkCollection {
        &self.links
    }

    /// Links are append-only and validated, so handing out the collection
    /// cannot break the document.
    pub fn links_mut(&mut self) -> &mut LinkCollection {
        &mut self.links
    }

    pub fn embedded(&self) -> &EmbeddedMap {
        &self.embedded
    }

    /// Shorthand for `links_mut().append(link)`.
    pub fn append_link(&mut self, link: Link) -> Result<(), TypeError> {
        self.links.append(link)
    }

    /// Embed a resource under `name`, replacing any previous one in place.
    pub fn embed(&mut self, name: impl Into<String>, resource: Embedded) -> Result<(), TypeError> {
        let depth = self.depth.max(EMBEDDED_OVERHEAD + resource.depth);
        check_depth(depth)?;
        self.embedded.insert(name, resource);
        self.depth = depth;
        Ok(())
    }

    pub fn to_mapping(&self) -> Value {
        assemble(self.data.as_ref(), &self.links, &self.embedded)
    }

    pub fn to_json(&self) -> String {
        self.to_mapping().to_string()
    }
}

impl Resource for Document {
    fn to_mapping(&self) -> Value {
        Document::to_mapping(self)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_mapping().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Embedded
// ---------------------------------------------------------------------------

/// The data of an [`Embedded`] resource.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddedData {
    /// Fields merged into the resource object.
    Fields(Map<String, Value>),
    /// A list serialized as a bare JSON array, without `_links` or `_embedded`.
    Items(Vec<Item>),
}

impl EmbeddedData {
    /// Objects become [`EmbeddedData::Fields`], arrays become
    /// [`EmbeddedData::Items`] of raw values.
    pub fn from_value(value: &Value) -> Result<Self, TypeError> {
        match value {
            Value::Object(fields) => Ok(EmbeddedData::Fields(fields.clone())),
            Value::Array(items) => Ok(EmbeddedData::Items(
                items.iter().cloned().map(Item::Value).collect(),
            )),
            other => Err(TypeError::NotADocument(format!(
                "embedded data must be an object or an array, got {}",
                describe(other)
            ))),
        }
    }
}

impl From<Map<String, Value>> for EmbeddedData {
    fn from(fields: Map<String, Value>) -> Self {
        EmbeddedData::Fields(fields)
    }
}

impl From<Vec<Item>> for EmbeddedData {
    fn from(items: Vec<Item>) -> Self {
        EmbeddedData::Items(items)
    }
}

/// One element of a list-shaped [`EmbeddedData`].
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Emitted unchanged.
    Value(Value),
    /// Emitted as its own serialized form.
    Document(Embedded),
}

impl Item {
    pub fn to_mapping(&self) -> Value {
        match self {
            Item::Value(v) => v.clone(),
            Item::Document(d) => d.to_mapping(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Item::Value(v) => value_depth(v),
            Item::Document(d) => d.depth,
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item::Value(value)
    }
}

impl From<Embedded> for Item {
    fn from(document: Embedded) -> Self {
        Item::Document(document)
    }
}

/// A resource nested under another resource's `_embedded`.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedded {
    data: Option<EmbeddedData>,
    links: LinkCollection,
    embedded: EmbeddedMap,
    /// Upper bound of the JSON nesting of `to_mapping()`.
    depth: usize,
}

impl Default for Embedded {
    fn default() -> Self {
        Self {
            data: None,
            links: LinkCollection::default(),
            embedded: EmbeddedMap::default(),
            depth: object_depth(None, &EmbeddedMap::default()),
        }
    }
}

impl Embedded {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(
        data: Option<EmbeddedData>,
        links: Option<LinkCollection>,
        embedded: Option<EmbeddedMap>,
    ) -> Result<Self, TypeError> {
        let embedded = embedded.unwrap_or_default();
        let depth = match &data {
            Some(EmbeddedData::Fields(fields)) => {
                check_reserved(fields)?;
                object_depth(Some(fields), &embedded)
            }
            Some(EmbeddedData::Items(items)) => 1 + items.iter().map(Item::depth).max().unwrap_or(0),
            None => object_depth(None, &embedded),
        };
        check_depth(depth)?;

        Ok(Self {
            data,
            links: links.unwrap_or_default(),
            embedded,
            depth,
        })
    }

    /// An embedded resource holding only fields.
    pub fn fields(fields: Map<String, Value>) -> Result<Self, TypeError> {
        Self::with_parts(Some(EmbeddedData::Fields(fields)), None, None)
    }

    /// An embedded resource serialized as a list.
    pub fn items<I>(items: impl IntoIterator<Item = I>) -> Result<Self, TypeError>
    where
        I: Into<Item>,
    {
        let items = items.into_iter().map(Into::into).collect();
        Self::with_parts(Some(EmbeddedData::Items(items)), None, None)
    }

    /// Same description format as [`Document::from_value`]. `data` may also
    /// be an array, read as a list of raw values.
    pub fn from_value(description: &Value) -> Result<Self, TypeError> {
        let parts = Description::read(description)?;
        let data = parts.data.map(EmbeddedData::from_value).transpose()?;
        Self::with_parts(data, parts.links()?, parts.embedded()?)
    }

    pub fn data(&self) -> Option<&EmbeddedData> {
        self.data.as_ref()
    }

    pub fn links(&self) -> &LinkCollection {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut LinkCollection {
        &mut self.links
    }

    pub fn embedded(&self) -> &EmbeddedMap {
        &self.embedded
    }

    /// Upper bound of the JSON nesting of [`to_mapping`](Self::to_mapping).
    /// Links always count as if one of their rels were a list.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Builder form of `links_mut().append(link)`.
    pub fn with_link(mut self, link: Link) -> Result<Self, TypeError> {
        self.links.append(link)?;
        Ok(self)
    }

    /// Embed a resource under `name`, replacing any previous one in place.
    ///
    /// A list-shaped resource does not serialize its embedded resources, so
    /// they do not count towards its depth.
    pub fn embed(&mut self, name: impl Into<String>, resource: Embedded) -> Result<(), TypeError> {
        let depth = match self.data {
            Some(EmbeddedData::Items(_)) => self.depth,
            _ => self.depth.max(EMBEDDED_OVERHEAD + resource.depth),
        };
        check_depth(depth)?;
        self.embedded.insert(name, resource);
        self.depth = depth;
        Ok(())
    }

    pub fn to_mapping(&self) -> Value {
        match &self.data {
            Some(EmbeddedData::Items(items)) => {
                Value::Array(items.iter().map(Item::to_mapping).collect())
            }
            Some(EmbeddedData::Fields(fields)) => {
                assemble(Some(fields), &self.links, &self.embedded)
            }
            None => assemble(None, &self.links, &self.embedded),
        }
    }

    pub fn to_json(&self) -> String {
        self.to_mapping().to_string()
    }
}

impl Resource for Embedded {
    fn to_mapping(&self) -> Value {
        Embedded::to_mapping(self)
    }
}

impl Serialize for Embedded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_mapping().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// EmbeddedMap
// ---------------------------------------------------------------------------

/// Named embedded resources, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedMap {
    entries: Vec<(String, Embedded)>,
}

impl EmbeddedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object of name to embedded description.
    pub fn from_value(value: &Value) -> Result<Self, TypeError> {
        let Value::Object(entries) = value else {
            return Err(TypeError::EmbeddedNotMapping(describe(value)));
        };
        entries
            .iter()
            .map(|(name, description)| {
                if !description.is_object() {
                    return Err(TypeError::EmbeddedNotMapping(format!(
                        "{name:?} must be a document description, got {}",
                        describe(description)
                    )));
                }
                Ok((name.clone(), Embedded::from_value(description)?))
            })
            .collect()
    }

    /// Insert or replace. A replaced entry keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, resource: Embedded) -> Option<Embedded> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, resource)),
            None => {
                self.entries.push((name, resource));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Embedded> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Embedded)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Deepest nesting among the entries; 0 when empty.
    pub fn depth(&self) -> usize {
        self.entries.iter().map(|(_, e)| e.depth).max().unwrap_or(0)
    }

    /// `{name: resource.to_mapping(), ...}`.
    pub fn to_mapping(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(name, e)| (name.clone(), e.to_mapping()))
                .collect(),
        )
    }
}

impl<K: Into<String>> FromIterator<(K, Embedded)> for EmbeddedMap {
    fn from_iter<T: IntoIterator<Item = (K, Embedded)>>(iter: T) -> Self {
        let mut map = Self::default();
        for (name, resource) in iter {
            map.insert(name, resource);
        }
        map
    }
}

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn assemble(fields: Option<&Map<String, Value>>, links: &LinkCollection, embedded: &EmbeddedMap) -> Value {
    let mut out = fields.cloned().unwrap_or_default();
    if !links.is_empty() {
        out.insert("_links".into(), Value::Object(links.rels()));
    }
    if !embedded.is_empty() {
        out.insert("_embedded".into(), embedded.to_mapping());
    }
    Value::Object(out)
}

fn check_reserved(fields: &Map<String, Value>) -> Result<(), TypeError> {
    match RESERVED_KEYS.iter().find(|k| fields.contains_key(**k)) {
        Some(key) => Err(TypeError::ReservedKey((*key).to_owned())),
        None => Ok(()),
    }
}

/// `_links`, a rel holding a list, and the link object.
const LINKS_DEPTH: usize = 3;

/// The resource object and its `_embedded` object around an entry.
const EMBEDDED_OVERHEAD: usize = 2;

/// JSON nesting of a value: 0 for scalars, 1 for `[]` or `{}`.
fn value_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(value_depth).max().unwrap_or(0),
        Value::Object(fields) => 1 + fields.values().map(value_depth).max().unwrap_or(0),
        _ => 0,
    }
}

/// Nesting of an object-shaped resource with the given fields and entries.
fn object_depth(fields: Option<&Map<String, Value>>, embedded: &EmbeddedMap) -> usize {
    let fields_depth = fields
        .into_iter()
        .flat_map(|f| f.values())
        .map(value_depth)
        .max()
        .unwrap_or(0);
    let embedded_depth = if embedded.is_empty() {
        0
    } else {
        EMBEDDED_OVERHEAD - 1 + embedded.depth()
    };
    1 + fields_depth.max(LINKS_DEPTH).max(embedded_depth)
}

fn check_depth(depth: usize) -> Result<(), TypeError> {
    if depth > MAX_DEPTH {
        return Err(TypeError::TooDeep(depth));
    }
    Ok(())
}

/// The three optional keys of a document description.
struct Description<'a> {
    data: Option<&'a Value>,
    links: Option<&'a Value>,
    embedded: Option<&'a Value>,
}

impl<'a> Description<'a> {
    fn read(value: &'a Value) -> Result<Self, TypeError> {
        let present = |key: &str| value.get(key).filter(|v| !v.is_null());
        match value {
            Value::Null => Ok(Self {
                data: None,
                links: None,
                embedded: None,
            }),
            Value::Object(map) => {
                for key in map.keys() {
                    if !matches!(key.as_str(), "data" | "links" | "embedded") {
                        tracing::trace!(%key, "ignoring unknown key in document description");
                    }
                }
                Ok(Self {
                    data: present("data"),
                    links: present("links"),
                    embedded: present("embedded"),
                })
            }
            other => Err(TypeError::NotADocument(format!(
                "expected an object with data, links and embedded, got {}",
                describe(other)
            ))),
        }
    }

    fn links(&self) -> Result<Option<LinkCollection>, TypeError> {
        self.links.map(LinkCollection::from_value).transpose()
    }

    fn embedded(&self) -> Result<Option<EmbeddedMap>, TypeError> {
        self.embedded.map(EmbeddedMap::from_value).transpose()
    }
}
