//! Ordered link lists and their canonical `_links` form.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{describe, TypeError};
use crate::link::Link;

/// An append-only, ordered list of [`Link`]s.
///
/// Several links may share a rel. [`LinkCollection::to_mapping`] folds them
/// under one key: a single link stays an object, a repeated rel becomes an
/// array in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCollection {
    links: Vec<Link>,
}

impl LinkCollection {
    /// Build a collection, rejecting the first link that breaks the link
    /// contract.
    pub fn new(links: impl IntoIterator<Item = Link>) -> Result<Self, TypeError> {
        let mut collection = Self::default();
        for link in links {
            collection.append(link)?;
        }
        Ok(collection)
    }

    /// Build a collection from a JSON array of link objects.
    ///
    /// A lone link object is not accepted: callers must wrap it in an array.
    pub fn from_value(value: &Value) -> Result<Self, TypeError> {
        let Value::Array(items) = value else {
            return Err(TypeError::NotALinkCollection(describe(value)));
        };
        let links = items.iter().map(Link::from_value).collect::<Result<Vec<_>, _>>()?;
        Self::new(links)
    }

    /// Add a link at the end.
    pub fn append(&mut self, link: Link) -> Result<(), TypeError> {
        link.check()?;
        self.links.push(link);
        Ok(())
    }

    /// Push a link already known to satisfy the contract.
    pub(crate) fn push(&mut self, link: Link) {
        debug_assert!(link.check().is_ok());
        self.links.push(link);
    }

    pub fn get(&self, index: usize) -> Option<&Link> {
        self.links.get(index)
    }

    /// Mutable access for editing a link's attributes in place.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Link> {
        self.links.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }

    /// All links with the given rel, in insertion order.
    pub fn by_rel<'a>(&'a self, rel: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.rel() == rel)
    }

    /// The rel-keyed body that goes under `_links`.
    pub(crate) fn rels(&self) -> Map<String, Value> {
        let mut rels = Map::new();
        for link in &self.links {
            let body = link.body();
            match rels.get_mut(link.rel()) {
                None => {
                    rels.insert(link.rel().to_owned(), body);
                }
                Some(Value::Array(seen)) => seen.push(body),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, body]);
                }
            }
        }
        rels
    }

    /// `{"_links": {rel: {...} | [{...}, ...], ...}}`.
    pub fn to_mapping(&self) -> Value {
        let mut out = Map::new();
        out.insert("_links".into(), Value::Object(self.rels()));
        Value::Object(out)
    }
}

impl TryFrom<Vec<Link>> for LinkCollection {
    type Error = TypeError;

    fn try_from(links: Vec<Link>) -> Result<Self, Self::Error> {
        Self::new(links)
    }
}

impl IntoIterator for LinkCollection {
    type Item = Link;
    type IntoIter = std::vec::IntoIter<Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

impl<'a> IntoIterator for &'a LinkCollection {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

impl std::ops::Index<usize> for LinkCollection {
    type Output = Link;

    fn index(&self, index: usize) -> &Link {
        &self.links[index]
    }
}

impl Serialize for LinkCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_mapping().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(links: Vec<Link>) -> LinkCollection {
        LinkCollection::new(links).unwrap()
    }

    #[test]
    fn distinct_rels_stay_objects() {
        let c = collection(vec![Link::new("foo", "/a"), Link::new("bar", "/b")]);
        assert_eq!(
            c.to_mapping(),
            json!({ "_links": { "foo": { "href": "/a" }, "bar": { "href": "/b" } } })
        );
    }

    #[test]
    fn second_occurrence_promotes_to_list() {
        let c = collection(vec![Link::new("foo", "/a"), Link::new("foo", "/b")]);
        assert_eq!(
            c.to_mapping(),
            json!({ "_links": { "foo": [{ "href": "/a" }, { "href": "/b" }] } })
        );
    }

    #[test]
    fn later_occurrences_append() {
        let c = collection(vec![
            Link::new("item", "/1"),
            Link::new("up", "/"),
            Link::new("item", "/2"),
            Link::new("item", "/3"),
        ]);
        assert_eq!(
            c.to_mapping(),
            json!({ "_links": {
                "item": [{ "href": "/1" }, { "href": "/2" }, { "href": "/3" }],
                "up": { "href": "/" }
            } })
        );
        assert_eq!(c.to_mapping().to_string().find("item"), Some(12));
    }

    #[test]
    fn empty_collection_maps_to_empty_links() {
        assert_eq!(LinkCollection::default().to_mapping(), json!({ "_links": {} }));
    }

    #[test]
    fn empty_rel_rejected_on_new_and_append() {
        let err = LinkCollection::new(vec![Link::new("", "/nowhere")]).unwrap_err();
        assert!(matches!(err, TypeError::NotALink(ref m) if m.contains("/nowhere")));

        let mut c = LinkCollection::default();
        assert!(c.append(Link::new("", "/x")).is_err());
        assert!(c.is_empty());
    }

    #[test]
    fn append_preserves_order_and_indexing() {
        let mut c = LinkCollection::default();
        c.append(Link::new("a", "/a")).unwrap();
        c.append(Link::new("b", "/b")).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].rel(), "a");
        assert_eq!(c.get(1).map(Link::href), Some("/b"));
        assert!(c.get(2).is_none());
        let rels: Vec<&str> = c.iter().map(Link::rel).collect();
        assert_eq!(rels, ["a", "b"]);
    }

    #[test]
    fn attributes_edited_in_place_are_serialized() {
        let mut c = collection(vec![Link::new("next", "/2")]);
        c.get_mut(0).unwrap().attributes_mut().title = Some("Next".into());
        assert_eq!(
            c.to_mapping(),
            json!({ "_links": { "next": { "href": "/2", "title": "Next" } } })
        );
    }

    #[test]
    fn from_value_requires_array() {
        let c = LinkCollection::from_value(&json!([{ "rel": "foo", "href": "/x" }])).unwrap();
        assert_eq!(c.len(), 1);

        let err = LinkCollection::from_value(&json!({ "rel": "foo", "href": "/x" })).unwrap_err();
        assert!(matches!(err, TypeError::NotALinkCollection(_)));

        let err = LinkCollection::from_value(&json!([1])).unwrap_err();
        assert!(matches!(err, TypeError::NotALink(_)));
    }

    #[test]
    fn vec_coerces_into_collection() {
        let c: LinkCollection = vec![Link::new("foo", "www.foo.com")].try_into().unwrap();
        assert_eq!(c.by_rel("foo").count(), 1);
    }
}
