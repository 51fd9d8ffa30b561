//! The single error kind raised while building HAL documents.

use thiserror::Error;

/// A contract violation detected while constructing or mutating a HAL value.
///
/// Every check is eager: the offending value is rejected before anything is
/// built, so a constructed [`Document`](crate::Document) always serializes.
#[derive(Debug, Error, PartialEq)]
pub enum TypeError {
    #[error("expected a link with a non-empty rel and a string href, got: {0}")]
    NotALink(String),

    #[error("link attribute {name:?} must be a {expected}, got: {found}")]
    InvalidAttribute {
        name: String,
        expected: &'static str,
        found: String,
    },

    #[error("links must be a LinkCollection or an array of links, got: {0}")]
    NotALinkCollection(String),

    #[error("embedded must be a mapping of name to document, got: {0}")]
    EmbeddedNotMapping(String),

    #[error("invalid document: {0}")]
    NotADocument(String),

    #[error("data key {0:?} is reserved for HAL and cannot be used as a field")]
    ReservedKey(String),

    #[error("document would serialize {0} levels deep; the limit is {max}", max = crate::MAX_DEPTH)]
    TooDeep(usize),
}

/// Short, single-line rendering of a JSON value for error messages.
pub(crate) fn describe(value: &serde_json::Value) -> String {
    const LIMIT: usize = 80;
    let text = value.to_string();
    if text.len() <= LIMIT {
        return text;
    }
    let mut cut = LIMIT;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &text[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn describe_keeps_short_values() {
        assert_eq!(describe(&json!(["details"])), r#"["details"]"#);
    }

    #[test]
    fn describe_truncates_long_values() {
        let long = json!("x".repeat(200));
        let out = describe(&long);
        assert!(out.ends_with('…'));
        assert!(out.len() < 100);
    }

    #[test]
    fn attribute_message_names_attribute() {
        let msg = TypeError::InvalidAttribute {
            name: "templated".into(),
            expected: "boolean",
            found: "\"yes\"".into(),
        }
        .to_string();
        assert_eq!(msg, r#"link attribute "templated" must be a boolean, got: "yes""#);
    }

    #[test]
    fn too_deep_message_names_limit() {
        let msg = TypeError::TooDeep(200).to_string();
        assert!(msg.contains("200"));
        assert!(msg.contains(&crate::MAX_DEPTH.to_string()));
    }
}
