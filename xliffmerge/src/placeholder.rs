//! Canonical lookup keys and placeholder lookup for XLIFF `source` content.
//!
//! A key is the `source` text with every `<x>` placeholder replaced by
//! `{id}`, whitespace-collapsed. That is exactly how the upstream extraction
//! wrote `msgid`s, so the key can be looked up in a PO catalog directly.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::Error,
    formats::xliff::{PLACEHOLDER_TAG, render_element, render_node},
    types::{Element, Node},
};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref EQUIV_TEXT_NOISE: Regex = Regex::new(r"[\s${}]").unwrap();
}

/// Collapses every whitespace run (newlines included) to one space and trims.
pub fn normalize_whitespace(input: &str) -> String {
    WHITESPACE_RUN.replace_all(input, " ").trim().to_string()
}

/// Strips `$`, `{`, `}` and whitespace, so `${ user.name }` becomes `user.name`.
pub fn normalize_equiv_text(input: &str) -> String {
    EQUIV_TEXT_NOISE.replace_all(input, "").into_owned()
}

/// Derives the canonical lookup key of a `source` node sequence.
///
/// Text and CDATA are taken literally, each `<x>` contributes `{id}` with
/// the id taken from its attribute (not its position). Any other node is a
/// hard error: an unknown construct must not silently produce a wrong key.
///
/// # Example
/// ```rust
/// use xliffmerge::placeholder::derive_key;
/// use xliffmerge::types::{Element, Node};
///
/// let source = vec![
///     Node::text("Welcome, "),
///     Node::Element(Element::new("x").with_attribute("id", "0").with_attribute("equiv-text", "${name}")),
///     Node::text(".\n  "),
/// ];
/// assert_eq!(derive_key(&source).unwrap(), "Welcome, {0}.");
/// ```
pub fn derive_key(source: &[Node]) -> Result<String, Error> {
    let mut key = String::new();
    for node in source {
        match node {
            Node::Text(text) | Node::CData(text) => key.push_str(text),
            Node::Element(el) if el.is_named(PLACEHOLDER_TAG) => {
                key.push('{');
                key.push_str(placeholder_id(el)?);
                key.push('}');
            }
            other => return Err(Error::UnrecognizedNode(render_node(other))),
        }
    }
    Ok(normalize_whitespace(&key))
}

fn placeholder_id(el: &Element) -> Result<&str, Error> {
    if !el.has_attributes() {
        return Err(Error::MissingAttributes(render_element(el)));
    }
    el.attribute("id").ok_or_else(|| {
        Error::InvalidDocument(format!("placeholder without an id: {}", render_element(el)))
    })
}

/// Placeholders of one `source`, reachable by `id` and by normalized
/// `equiv-text`. Built per translation unit, never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderIndex {
    entries: HashMap<String, Element>,
}

impl PlaceholderIndex {
    /// Registers every `<x>` of `source` under both of its keys. When two
    /// placeholders claim the same key, the later one wins.
    pub fn build(source: &[Node]) -> Result<Self, Error> {
        let mut entries = HashMap::new();
        for el in source
            .iter()
            .filter_map(Node::as_element)
            .filter(|el| el.is_named(PLACEHOLDER_TAG))
        {
            let id = placeholder_id(el)?;
            entries.insert(id.to_string(), el.clone());
            if let Some(equiv) = el.attribute("equiv-text") {
                let equiv = normalize_equiv_text(equiv);
                if !equiv.is_empty() {
                    entries.insert(equiv, el.clone());
                }
            }
        }
        Ok(PlaceholderIndex { entries })
    }

    pub fn get(&self, key: &str) -> Option<&Element> {
        self.entries.get(key)
    }

    /// All registered keys, sorted, for diagnostics.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x(id: &str, equiv: &str) -> Node {
        Node::Element(
            Element::new("x")
                .with_attribute("id", id)
                .with_attribute("equiv-text", equiv),
        )
    }

    #[test]
    fn test_key_substitutes_placeholders_and_collapses_whitespace() {
        let source = vec![Node::text("Welcome, "), x("0", "${name}"), Node::text(".\n  ")];
        assert_eq!(derive_key(&source).unwrap(), "Welcome, {0}.");
    }

    #[test]
    fn test_key_uses_id_not_position() {
        let source = vec![x("1", "${b}"), Node::text(" then "), x("0", "${a}")];
        assert_eq!(derive_key(&source).unwrap(), "{1} then {0}");
    }

    #[test]
    fn test_key_of_multiline_source() {
        let source = vec![Node::text("\n   Select an\n   application\n ")];
        assert_eq!(derive_key(&source).unwrap(), "Select an application");
    }

    #[test]
    fn test_key_treats_cdata_as_text() {
        let source = vec![Node::text("a "), Node::CData("< b".to_string())];
        assert_eq!(derive_key(&source).unwrap(), "a < b");
    }

    #[test]
    fn test_key_rejects_unknown_elements() {
        let source = vec![Node::Element(Element::new("g").with_attribute("id", "1"))];
        let err = derive_key(&source).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedNode(_)));
        assert!(err.to_string().contains("<g id=\"1\"/>"));
    }

    #[test]
    fn test_key_rejects_comments() {
        let source = vec![Node::text("a"), Node::Comment("note".to_string())];
        assert!(matches!(
            derive_key(&source),
            Err(Error::UnrecognizedNode(_))
        ));
    }

    #[test]
    fn test_key_rejects_bare_placeholder() {
        let source = vec![Node::Element(Element::new("x"))];
        assert!(matches!(
            derive_key(&source),
            Err(Error::MissingAttributes(_))
        ));
    }

    #[test]
    fn test_normalize_equiv_text() {
        assert_eq!(normalize_equiv_text("${name}"), "name");
        assert_eq!(normalize_equiv_text("${ this.user.username }"), "this.user.username");
        assert_eq!(normalize_equiv_text("{ago}"), "ago");
    }

    #[test]
    fn test_index_registers_id_and_equiv_text() {
        let source = vec![Node::text("Hi "), x("0", "${name}"), x("1", "${ count }")];
        let index = PlaceholderIndex::build(&source).unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(index.get("0"), index.get("name"));
        assert_eq!(index.get("1").and_then(|el| el.attribute("id")), Some("1"));
        assert_eq!(index.get("count").and_then(|el| el.attribute("id")), Some("1"));
        assert_eq!(index.keys(), vec!["0", "1", "count", "name"]);
    }

    #[test]
    fn test_index_without_equiv_text() {
        let source = vec![Node::Element(Element::new("x").with_attribute("id", "3"))];
        let index = PlaceholderIndex::build(&source).unwrap();
        assert_eq!(index.keys(), vec!["3"]);
    }

    #[test]
    fn test_index_rejects_placeholder_without_attributes() {
        let source = vec![Node::text("Hi "), Node::Element(Element::new("x"))];
        let err = PlaceholderIndex::build(&source).unwrap_err();
        assert!(err.to_string().contains("X with no attributes?"));
    }

    #[test]
    fn test_index_of_plain_text_is_empty() {
        let index = PlaceholderIndex::build(&[Node::text("plain")]).unwrap();
        assert!(index.is_empty());
    }
}
