//! Builds `<target>` content from a translated PO string.
//!
//! The translation is cut at `{token}` boundaries. Literal runs become text
//! nodes; each token is swapped for a copy of the `source` placeholder it
//! names, so inline markup survives the text round trip with its attributes
//! intact.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::Error,
    formats::xliff::{TARGET_TAG, render_element},
    placeholder::PlaceholderIndex,
    types::{Element, Node},
};

lazy_static! {
    /// `{identifier}` with ASCII word characters, as upstream extraction writes them.
    static ref TOKEN_REGEX: Regex = Regex::new(r"\{[A-Za-z0-9_]+\}").unwrap();
}

/// One piece of a translated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text between tokens.
    Text(&'a str),
    /// A token key, braces stripped.
    Token(&'a str),
}

/// Splits `translation` into alternating literal and token segments.
/// Empty literal runs (between adjacent tokens, or at either end) are dropped.
///
/// ```rust
/// use xliffmerge::converter::{Segment, split_tokens};
/// assert_eq!(
///     split_tokens("il y a {0} jour(s)"),
///     vec![Segment::Text("il y a "), Segment::Token("0"), Segment::Text(" jour(s)")]
/// );
/// ```
pub fn split_tokens(translation: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;
    for token in TOKEN_REGEX.find_iter(translation) {
        if token.start() > last {
            segments.push(Segment::Text(&translation[last..token.start()]));
        }
        let raw = token.as_str();
        segments.push(Segment::Token(&raw[1..raw.len() - 1]));
        last = token.end();
    }
    if last < translation.len() {
        segments.push(Segment::Text(&translation[last..]));
    }
    segments
}

/// Produces the `<target>` element for `translation`.
///
/// `index` must come from the unit's original `source`, which is also
/// quoted in the error when a token names no known placeholder. There is no
/// partial result: either every token resolves or the whole call fails.
pub fn synthesize_target(
    translation: &str,
    index: &PlaceholderIndex,
    source: &Element,
) -> Result<Element, Error> {
    let children = split_tokens(translation)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => Ok(Node::text(text)),
            Segment::Token(key) => index
                .get(key)
                .cloned()
                .map(Node::Element)
                .ok_or_else(|| Error::UnresolvedPlaceholder {
                    key: key.to_string(),
                    node: render_element(source),
                    known: index.keys(),
                }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Element {
        name: TARGET_TAG.to_string(),
        attributes: Vec::new(),
        children,
    })
}
