//! Order-preserving XML tree shared by every stage of the merge.
//!
//! Translation markup interleaves literal text with inline placeholder
//! elements, so the tree keeps sibling order, attribute order and
//! self-closing elements exactly as they were read.

use quick_xml::events::Event;

/// A single node in an XML document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with its attributes and children.
    Element(Element),
    /// Unescaped character data.
    Text(String),
    /// Content of a `<![CDATA[...]]>` section.
    CData(String),
    /// Raw comment content, without the `<!--`/`-->` delimiters.
    Comment(String),
    /// Processing instructions and doctype declarations, passed through verbatim.
    Other(Event<'static>),
}

impl Node {
    /// Creates a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// True for text nodes made only of whitespace.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }

    /// True for text or CDATA nodes carrying anything but whitespace.
    pub fn has_significant_text(&self) -> bool {
        matches!(self, Node::Text(t) | Node::CData(t) if !t.trim().is_empty())
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

/// An XML element. Attribute values are stored unescaped, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

// Text and event payloads are plain bytes, so equality is total.
impl Eq for Node {}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter; appends, keeping declaration order.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder-style child setter.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// The element name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Matches on the local name, so `xliff:source` and `source` are the same tag.
    pub fn is_named(&self, name: &str) -> bool {
        self.local_name() == name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Iterates over the element children, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First direct child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.is_named(name))
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.is_named(name))
    }

    /// All descendant elements matching `predicate`, in document order.
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut out = Vec::new();
        collect(&self.children, &predicate, &mut out);
        out
    }
}

/// An XML document: optional declaration plus top-level nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub declaration: Option<Declaration>,
    pub children: Vec<Node>,
}

impl Document {
    /// The first top-level element.
    pub fn root(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }

    /// Depth-first search for the first element named `name`.
    pub fn find(&self, name: &str) -> Option<&Element> {
        find_element(&self.children, name)
    }

    /// All elements matching `predicate`, in document order.
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut out = Vec::new();
        collect(&self.children, &predicate, &mut out);
        out
    }
}

/// The `<?xml ...?>` declaration of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for Declaration {
    fn default() -> Self {
        Declaration {
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
            standalone: None,
        }
    }
}

pub(crate) fn find_element<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(el) = node {
            if el.is_named(name) {
                return Some(el);
            }
            if let Some(found) = find_element(&el.children, name) {
                return Some(found);
            }
        }
    }
    None
}

pub(crate) fn find_element_mut<'a>(nodes: &'a mut [Node], name: &str) -> Option<&'a mut Element> {
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            if el.is_named(name) {
                return Some(el);
            }
            if let Some(found) = find_element_mut(&mut el.children, name) {
                return Some(found);
            }
        }
    }
    None
}

fn collect<'a, F>(nodes: &'a [Node], predicate: &F, out: &mut Vec<&'a Element>)
where
    F: Fn(&Element) -> bool,
{
    for el in nodes.iter().filter_map(Node::as_element) {
        if predicate(el) {
            out.push(el);
        }
        collect(&el.children, predicate, out);
    }
}

/// Mutable counterpart of `collect`. A matching element is returned whole,
/// its descendants are not searched.
pub(crate) fn collect_mut<'a, F>(
    nodes: &'a mut [Node],
    predicate: &F,
    out: &mut Vec<&'a mut Element>,
) where
    F: Fn(&Element) -> bool,
{
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            if predicate(&*el) {
                out.push(el);
            } else {
                collect_mut(&mut el.children, predicate, out);
            }
        }
    }
}
