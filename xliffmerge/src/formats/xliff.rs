//! Support for XLIFF 1.2 documents.
//!
//! Parsing builds the order-preserving [`Document`] tree; nothing is
//! validated against the XLIFF schema. Serialization pretty-prints the
//! structural skeleton (`xliff`, `file`, `body`, `trans-unit`, ...) and
//! writes translatable content inline, untouched, so a re-read of the output
//! derives the same lookup keys as the input did.

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};

use crate::{
    error::Error,
    traits::{Parser, Serializer},
    types::{Declaration, Document, Element, Node, collect_mut, find_element, find_element_mut},
};

pub const XLIFF_TAG: &str = "xliff";
pub const FILE_TAG: &str = "file";
pub const BODY_TAG: &str = "body";
pub const UNIT_TAG: &str = "trans-unit";
pub const SOURCE_TAG: &str = "source";
pub const TARGET_TAG: &str = "target";
pub const PLACEHOLDER_TAG: &str = "x";

/// Elements whose children are translatable content and must be written verbatim.
const INLINE_TAGS: &[&str] = &["source", "target", "seg-source", "note", "mrk", "g"];

const INDENT: &str = "  ";

const OUTPUT_ENCODING: &str = "UTF-8";

impl Parser for Document {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut declaration = None;
        let mut top_level = Vec::new();
        let mut open: Vec<Element> = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Decl(ref decl)) => declaration = Some(parse_declaration(decl)?),
                Ok(Event::Start(ref e)) => open.push(parse_element(e)?),
                Ok(Event::Empty(ref e)) => {
                    let element = parse_element(e)?;
                    append(&mut open, &mut top_level, Node::Element(element));
                }
                Ok(Event::End(_)) => {
                    let element = open.pop().ok_or_else(|| {
                        Error::InvalidDocument("closing tag without a matching start".to_string())
                    })?;
                    append(&mut open, &mut top_level, Node::Element(element));
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(Error::XmlParse)?.into_owned();
                    append(&mut open, &mut top_level, Node::Text(text));
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    append(&mut open, &mut top_level, Node::CData(text));
                }
                Ok(Event::Comment(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    append(&mut open, &mut top_level, Node::Comment(text));
                }
                Ok(Event::Eof) => break,
                Ok(other) => append(&mut open, &mut top_level, Node::Other(other.into_owned())),
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }

        if let Some(unclosed) = open.last() {
            return Err(Error::InvalidDocument(format!(
                "unexpected end of document, <{}> is not closed",
                unclosed.name
            )));
        }

        top_level.retain(|node| !node.is_whitespace());
        Ok(Document {
            declaration,
            children: top_level,
        })
    }
}

impl Serializer for Document {
    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        if let Some(decl) = &self.declaration {
            // Output is always UTF-8, whatever the input was decoded from.
            let encoding = decl.encoding.as_ref().map(|_| OUTPUT_ENCODING);
            xml_writer.write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                encoding,
                decl.standalone.as_deref(),
            )))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        for node in self.children.iter().filter(|n| !n.is_whitespace()) {
            write_node(&mut xml_writer, node, Some(0))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }
        Ok(())
    }
}

impl Document {
    /// Every `trans-unit` of the document, following `xliff > file > body`
    /// for each `file` and descending into `group` elements.
    pub fn trans_units(&self) -> Result<Vec<&Element>, Error> {
        let xliff = find_element(&self.children, XLIFF_TAG).ok_or_else(missing(XLIFF_TAG))?;
        let mut units = Vec::new();
        let mut files = xliff.children_named(FILE_TAG).peekable();
        if files.peek().is_none() {
            return Err(missing(FILE_TAG)());
        }
        for file in files {
            let body = find_element(&file.children, BODY_TAG).ok_or_else(missing(BODY_TAG))?;
            units.extend(body.find_all(|el| el.is_named(UNIT_TAG)));
        }
        Ok(units)
    }

    /// Mutable variant of [`Document::trans_units`].
    pub fn trans_units_mut(&mut self) -> Result<Vec<&mut Element>, Error> {
        let xliff =
            find_element_mut(&mut self.children, XLIFF_TAG).ok_or_else(missing(XLIFF_TAG))?;
        let mut files = Vec::new();
        collect_mut(&mut xliff.children, &|el: &Element| el.is_named(FILE_TAG), &mut files);
        if files.is_empty() {
            return Err(missing(FILE_TAG)());
        }

        let mut units = Vec::new();
        for file in files {
            let body =
                find_element_mut(&mut file.children, BODY_TAG).ok_or_else(missing(BODY_TAG))?;
            collect_mut(&mut body.children, &|el: &Element| el.is_named(UNIT_TAG), &mut units);
        }
        Ok(units)
    }

    /// `target-language` attributes declared on the document's `file` elements.
    pub fn target_languages(&self) -> Vec<&str> {
        self.find_all(|el| el.is_named(FILE_TAG))
            .into_iter()
            .filter_map(|file| file.attribute("target-language"))
            .collect()
    }
}

/// Renders a single element on one line, for diagnostics.
pub fn render_element(element: &Element) -> String {
    let mut out = Vec::new();
    let mut xml_writer = Writer::new(&mut out);
    match write_element(&mut xml_writer, element, None) {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(e) => format!("<{} ...> ({})", element.name, e),
    }
}

/// Renders any node on one line, for diagnostics.
pub fn render_node(node: &Node) -> String {
    match node {
        Node::Element(el) => render_element(el),
        Node::Text(text) => format!("{:?}", text),
        Node::CData(text) => format!("<![CDATA[{}]]>", text),
        Node::Comment(text) => format!("<!--{}-->", text),
        Node::Other(event) => format!("{:?}", event),
    }
}

fn missing(tag: &'static str) -> impl Fn() -> Error {
    move || Error::InvalidDocument(format!("no <{}> element found", tag))
}

fn append(open: &mut [Element], top_level: &mut Vec<Node>, node: Node) {
    let siblings = match open.last_mut() {
        Some(parent) => &mut parent.children,
        None => top_level,
    };
    // Keep one text node per run so keys see the whole string.
    if let (Some(Node::Text(last)), Node::Text(text)) = (siblings.last_mut(), &node) {
        last.push_str(text);
        return;
    }
    siblings.push(node);
}

fn parse_element(e: &BytesStart) -> Result<Element, Error> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn parse_declaration(decl: &BytesDecl) -> Result<Declaration, Error> {
    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }
    let version = decl
        .version()
        .map_err(|e| Error::DataMismatch(e.to_string()))?;
    let encoding = decl
        .encoding()
        .transpose()
        .map_err(|e| Error::DataMismatch(e.to_string()))?;
    let standalone = decl
        .standalone()
        .transpose()
        .map_err(|e| Error::DataMismatch(e.to_string()))?;
    Ok(Declaration {
        version: text(&*version),
        encoding: encoding.map(|e| text(&*e)),
        standalone: standalone.map(|s| text(&*s)),
    })
}

/// Structural elements get one child per indented line. Anything holding
/// real text, an inline-content tag, or `xml:space="preserve"` is written
/// exactly as stored.
fn is_structural(element: &Element) -> bool {
    !INLINE_TAGS.contains(&element.local_name())
        && element.attribute("xml:space") != Some("preserve")
        && !element.children.iter().any(Node::has_significant_text)
}

fn write_node<W: Write>(
    xml_writer: &mut Writer<W>,
    node: &Node,
    depth: Option<usize>,
) -> Result<(), Error> {
    match node {
        Node::Element(el) => write_element(xml_writer, el, depth)?,
        Node::Text(text) => {
            xml_writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?
        }
        Node::CData(text) => xml_writer.write_event(Event::CData(BytesCData::new(text.as_str())))?,
        Node::Comment(text) => {
            xml_writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?
        }
        Node::Other(event) => xml_writer.write_event(event.clone())?,
    }
    Ok(())
}

fn write_element<W: Write>(
    xml_writer: &mut Writer<W>,
    element: &Element,
    depth: Option<usize>,
) -> Result<(), Error> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    match depth {
        Some(depth) if is_structural(element) => {
            let children: Vec<&Node> = element
                .children
                .iter()
                .filter(|n| !n.is_whitespace())
                .collect();
            if children.is_empty() {
                xml_writer.write_event(Event::Empty(start))?;
                return Ok(());
            }
            xml_writer.write_event(Event::Start(start))?;
            for child in children {
                write_indent(xml_writer, depth + 1)?;
                write_node(xml_writer, child, Some(depth + 1))?;
            }
            write_indent(xml_writer, depth)?;
        }
        _ => {
            if element.children.is_empty() {
                xml_writer.write_event(Event::Empty(start))?;
                return Ok(());
            }
            xml_writer.write_event(Event::Start(start))?;
            for child in &element.children {
                write_node(xml_writer, child, None)?;
            }
        }
    }

    xml_writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn write_indent<W: Write>(xml_writer: &mut Writer<W>, depth: usize) -> Result<(), Error> {
    let indent = format!("\n{}", INDENT.repeat(depth));
    xml_writer.write_event(Event::Text(BytesText::from_escaped(indent)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Parser, Serializer};

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file source-language="en" target-language="fr" datatype="plaintext" original="ng2.template">
    <body>
      <trans-unit id="s1" datatype="html">
        <source>Welcome, <x id="0" equiv-text="${name}"/>.</source>
      </trans-unit>
      <trans-unit id="s2">
        <source>Fish &amp; chips</source>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

    #[test]
    fn test_parse_keeps_declaration_and_root() {
        let doc = Document::from_str(SAMPLE).unwrap();
        let decl = doc.declaration.as_ref().unwrap();
        assert_eq!(decl.version, "1.0");
        assert_eq!(decl.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(doc.root().unwrap().name, "xliff");
        assert_eq!(doc.target_languages(), vec!["fr"]);
    }

    #[test]
    fn test_parse_preserves_inline_content() {
        let doc = Document::from_str(SAMPLE).unwrap();
        let units = doc.trans_units().unwrap();
        assert_eq!(units.len(), 2);
        let source = units[0].child(SOURCE_TAG).unwrap();
        assert_eq!(source.children.len(), 3);
        assert_eq!(source.children[0], Node::text("Welcome, "));
        let x = source.children[1].as_element().unwrap();
        assert_eq!(x.name, "x");
        assert!(x.children.is_empty());
        assert_eq!(
            x.attributes,
            vec![
                ("id".to_string(), "0".to_string()),
                ("equiv-text".to_string(), "${name}".to_string()),
            ]
        );
        assert_eq!(source.children[2], Node::text("."));
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let doc = Document::from_str(SAMPLE).unwrap();
        let units = doc.trans_units().unwrap();
        let source = units[1].child(SOURCE_TAG).unwrap();
        assert_eq!(source.children, vec![Node::text("Fish & chips")]);
    }

    #[test]
    fn test_parse_rejects_malformed_xml() {
        assert!(Document::from_str("<xliff><file></xliff>").is_err());
        assert!(Document::from_str("<xliff><file>").is_err());
    }

    #[test]
    fn test_trans_units_requires_skeleton() {
        let no_body = Document::from_str(r#"<xliff><file></file></xliff>"#).unwrap();
        let err = no_body.trans_units().unwrap_err();
        assert!(err.to_string().contains("<body>"));

        let no_file = Document::from_str(r#"<xliff></xliff>"#).unwrap();
        assert!(no_file.trans_units().unwrap_err().to_string().contains("<file>"));

        let no_xliff = Document::from_str(r#"<resources/>"#).unwrap();
        assert!(no_xliff.trans_units().unwrap_err().to_string().contains("<xliff>"));
    }

    #[test]
    fn test_trans_units_descend_into_groups_and_files() {
        let xml = r#"<xliff>
            <file><body>
                <group id="g"><trans-unit id="a"><source>A</source></trans-unit></group>
            </body></file>
            <file><body><trans-unit id="b"><source>B</source></trans-unit></body></file>
        </xliff>"#;
        let mut doc = Document::from_str(xml).unwrap();
        let ids: Vec<String> = doc
            .trans_units_mut()
            .unwrap()
            .into_iter()
            .map(|u| u.attribute("id").unwrap_or_default().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_serialize_indents_structure_and_keeps_inline_verbatim() {
        let doc = Document::from_str(SAMPLE).unwrap();
        let out = doc.to_string_pretty().unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xliff"));
        assert!(out.contains("\n    <body>\n      <trans-unit id=\"s1\" datatype=\"html\">\n"));
        assert!(out.contains(
            "<source>Welcome, <x id=\"0\" equiv-text=\"${name}\"/>.</source>"
        ));
        assert!(out.contains("<source>Fish &amp; chips</source>"));
    }

    #[test]
    fn test_serialize_declares_utf8() {
        let xml = r#"<?xml version="1.0" encoding="UTF-16" standalone="yes"?><xliff/>"#;
        let out = Document::from_str(xml).unwrap().to_string_pretty().unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<xliff/>\n"
        );

        let bare = r#"<?xml version="1.0"?><xliff/>"#;
        let out = Document::from_str(bare).unwrap().to_string_pretty().unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\"?>\n"));
    }

    #[test]
    fn test_serialize_round_trip_is_stable() {
        let doc = Document::from_str(SAMPLE).unwrap();
        let first = doc.to_string_pretty().unwrap();
        let reparsed = Document::from_str(&first).unwrap();
        let second = reparsed.to_string_pretty().unwrap();
        assert_eq!(first, second);
        assert_eq!(
            doc.trans_units().unwrap()[0].child(SOURCE_TAG),
            reparsed.trans_units().unwrap()[0].child(SOURCE_TAG)
        );
    }

    #[test]
    fn test_serialize_keeps_whitespace_between_placeholders() {
        let xml = r#"<xliff><file><body><trans-unit id="a"><source><x id="0"/> <x id="1"/></source></trans-unit></body></file></xliff>"#;
        let out = Document::from_str(xml).unwrap().to_string_pretty().unwrap();
        assert!(out.contains(r#"<source><x id="0"/> <x id="1"/></source>"#));
    }

    #[test]
    fn test_comments_and_cdata_survive() {
        let xml = r#"<xliff><!-- generated --><file><body><trans-unit id="a"><source><![CDATA[1 < 2]]></source></trans-unit></body></file></xliff>"#;
        let doc = Document::from_str(xml).unwrap();
        let out = doc.to_string_pretty().unwrap();
        assert!(out.contains("<!-- generated -->"));
        assert!(out.contains("<![CDATA[1 < 2]]>"));
    }

    #[test]
    fn test_render_element_is_single_line() {
        let el = Element::new("source")
            .with_child(Node::text("Hi "))
            .with_child(Element::new("x").with_attribute("id", "0"));
        assert_eq!(render_element(&el), r#"<source>Hi <x id="0"/></source>"#);
    }
}
