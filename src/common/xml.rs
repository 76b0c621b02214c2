//! Lossless XML element tree.
//!
//! Parts are parsed with quick-xml into owned [`XmlElement`]s so that content
//! the typed document model does not understand survives a load/save round
//! trip. Text nodes keep their escaped form; attribute values are stored
//! unescaped and re-escaped on output.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;

/// Escape XML special characters.
pub(crate) fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Character data, still escaped
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Whether this is a text node holding only whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, XmlNode::Text(t) if t.trim().is_empty())
    }

    pub(crate) fn to_xml(&self, xml: &mut String) {
        match self {
            XmlNode::Element(e) => e.to_xml(xml),
            XmlNode::Text(t) => xml.push_str(t),
            XmlNode::CData(t) => {
                xml.push_str("<![CDATA[");
                xml.push_str(t);
                xml.push_str("]]>");
            },
            XmlNode::Comment(t) => {
                xml.push_str("<!--");
                xml.push_str(t);
                xml.push_str("-->");
            },
            XmlNode::ProcessingInstruction(t) => {
                xml.push_str("<?");
                xml.push_str(t);
                xml.push_str("?>");
            },
        }
    }
}

/// An XML element with qualified name, attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified name as written, e.g. `w:p`
    pub name: String,
    /// Attributes in document order, values unescaped
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(idx).1)
    }

    /// Iterate over element children.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(XmlNode::as_element_mut)
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// Number of direct children with the given name.
    pub fn count_children(&self, name: &str) -> usize {
        self.elements().filter(|e| e.name == name).count()
    }

    /// Remove every direct child with the given name, returning how many went.
    pub fn remove_children(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|n| !matches!(n, XmlNode::Element(e) if e.name == name));
        before - self.children.len()
    }

    /// Insert or replace a child, keeping schema order.
    ///
    /// All existing children named like `child` are removed and the new one
    /// takes the slot of the first of them. Without an existing child it goes
    /// before the first sibling that `rank` places after it. Names `rank` does
    /// not know are passed over. Returns the child's index.
    pub fn set_child_ordered(&mut self, child: XmlElement, rank: fn(&str) -> Option<u8>) -> usize {
        let name = child.name.clone();
        if let Some(slot) = self
            .children
            .iter()
            .position(|n| matches!(n, XmlNode::Element(e) if e.name == name))
        {
            self.children[slot] = XmlNode::Element(child);
            let mut idx = 0;
            self.children.retain(|n| {
                let keep = idx <= slot || !matches!(n, XmlNode::Element(e) if e.name == name);
                idx += 1;
                keep
            });
            return slot;
        }

        let own_rank = rank(&name);
        let insert_at = own_rank.and_then(|own| {
            self.children.iter().position(|n| {
                n.as_element()
                    .and_then(|e| rank(&e.name))
                    .is_some_and(|r| r > own)
            })
        });

        match insert_at {
            Some(idx) => {
                self.children.insert(idx, XmlNode::Element(child));
                idx
            },
            None => {
                self.children.push(XmlNode::Element(child));
                self.children.len() - 1
            },
        }
    }

    /// Get a child for modification, creating it in schema order if absent.
    pub fn child_or_insert(&mut self, name: &str, rank: fn(&str) -> Option<u8>) -> &mut XmlElement {
        let idx = match self
            .children
            .iter()
            .position(|n| matches!(n, XmlNode::Element(e) if e.name == name))
        {
            Some(idx) => idx,
            None => self.set_child_ordered(XmlElement::new(name), rank),
        };
        match &mut self.children[idx] {
            XmlNode::Element(e) => e,
            _ => unreachable!(),
        }
    }

    /// Concatenated unescaped text of every descendant named `text_name`.
    pub fn descendant_text(&self, text_name: &str) -> String {
        let mut out = String::new();
        self.collect_text(text_name, &mut out);
        out
    }

    fn collect_text(&self, text_name: &str, out: &mut String) {
        for node in &self.children {
            if let XmlNode::Element(e) = node {
                if e.name == text_name {
                    out.push_str(&e.text());
                } else {
                    e.collect_text(text_name, out);
                }
            }
        }
    }

    /// Unescaped text content of the direct text and CDATA children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(raw) => match quick_xml::escape::unescape(raw) {
                    Ok(text) => out.push_str(&text),
                    Err(_) => out.push_str(raw),
                },
                XmlNode::CData(t) => out.push_str(t),
                _ => {},
            }
        }
        out
    }

    /// Replace all children with a single escaped text node.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(XmlNode::Text(escape_xml(text).into_owned()));
        }
    }

    pub(crate) fn write_start(&self, xml: &mut String, empty: bool) {
        xml.push('<');
        xml.push_str(&self.name);
        for (k, v) in &self.attributes {
            xml.push(' ');
            xml.push_str(k);
            xml.push_str("=\"");
            xml.push_str(&escape_xml(v));
            xml.push('"');
        }
        xml.push_str(if empty { "/>" } else { ">" });
    }

    pub(crate) fn write_end(&self, xml: &mut String) {
        xml.push_str("</");
        xml.push_str(&self.name);
        xml.push('>');
    }

    pub fn to_xml(&self, xml: &mut String) {
        if self.children.is_empty() {
            self.write_start(xml, true);
            return;
        }
        self.write_start(xml, false);
        for child in &self.children {
            child.to_xml(xml);
        }
        self.write_end(xml);
    }

    pub fn to_xml_string(&self) -> String {
        let mut xml = String::new();
        self.to_xml(&mut xml);
        xml
    }
}

/// A parsed XML part: optional declaration plus root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// Declaration content between `<?` and `?>`
    pub declaration: Option<String>,
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut declaration = None;
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Decl(d) => {
                    declaration = Some(std::str::from_utf8(&d)?.to_string());
                },
                Event::Start(e) => {
                    stack.push(start_element(&e)?);
                },
                Event::Empty(e) => {
                    let element = start_element(&e)?;
                    attach(&mut stack, &mut root, XmlNode::Element(element))?;
                },
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("Unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, XmlNode::Element(element))?;
                },
                Event::Text(t) => {
                    if let Some(parent) = stack.last_mut() {
                        push_text(parent, std::str::from_utf8(&t)?);
                    }
                },
                Event::GeneralRef(r) => {
                    if let Some(parent) = stack.last_mut() {
                        let name = std::str::from_utf8(&r)?;
                        push_text(parent, &format!("&{};", name));
                    }
                },
                Event::CData(t) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = std::str::from_utf8(&t)?.to_string();
                        parent.children.push(XmlNode::CData(text));
                    }
                },
                Event::Comment(t) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = std::str::from_utf8(&t)?.to_string();
                        parent.children.push(XmlNode::Comment(text));
                    }
                },
                Event::PI(t) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = std::str::from_utf8(&t)?.to_string();
                        parent.children.push(XmlNode::ProcessingInstruction(text));
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::Xml(format!("Unclosed element <{}>", stack[0].name)));
        }
        let root = root.ok_or_else(|| Error::Xml("Document has no root element".to_string()))?;
        Ok(Self { declaration, root })
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(4096);
        if let Some(ref decl) = self.declaration {
            xml.push_str("<?");
            xml.push_str(decl);
            xml.push_str("?>\n");
        }
        self.root.to_xml(&mut xml);
        xml
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut element = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, node: XmlNode) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => match node {
            XmlNode::Element(e) if root.is_none() => *root = Some(e),
            _ => return Err(Error::Xml("Multiple root elements".to_string())),
        },
    }
    Ok(())
}

fn push_text(parent: &mut XmlElement, raw: &str) {
    if let Some(XmlNode::Text(existing)) = parent.children.last_mut() {
        existing.push_str(raw);
    } else {
        parent.children.push(XmlNode::Text(raw.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(name: &str) -> Option<u8> {
        match name {
            "a" => Some(0),
            "b" => Some(1),
            "c" => Some(2),
            _ => None,
        }
    }

    #[test]
    fn test_parse_and_write_back() {
        let src = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<root xmlns:w="urn:w"><w:p w:rsid="00A1"><w:t xml:space="preserve">a &amp; b </w:t></w:p><!-- note --><w:br/></root>"#;
        let doc = XmlDocument::parse(src.as_bytes()).unwrap();
        assert_eq!(
            doc.declaration.as_deref(),
            Some(r#"xml version="1.0" encoding="UTF-8" standalone="yes""#)
        );
        assert_eq!(doc.root.name, "root");
        let p = doc.root.child("w:p").unwrap();
        assert_eq!(p.attr("w:rsid"), Some("00A1"));
        assert_eq!(p.child("w:t").unwrap().text(), "a & b ");

        let out = doc.to_xml();
        assert!(out.contains("<w:t xml:space=\"preserve\">a &amp; b </w:t>"));
        assert!(out.contains("<!-- note -->"));
        assert!(out.contains("<w:br/>"));
    }

    #[test]
    fn test_attribute_escaping_round_trip() {
        let doc = XmlDocument::parse(br#"<r v="&quot;x&quot; &lt; y"/>"#).unwrap();
        assert_eq!(doc.root.attr("v"), Some("\"x\" < y"));
        assert_eq!(doc.to_xml(), r#"<r v="&quot;x&quot; &lt; y"/>"#);
    }

    #[test]
    fn test_descendant_text() {
        let doc =
            XmlDocument::parse(b"<h><r><t>Click</t></r><r><t> here</t></r><d><t>!</t></d></h>")
                .unwrap();
        assert_eq!(doc.root.descendant_text("t"), "Click here!");
    }

    #[test]
    fn test_set_child_ordered_inserts_by_rank() {
        let mut parent = XmlElement::new("p")
            .with_child(XmlElement::new("a"))
            .with_child(XmlElement::new("x"))
            .with_child(XmlElement::new("c"));
        parent.set_child_ordered(XmlElement::new("b"), rank);
        let names: Vec<_> = parent.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "x", "b", "c"]);
    }

    #[test]
    fn test_set_child_ordered_replaces_duplicates() {
        let mut parent = XmlElement::new("p")
            .with_child(XmlElement::new("b").with_attr("n", "1"))
            .with_child(XmlElement::new("c"))
            .with_child(XmlElement::new("b").with_attr("n", "2"));
        parent.set_child_ordered(XmlElement::new("b").with_attr("n", "3"), rank);
        assert_eq!(parent.count_children("b"), 1);
        assert_eq!(parent.child("b").unwrap().attr("n"), Some("3"));
        let names: Vec<_> = parent.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn test_malformed_input() {
        assert!(XmlDocument::parse(b"<a><b></a>").is_err());
        assert!(XmlDocument::parse(b"").is_err());
    }
}
