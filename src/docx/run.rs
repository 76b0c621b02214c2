/// Run types and implementation for DOCX documents.
use crate::common::unit::Length;
use crate::common::xml::{XmlElement, XmlNode, escape_xml};
use smallvec::SmallVec;

use super::format::{on_off, rpr_rank};

/// Kind of a `w:br` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakKind {
    Page,
    Column,
    /// Text-wrapping break, the default when `w:type` is absent
    Line,
    Other(String),
}

impl BreakKind {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            None | Some("textWrapping") => Self::Line,
            Some("page") => Self::Page,
            Some("column") => Self::Column,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    fn as_attr(&self) -> Option<&str> {
        match self {
            Self::Line => None,
            Self::Page => Some("page"),
            Self::Column => Some("column"),
            Self::Other(s) => Some(s),
        }
    }
}

/// A break marker attached to a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Break {
    pub kind: BreakKind,
    /// Attributes other than `w:type`, e.g. `w:clear`
    attributes: Vec<(String, String)>,
}

impl Break {
    pub fn new(kind: BreakKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
        }
    }

    fn from_element(mut element: XmlElement) -> Self {
        let kind = BreakKind::from_attr(element.attr("w:type"));
        element.remove_attr("w:type");
        Self {
            kind,
            attributes: element.attributes,
        }
    }

    fn to_element(&self) -> XmlElement {
        let mut element = XmlElement::new("w:br");
        if let Some(kind) = self.kind.as_attr() {
            element.set_attr("w:type", kind);
        }
        element.attributes.extend(self.attributes.iter().cloned());
        element
    }
}

/// Run content item.
#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    /// `w:t` text, unescaped
    Text {
        text: String,
        attributes: Vec<(String, String)>,
    },
    /// Tab character
    Tab,
    /// `w:br`
    Break(Break),
    /// `w:cr`
    CarriageReturn,
    /// Drawings, fields, symbols and anything else kept as is
    Other(XmlNode),
}

/// A run: character formatting plus content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    attributes: Vec<(String, String)>,
    /// `w:rPr`
    properties: Option<XmlElement>,
    content: SmallVec<[RunContent; 2]>,
}

impl Run {
    pub fn new() -> Self {
        Self::default()
    }

    /// A run holding `text`.
    pub fn with_text(text: &str) -> Self {
        let mut run = Self::new();
        run.set_text(text);
        run
    }

    pub(crate) fn from_element(element: XmlElement) -> Self {
        let mut properties = None;
        let mut content = SmallVec::new();

        for node in element.children {
            let item = match node {
                XmlNode::Element(e) => match e.name.as_str() {
                    "w:rPr" if properties.is_none() => {
                        properties = Some(e);
                        continue;
                    },
                    "w:t" => RunContent::Text {
                        text: e.text(),
                        attributes: e.attributes,
                    },
                    "w:tab" => RunContent::Tab,
                    "w:br" => RunContent::Break(Break::from_element(e)),
                    "w:cr" => RunContent::CarriageReturn,
                    _ => RunContent::Other(XmlNode::Element(e)),
                },
                other => RunContent::Other(other),
            };
            content.push(item);
        }

        Self {
            attributes: element.attributes,
            properties,
            content,
        }
    }

    /// Get the text content.
    ///
    /// Tabs read as `\t`, line breaks and carriage returns as `\n`; page and
    /// column breaks contribute nothing.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            match item {
                RunContent::Text { text, .. } => out.push_str(text),
                RunContent::Tab => out.push('\t'),
                RunContent::Break(b) if b.kind == BreakKind::Line => out.push('\n'),
                RunContent::CarriageReturn => out.push('\n'),
                _ => {},
            }
        }
        out
    }

    /// Replace the content with `text`.
    ///
    /// `\t` becomes a tab and `\n` a line break; `\r` is dropped.
    pub fn set_text(&mut self, text: &str) {
        self.content.clear();
        let mut pending = String::new();

        for c in text.chars() {
            let item = match c {
                '\t' => RunContent::Tab,
                '\n' => RunContent::Break(Break::new(BreakKind::Line)),
                '\r' => continue,
                c => {
                    pending.push(c);
                    continue;
                },
            };
            if !pending.is_empty() {
                self.content.push(text_item(std::mem::take(&mut pending)));
            }
            self.content.push(item);
        }

        if !pending.is_empty() {
            self.content.push(text_item(pending));
        }
    }

    pub fn content(&self) -> &[RunContent] {
        &self.content
    }

    /// Append a break marker.
    pub fn add_break(&mut self, kind: BreakKind) -> &mut Self {
        self.content.push(RunContent::Break(Break::new(kind)));
        self
    }

    /// Iterate over the run's break markers.
    pub fn breaks(&self) -> impl Iterator<Item = &Break> {
        self.content.iter().filter_map(|item| match item {
            RunContent::Break(b) => Some(b),
            _ => None,
        })
    }

    /// Whether the run carries a break of the given kind.
    pub fn has_break(&self, kind: &BreakKind) -> bool {
        self.breaks().any(|b| &b.kind == kind)
    }

    /// Remove every break of the given kind, returning how many were removed.
    pub fn remove_breaks(&mut self, kind: &BreakKind) -> usize {
        let before = self.content.len();
        self.content
            .retain(|item| !matches!(item, RunContent::Break(b) if &b.kind == kind));
        before - self.content.len()
    }

    /// Whether bold is switched on directly on this run.
    pub fn is_bold(&self) -> bool {
        self.properties
            .as_ref()
            .and_then(|p| p.child("w:b"))
            .is_some_and(on_off)
    }

    /// Make the text bold.
    pub fn set_bold(&mut self, bold: bool) -> &mut Self {
        let mut element = XmlElement::new("w:b");
        if !bold {
            element.set_attr("w:val", "0");
        }
        self.properties_mut().set_child_ordered(element, rpr_rank);
        self
    }

    /// Directly applied font size, if any.
    pub fn font_size(&self) -> Option<Length> {
        let half_points: f64 = self
            .properties
            .as_ref()?
            .child("w:sz")?
            .attr("w:val")?
            .parse()
            .ok()?;
        Some(Length::pt(half_points / 2.0))
    }

    /// Set font size; written in half-points.
    pub fn set_font_size(&mut self, size: Length) -> &mut Self {
        let mut half_points = itoa::Buffer::new();
        let element =
            XmlElement::new("w:sz").with_attr("w:val", half_points.format(size.half_points()));
        self.properties_mut().set_child_ordered(element, rpr_rank);
        self
    }

    fn properties_mut(&mut self) -> &mut XmlElement {
        self.properties.get_or_insert_with(|| XmlElement::new("w:rPr"))
    }

    pub(crate) fn to_xml(&self, xml: &mut String) {
        let tag = XmlElement {
            name: "w:r".to_string(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        };
        tag.write_start(xml, false);

        if let Some(ref properties) = self.properties {
            properties.to_xml(xml);
        }

        for item in &self.content {
            match item {
                RunContent::Text { text, attributes } => {
                    xml.push_str("<w:t");
                    let mut preserve = false;
                    for (k, v) in attributes {
                        preserve |= k == "xml:space";
                        xml.push(' ');
                        xml.push_str(k);
                        xml.push_str("=\"");
                        xml.push_str(&escape_xml(v));
                        xml.push('"');
                    }
                    if !preserve && text.trim() != text {
                        xml.push_str(" xml:space=\"preserve\"");
                    }
                    xml.push('>');
                    xml.push_str(&escape_xml(text));
                    xml.push_str("</w:t>");
                },
                RunContent::Tab => xml.push_str("<w:tab/>"),
                RunContent::Break(b) => b.to_element().to_xml(xml),
                RunContent::CarriageReturn => xml.push_str("<w:cr/>"),
                RunContent::Other(node) => node.to_xml(xml),
            }
        }

        tag.write_end(xml);
    }
}

fn text_item(text: String) -> RunContent {
    RunContent::Text {
        text,
        attributes: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::XmlDocument;

    fn parse_run(xml: &str) -> Run {
        Run::from_element(XmlDocument::parse(xml.as_bytes()).unwrap().root)
    }

    fn to_string(run: &Run) -> String {
        let mut xml = String::new();
        run.to_xml(&mut xml);
        xml
    }

    #[test]
    fn test_text_with_tabs_and_breaks() {
        let run = parse_run(
            r#"<w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t><w:br w:type="page"/></w:r>"#,
        );
        assert_eq!(run.text(), "a\tb\nc");
    }

    #[test]
    fn test_set_text_splits_control_characters() {
        let run = Run::with_text("x\ty\nz");
        assert_eq!(run.content().len(), 5);
        assert_eq!(run.text(), "x\ty\nz");
        assert_eq!(
            to_string(&run),
            "<w:r><w:t>x</w:t><w:tab/><w:t>y</w:t><w:br/><w:t>z</w:t></w:r>"
        );
    }

    #[test]
    fn test_break_query_and_removal() {
        let mut run = parse_run(
            r#"<w:r><w:br w:type="page"/><w:br w:type="column"/><w:br w:type="page" w:clear="all"/></w:r>"#,
        );
        assert!(run.has_break(&BreakKind::Page));
        assert!(run.has_break(&BreakKind::Column));
        assert!(!run.has_break(&BreakKind::Line));

        assert_eq!(run.remove_breaks(&BreakKind::Page), 2);
        assert!(!run.has_break(&BreakKind::Page));
        assert_eq!(to_string(&run), r#"<w:r><w:br w:type="column"/></w:r>"#);
    }

    #[test]
    fn test_break_keeps_extra_attributes() {
        let run = parse_run(r#"<w:r><w:br w:type="textWrapping" w:clear="left"/></w:r>"#);
        assert!(run.has_break(&BreakKind::Line));
        assert_eq!(to_string(&run), r#"<w:r><w:br w:clear="left"/></w:r>"#);
    }

    #[test]
    fn test_formatting_in_schema_order() {
        let mut run = parse_run(r#"<w:r><w:rPr><w:rFonts w:ascii="Arial"/><w:color w:val="FF0000"/></w:rPr><w:t>x</w:t></w:r>"#);
        run.set_font_size(Length::pt(11.0)).set_bold(true);
        assert!(run.is_bold());
        assert_eq!(run.font_size(), Some(Length::pt(11.0)));
        assert_eq!(
            to_string(&run),
            r#"<w:r><w:rPr><w:rFonts w:ascii="Arial"/><w:b/><w:color w:val="FF0000"/><w:sz w:val="22"/></w:rPr><w:t>x</w:t></w:r>"#
        );
    }

    #[test]
    fn test_bold_off() {
        let mut run = Run::with_text("x");
        run.set_bold(true);
        run.set_bold(false);
        assert!(!run.is_bold());
    }

    #[test]
    fn test_preserves_unknown_content_and_space() {
        let src = r#"<w:r w:rsidR="00AB"><w:drawing><wp:inline/></w:drawing><w:t xml:space="preserve"> lead</w:t></w:r>"#;
        let run = parse_run(src);
        assert_eq!(run.text(), " lead");
        assert_eq!(to_string(&run), src);
    }

    #[test]
    fn test_adds_space_preserve_when_needed() {
        let run = Run::with_text(" padded ");
        assert_eq!(
            to_string(&run),
            r#"<w:r><w:t xml:space="preserve"> padded </w:t></w:r>"#
        );
    }
}
