/// Paragraph types and implementation for DOCX documents.
use crate::common::xml::{XmlElement, XmlNode};

use super::format::{ParagraphAlignment, ppr_rank};
use super::run::{BreakKind, Run};

/// Items that can appear in a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphContent {
    /// A direct `w:r` child
    Run(Run),
    /// Hyperlinks, bookmarks, tracked changes, fields and so on, kept as is
    Other(XmlNode),
}

/// A paragraph in a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    attributes: Vec<(String, String)>,
    /// `w:pPr`
    properties: Option<XmlElement>,
    content: Vec<ParagraphContent>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A paragraph holding one run with `text`.
    pub fn with_text(text: &str) -> Self {
        let mut para = Self::new();
        para.add_run_with_text(text);
        para
    }

    pub(crate) fn from_element(element: XmlElement) -> Self {
        let mut properties = None;
        let mut content = Vec::new();

        for node in element.children {
            match node {
                XmlNode::Element(e) if e.name == "w:pPr" && properties.is_none() => {
                    properties = Some(e);
                },
                XmlNode::Element(e) if e.name == "w:r" => {
                    content.push(ParagraphContent::Run(Run::from_element(e)));
                },
                other => content.push(ParagraphContent::Other(other)),
            }
        }

        Self {
            attributes: element.attributes,
            properties,
            content,
        }
    }

    /// Visible text of the paragraph.
    ///
    /// Run text plus the `w:t` text inside other inline containers such as
    /// hyperlinks or tracked insertions. Deleted text is not visible.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            match item {
                ParagraphContent::Run(run) => out.push_str(&run.text()),
                ParagraphContent::Other(XmlNode::Element(e)) => {
                    out.push_str(&e.descendant_text("w:t"));
                },
                ParagraphContent::Other(_) => {},
            }
        }
        out
    }

    /// A paragraph is empty when its trimmed text is.
    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }

    pub fn content(&self) -> &[ParagraphContent] {
        &self.content
    }

    /// Direct runs of the paragraph.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|item| match item {
            ParagraphContent::Run(r) => Some(r),
            _ => None,
        })
    }

    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.content.iter_mut().filter_map(|item| match item {
            ParagraphContent::Run(r) => Some(r),
            _ => None,
        })
    }

    pub fn run_count(&self) -> usize {
        self.runs().count()
    }

    /// Add a new run to the paragraph.
    pub fn add_run(&mut self) -> &mut Run {
        self.push_run(Run::new())
    }

    /// Add a run with text.
    pub fn add_run_with_text(&mut self, text: &str) -> &mut Run {
        self.push_run(Run::with_text(text))
    }

    fn push_run(&mut self, run: Run) -> &mut Run {
        self.content.push(ParagraphContent::Run(run));
        match self.content.last_mut() {
            Some(ParagraphContent::Run(r)) => r,
            _ => unreachable!(),
        }
    }

    /// Whether any run carries a break of the given kind.
    pub fn has_break(&self, kind: &BreakKind) -> bool {
        self.runs().any(|r| r.has_break(kind))
    }

    /// Remove breaks of the given kind from every run.
    pub fn remove_breaks(&mut self, kind: &BreakKind) -> usize {
        self.runs_mut().map(|r| r.remove_breaks(kind)).sum()
    }

    /// Clear all content, keeping paragraph properties.
    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Paragraph alignment set directly on this paragraph.
    pub fn alignment(&self) -> Option<ParagraphAlignment> {
        let jc = self.properties.as_ref()?.child("w:jc")?;
        ParagraphAlignment::from_attr(jc.attr("w:val")?)
    }

    /// Set paragraph alignment.
    pub fn set_alignment(&mut self, alignment: ParagraphAlignment) {
        let jc = XmlElement::new("w:jc").with_attr("w:val", alignment.as_str());
        self.properties_mut().set_child_ordered(jc, ppr_rank);
    }

    /// Paragraph style ID.
    pub fn style(&self) -> Option<&str> {
        self.properties.as_ref()?.child("w:pStyle")?.attr("w:val")
    }

    /// Set the paragraph style.
    pub fn set_style(&mut self, style_id: &str) {
        let style = XmlElement::new("w:pStyle").with_attr("w:val", style_id);
        self.properties_mut().set_child_ordered(style, ppr_rank);
    }

    /// Whether this paragraph carries section properties (a section break).
    pub fn has_section_properties(&self) -> bool {
        self.properties
            .as_ref()
            .is_some_and(|p| p.child("w:sectPr").is_some())
    }

    fn properties_mut(&mut self) -> &mut XmlElement {
        self.properties.get_or_insert_with(|| XmlElement::new("w:pPr"))
    }

    pub(crate) fn to_xml(&self, xml: &mut String) {
        let tag = XmlElement {
            name: "w:p".to_string(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        };

        if self.properties.is_none() && self.content.is_empty() {
            tag.write_start(xml, true);
            return;
        }

        tag.write_start(xml, false);
        if let Some(ref properties) = self.properties {
            properties.to_xml(xml);
        }
        for item in &self.content {
            match item {
                ParagraphContent::Run(run) => run.to_xml(xml),
                ParagraphContent::Other(node) => node.to_xml(xml),
            }
        }
        tag.write_end(xml);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::XmlDocument;

    fn parse(xml: &str) -> Paragraph {
        Paragraph::from_element(XmlDocument::parse(xml.as_bytes()).unwrap().root)
    }

    fn to_string(para: &Paragraph) -> String {
        let mut xml = String::new();
        para.to_xml(&mut xml);
        xml
    }

    #[test]
    fn test_emptiness_uses_trimmed_text() {
        assert!(parse("<w:p/>").is_empty());
        assert!(parse("<w:p><w:r><w:t>   </w:t></w:r><w:r><w:tab/></w:r></w:p>").is_empty());
        assert!(!parse("<w:p><w:r><w:t> x </w:t></w:r></w:p>").is_empty());
    }

    #[test]
    fn test_hyperlink_text_is_visible() {
        let para = parse(
            r#"<w:p><w:hyperlink r:id="rId4"><w:r><w:t>site</w:t></w:r></w:hyperlink></w:p>"#,
        );
        assert_eq!(para.run_count(), 0);
        assert_eq!(para.text(), "site");
        assert!(!para.is_empty());
    }

    #[test]
    fn test_deleted_text_is_not_visible() {
        let para = parse("<w:p><w:del><w:r><w:delText>gone</w:delText></w:r></w:del></w:p>");
        assert!(para.is_empty());
    }

    #[test]
    fn test_runs_are_direct_children() {
        let para = parse("<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr><w:r/><w:bookmarkStart/><w:r/></w:p>");
        assert_eq!(para.run_count(), 2);
        assert_eq!(para.alignment(), Some(ParagraphAlignment::Center));
    }

    #[test]
    fn test_page_break_removal() {
        let mut para = parse(r#"<w:p><w:r><w:br w:type="page"/></w:r><w:r><w:br w:type="page"/></w:r></w:p>"#);
        assert!(para.has_break(&BreakKind::Page));
        assert_eq!(para.remove_breaks(&BreakKind::Page), 2);
        assert!(!para.has_break(&BreakKind::Page));
        assert_eq!(para.run_count(), 2);
    }

    #[test]
    fn test_style_and_alignment_order() {
        let mut para = Paragraph::with_text("Heading");
        para.set_alignment(ParagraphAlignment::Center);
        para.set_style("Heading1");
        assert_eq!(para.style(), Some("Heading1"));
        assert_eq!(
            to_string(&para),
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr><w:r><w:t>Heading</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn test_round_trip_keeps_attributes() {
        let src = r#"<w:p w:rsidR="001"><w:proofErr w:type="spellStart"/><w:r><w:t>x</w:t></w:r></w:p>"#;
        assert_eq!(to_string(&parse(src)), src);
    }

    #[test]
    fn test_empty_paragraph_writes_empty_tag() {
        assert_eq!(to_string(&Paragraph::new()), "<w:p/>");
    }
}
