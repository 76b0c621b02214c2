//! Block-level content of a document body or table cell.

use crate::common::xml::{XmlElement, XmlNode};

use super::paragraph::Paragraph;
use super::table::Table;

/// A block-level node.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    /// Content controls, bookmarks, custom XML and other blocks kept as is
    Other(XmlNode),
}

impl Block {
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn from_node(node: XmlNode) -> Self {
        match node {
            XmlNode::Element(e) if e.name == "w:p" => Block::Paragraph(Paragraph::from_element(e)),
            XmlNode::Element(e) if e.name == "w:tbl" => Block::Table(Table::from_element(e)),
            other => Block::Other(other),
        }
    }

    pub(crate) fn to_xml(&self, xml: &mut String) {
        match self {
            Block::Paragraph(p) => p.to_xml(xml),
            Block::Table(t) => t.to_xml(xml),
            Block::Other(node) => node.to_xml(xml),
        }
    }
}

/// Typed blocks from a container's children, dropping formatting whitespace.
pub(crate) fn parse_blocks(children: Vec<XmlNode>) -> Vec<Block> {
    children
        .into_iter()
        .filter(|n| !n.is_blank_text())
        .map(Block::from_node)
        .collect()
}

/// The `w:body` of a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    attributes: Vec<(String, String)>,
    blocks: Vec<Block>,
    /// Final section properties, always written last
    section: Option<XmlElement>,
}

impl Body {
    pub(crate) fn from_element(element: XmlElement) -> Self {
        let mut section = None;
        let mut children = Vec::with_capacity(element.children.len());
        for node in element.children {
            match node {
                XmlNode::Element(e) if e.name == "w:sectPr" => section = Some(e),
                other => children.push(other),
            }
        }

        Self {
            attributes: element.attributes,
            blocks: parse_blocks(children),
            section,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Append a block before the section properties.
    pub fn push(&mut self, block: Block) -> &mut Block {
        self.blocks.push(block);
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    /// Detach the blocks at the given indices; returns how many were removed.
    ///
    /// Indices refer to the sequence before removal. Out-of-range and
    /// duplicate indices are ignored.
    pub fn remove_blocks(&mut self, indices: &[usize]) -> usize {
        if indices.is_empty() {
            return 0;
        }
        let mut doomed = vec![false; self.blocks.len()];
        for &idx in indices {
            if let Some(slot) = doomed.get_mut(idx) {
                *slot = true;
            }
        }
        let before = self.blocks.len();
        let mut idx = 0;
        self.blocks.retain(|_| {
            let keep = !doomed[idx];
            idx += 1;
            keep
        });
        before - self.blocks.len()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(Block::as_paragraph)
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(Block::as_paragraph_mut)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(Block::as_table)
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(Block::as_table_mut)
    }

    pub fn section(&self) -> Option<&XmlElement> {
        self.section.as_ref()
    }

    pub(crate) fn section_mut(&mut self) -> &mut XmlElement {
        self.section.get_or_insert_with(|| XmlElement::new("w:sectPr"))
    }

    pub(crate) fn to_xml(&self, xml: &mut String) {
        let tag = XmlElement {
            name: "w:body".to_string(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        };
        tag.write_start(xml, false);
        for block in &self.blocks {
            block.to_xml(xml);
        }
        if let Some(ref section) = self.section {
            section.to_xml(xml);
        }
        tag.write_end(xml);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::XmlDocument;

    fn parse(xml: &str) -> Body {
        Body::from_element(XmlDocument::parse(xml.as_bytes()).unwrap().root)
    }

    #[test]
    fn test_classifies_blocks() {
        let body = parse(
            "<w:body>\n  <w:p/>\n  <w:tbl><w:tblPr/><w:tblGrid/></w:tbl>\n  <w:sdt/>\n  <w:sectPr/>\n</w:body>",
        );
        assert_eq!(body.blocks().len(), 3);
        assert_eq!(body.paragraphs().count(), 1);
        assert_eq!(body.tables().count(), 1);
        assert!(matches!(body.blocks()[2], Block::Other(_)));
        assert!(body.section().is_some());
    }

    #[test]
    fn test_push_lands_before_section() {
        let mut body = parse("<w:body><w:p/><w:sectPr><w:pgSz/></w:sectPr></w:body>");
        body.push(Block::Paragraph(Paragraph::with_text("end")));
        let mut xml = String::new();
        body.to_xml(&mut xml);
        assert_eq!(
            xml,
            "<w:body><w:p/><w:p><w:r><w:t>end</w:t></w:r></w:p><w:sectPr><w:pgSz/></w:sectPr></w:body>"
        );
    }

    #[test]
    fn test_remove_blocks() {
        let mut body = parse("<w:body><w:p/><w:p/><w:p/><w:p/></w:body>");
        assert_eq!(body.remove_blocks(&[3, 1, 1, 42]), 2);
        assert_eq!(body.blocks().len(), 2);
        assert_eq!(body.remove_blocks(&[]), 0);
    }
}
