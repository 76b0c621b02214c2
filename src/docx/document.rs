//! Word document: the main document part of a package as a typed tree.

use crate::common::unit::Length;
use crate::common::xml::{XmlDocument, XmlElement, XmlNode};
use crate::error::{Error, Result};
use crate::opc::Package;
use std::path::Path;

use super::body::{Block, Body};
use super::format::{Margins, sectpr_rank};
use super::paragraph::Paragraph;
use super::run::BreakKind;
use super::table::Table;

/// Usable width of an A4 page with 1in margins, in twips.
const DEFAULT_USABLE_WIDTH: i64 = 9026;

/// A Word document loaded from or destined for a `.docx` package.
///
/// The body is parsed into typed [`Block`]s; the rest of `w:document` and
/// every other package part are carried along untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use docx_tidy::docx::Document;
///
/// let mut doc = Document::open("input.docx")?;
/// for para in doc.paragraphs() {
///     println!("{}", para.text());
/// }
/// doc.save("output.docx")?;
/// # Ok::<(), docx_tidy::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    package: Package,
    part_name: String,
    declaration: Option<String>,
    /// `w:document` with the body taken out
    root: XmlElement,
    /// Child index the body is written back at
    body_slot: usize,
    body: Body,
    /// Whether the body changed since loading
    modified: bool,
}

impl Document {
    /// Create a blank A4 document with 1in margins.
    pub fn new() -> Self {
        let mut doc = match Self::from_package(Package::blank()) {
            Ok(doc) => doc,
            Err(_) => unreachable!("built-in template is well-formed"),
        };
        doc.modified = true;
        doc
    }

    /// Open a document from a file path.
    ///
    /// # Errors
    /// [`Error::InputNotFound`] when the file is missing; ZIP or XML errors
    /// when the container or the main document part is malformed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Load a document from the bytes of a `.docx` file.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        let part_name = package.main_document_part_name()?;
        let data = package
            .part(&part_name)
            .ok_or_else(|| Error::MissingPart(part_name.clone()))?;
        let XmlDocument {
            declaration,
            mut root,
        } = XmlDocument::parse(data)?;

        if root.name != "w:document" {
            return Err(Error::InvalidFormat(format!(
                "Expected <w:document> root in {}, found <{}>",
                part_name, root.name
            )));
        }

        let body_slot = root
            .children
            .iter()
            .position(|n| matches!(n, XmlNode::Element(e) if e.name == "w:body"))
            .ok_or_else(|| Error::InvalidFormat(format!("No <w:body> in {}", part_name)))?;
        let body = match root.children.remove(body_slot) {
            XmlNode::Element(e) => Body::from_element(e),
            _ => unreachable!(),
        };

        Ok(Self {
            package,
            part_name,
            declaration,
            root,
            body_slot,
            body,
            modified: false,
        })
    }

    /// The underlying package.
    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        self.modified = true;
        &mut self.body
    }

    /// Top-level body paragraphs in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.paragraphs()
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.modified = true;
        self.body.paragraphs_mut()
    }

    /// Top-level body tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.tables()
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.modified = true;
        self.body.tables_mut()
    }

    /// Append an empty paragraph.
    pub fn add_paragraph(&mut self) -> &mut Paragraph {
        self.push_paragraph(Paragraph::new())
    }

    /// Append a paragraph with text.
    pub fn add_paragraph_with_text(&mut self, text: &str) -> &mut Paragraph {
        self.push_paragraph(Paragraph::with_text(text))
    }

    /// Append a heading paragraph.
    ///
    /// Level 0 uses the `Title` style, levels 1-9 `Heading1`-`Heading9`.
    pub fn add_heading(&mut self, text: &str, level: u8) -> Result<&mut Paragraph> {
        if level > 9 {
            return Err(Error::InvalidHeadingLevel(level));
        }
        let style = if level == 0 {
            "Title".to_string()
        } else {
            format!("Heading{}", level)
        };
        let para = self.add_paragraph_with_text(text);
        para.set_style(&style);
        Ok(para)
    }

    /// Append a paragraph holding a single page break.
    pub fn add_page_break(&mut self) -> &mut Paragraph {
        let para = self.add_paragraph();
        para.add_run().add_break(BreakKind::Page);
        para
    }

    fn push_paragraph(&mut self, para: Paragraph) -> &mut Paragraph {
        match self.body_mut().push(Block::Paragraph(para)) {
            Block::Paragraph(p) => p,
            _ => unreachable!(),
        }
    }

    /// Append a table whose columns share the usable page width equally.
    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut Table {
        let col_width = Length::twips(self.usable_width().to_twips() / cols.max(1) as i64);
        match self.body_mut().push(Block::Table(Table::new(rows, cols, col_width))) {
            Block::Table(t) => t,
            _ => unreachable!(),
        }
    }

    /// Page width minus left and right margins of the final section.
    pub fn usable_width(&self) -> Length {
        let Some(section) = self.body.section() else {
            return Length::twips(DEFAULT_USABLE_WIDTH);
        };
        let twips = |element: Option<&XmlElement>, attr: &str| -> Option<i64> {
            element?.attr(attr)?.parse().ok()
        };
        let page = twips(section.child("w:pgSz"), "w:w");
        let margin = section.child("w:pgMar");
        match page {
            Some(page) => {
                let left = twips(margin, "w:left").unwrap_or(0);
                let right = twips(margin, "w:right").unwrap_or(0);
                Length::twips((page - left - right).max(0))
            },
            None => Length::twips(DEFAULT_USABLE_WIDTH),
        }
    }

    /// Page margins of the final section, when all four are set.
    pub fn margins(&self) -> Option<Margins> {
        let margin = self.body.section()?.child("w:pgMar")?;
        let side = |attr: &str| -> Option<Length> { margin.attr(attr)?.parse().ok().map(Length::twips) };
        Some(Margins {
            top: side("w:top")?,
            bottom: side("w:bottom")?,
            left: side("w:left")?,
            right: side("w:right")?,
        })
    }

    /// Set the page margins of the final section.
    ///
    /// Header, footer and gutter distances are kept when present.
    pub fn set_margins(&mut self, margins: Margins) {
        let margin = self
            .body_mut()
            .section_mut()
            .child_or_insert("w:pgMar", sectpr_rank);
        let mut buf = itoa::Buffer::new();
        for (attr, length) in [
            ("w:top", margins.top),
            ("w:right", margins.right),
            ("w:bottom", margins.bottom),
            ("w:left", margins.left),
        ] {
            margin.set_attr(attr, buf.format(length.to_twips()));
        }
        for (attr, default) in [("w:header", "708"), ("w:footer", "708"), ("w:gutter", "0")] {
            if margin.attr(attr).is_none() {
                margin.set_attr(attr, default);
            }
        }
    }

    /// Serialize the main document part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(8192);
        if let Some(ref decl) = self.declaration {
            xml.push_str("<?");
            xml.push_str(decl);
            xml.push_str("?>\n");
        }

        self.root.write_start(&mut xml, false);
        let slot = self.body_slot.min(self.root.children.len());
        for child in &self.root.children[..slot] {
            child.to_xml(&mut xml);
        }
        self.body.to_xml(&mut xml);
        for child in &self.root.children[slot..] {
            child.to_xml(&mut xml);
        }
        self.root.write_end(&mut xml);
        xml
    }

    /// Write changes back into the package.
    ///
    /// An unmodified document keeps its main part byte for byte.
    fn commit(&mut self) {
        if self.modified {
            let xml = self.to_xml();
            self.package.set_part(&self.part_name, xml.into_bytes());
            self.modified = false;
        }
    }

    /// Serialize the whole package.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.commit();
        self.package.to_bytes()
    }

    /// Save the document to a file.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.commit();
        self.package.save(path)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
