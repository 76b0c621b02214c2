//! Declarative report layout: headings, spacing, page breaks and tables.

use crate::docx::{Document, Margins, ParagraphAlignment};
use crate::error::{Error, Result};
use crate::table::{TableBuilder, TableSpec, TableStyle};
use log::debug;
use serde::{Deserialize, Serialize};

/// A heading paragraph placed before a section's table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    /// 0 for a title, 1-9 for heading levels
    #[serde(default = "default_heading_level")]
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<ParagraphAlignment>,
}

fn default_heading_level() -> u8 {
    1
}

impl Heading {
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            level,
            alignment: None,
        }
    }

    pub fn with_alignment(mut self, alignment: ParagraphAlignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

/// One heading-and-table unit of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<Heading>,
    /// Empty paragraphs between the heading and the table
    #[serde(default = "default_spacing_before")]
    pub spacing_before: usize,
    pub table: TableSpec,
    /// Empty paragraphs after the table
    #[serde(default)]
    pub spacing_after: usize,
    #[serde(default)]
    pub page_break_after: bool,
}

fn default_spacing_before() -> usize {
    1
}

impl ReportSection {
    pub fn new(table: TableSpec) -> Self {
        Self {
            heading: None,
            spacing_before: default_spacing_before(),
            table,
            spacing_after: 0,
            page_break_after: false,
        }
    }

    pub fn with_heading(mut self, heading: Heading) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_spacing(mut self, before: usize, after: usize) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    pub fn with_page_break(mut self) -> Self {
        self.page_break_after = true;
        self
    }
}

/// Page setup plus an ordered list of sections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportLayout {
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub sections: Vec<ReportSection>,
}

impl ReportLayout {
    /// Check every table and heading before anything is rendered.
    pub fn validate(&self) -> Result<()> {
        for section in &self.sections {
            section.table.validate()?;
            if let Some(ref heading) = section.heading
                && heading.level > 9
            {
                return Err(Error::InvalidHeadingLevel(heading.level));
            }
        }
        Ok(())
    }

    /// Render the layout into a new blank document.
    ///
    /// Validation runs first, so an invalid section produces no document at all.
    pub fn render(&self, style: &TableStyle) -> Result<Document> {
        self.validate()?;

        let mut doc = Document::new();
        doc.set_margins(self.margins);
        let builder = TableBuilder::new(style.clone());

        for section in &self.sections {
            if let Some(ref heading) = section.heading {
                let para = doc.add_heading(&heading.text, heading.level)?;
                if let Some(alignment) = heading.alignment {
                    para.set_alignment(alignment);
                }
            }
            for _ in 0..section.spacing_before {
                doc.add_paragraph();
            }
            builder.build(&mut doc, &section.table)?;
            for _ in 0..section.spacing_after {
                doc.add_paragraph();
            }
            if section.page_break_after {
                doc.add_page_break();
            }
        }

        debug!("rendered report with {} sections", self.sections.len());
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::Length;
    use crate::docx::Block;

    fn figures() -> TableSpec {
        TableSpec::new(["Figure No.", "Title", "Page No."])
            .with_row(["1", "Introduction", ""])
            .with_row(["", "1.1 Overview", "11"])
            .with_column_widths(vec![Length::cm(3.0), Length::cm(10.0), Length::cm(2.5)])
    }

    #[test]
    fn test_render_section_order() {
        let layout = ReportLayout {
            margins: Margins::default(),
            sections: vec![
                ReportSection::new(figures())
                    .with_heading(
                        Heading::new("List of Figures", 1).with_alignment(ParagraphAlignment::Center),
                    )
                    .with_page_break(),
                ReportSection::new(TableSpec::new(["Method", "Endpoint"]).with_row(["GET", "/"]))
                    .with_heading(Heading::new("Table A1", 2))
                    .with_spacing(1, 2),
            ],
        };

        let doc = layout.render(&TableStyle::default()).unwrap();
        let kinds: Vec<&str> = doc
            .body()
            .blocks()
            .iter()
            .map(|b| match b {
                Block::Paragraph(p) if p.style().is_some() => "heading",
                Block::Paragraph(p) if p.has_break(&crate::docx::BreakKind::Page) => "break",
                Block::Paragraph(_) => "blank",
                Block::Table(_) => "table",
                Block::Other(_) => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            ["heading", "blank", "table", "break", "heading", "blank", "table", "blank", "blank"]
        );

        let heading = doc.paragraphs().next().unwrap();
        assert_eq!(heading.style(), Some("Heading1"));
        assert_eq!(heading.alignment(), Some(ParagraphAlignment::Center));
        assert_eq!(doc.margins(), Some(Margins::uniform(Length::twips(1440))));
    }

    #[test]
    fn test_invalid_section_produces_no_document() {
        let layout = ReportLayout {
            margins: Margins::default(),
            sections: vec![
                ReportSection::new(figures()),
                ReportSection::new(TableSpec::new(["A", "B"]).with_row(["only one"])),
            ],
        };
        assert!(matches!(
            layout.render(&TableStyle::default()),
            Err(Error::SpecMismatch { row: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_heading_level_rejected_up_front() {
        let layout = ReportLayout {
            margins: Margins::default(),
            sections: vec![ReportSection::new(figures()).with_heading(Heading::new("Deep", 12))],
        };
        assert!(matches!(
            layout.validate(),
            Err(Error::InvalidHeadingLevel(12))
        ));
    }
}
