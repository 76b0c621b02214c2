//! Tables built from tabular data definitions.
//!
//! A [`TableSpec`] names the header row, the data rows and optionally the
//! column widths. [`TableBuilder`] appends a styled table for it: a bold
//! centred header row, body rows whose first and last columns are centred, no
//! cell shading and a single set of plain borders.

use crate::common::unit::Length;
use crate::docx::{
    Document, Paragraph, ParagraphAlignment, Table, TableAlignment, TableBorder, TableBorders,
};
use crate::error::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A table cell value as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(x) => write_float(f, *x),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip digits; fixed notation for decimal exponents in
/// `-4..16`, otherwise `1e+20` style. Whole values keep a trailing `.0`.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }

    let sci = format!("{:e}", x);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..16).contains(&exp) {
        let fixed = format!("{}", x);
        if fixed.contains('.') {
            f.write_str(&fixed)
        } else {
            write!(f, "{}.0", fixed)
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Tabular data to render: headers, rows and optional column widths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableSpec {
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
    /// Width per column; bare numbers in configuration files are centimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_widths: Option<Vec<Length>>,
}

impl TableSpec {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            column_widths: None,
        }
    }

    /// Builder-style row append.
    pub fn with_row<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_column_widths(mut self, widths: Vec<Length>) -> Self {
        self.column_widths = Some(widths);
        self
    }

    /// Number of columns, one per header.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Check that there is at least one header and every row matches the header count.
    ///
    /// Row numbers in [`Error::SpecMismatch`] count data rows from zero.
    pub fn validate(&self) -> Result<()> {
        if self.headers.is_empty() {
            return Err(Error::EmptyHeaders);
        }
        let expected = self.headers.len();
        match self.rows.iter().position(|r| r.len() != expected) {
            Some(row) => Err(Error::SpecMismatch {
                row,
                expected,
                found: self.rows[row].len(),
            }),
            None => Ok(()),
        }
    }
}

/// Fixed styling applied to every generated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    pub header_font_size: Length,
    pub body_font_size: Length,
    /// Applied to all four edges and the inside lines
    pub border: TableBorder,
    pub alignment: TableAlignment,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header_font_size: Length::pt(11.0),
            body_font_size: Length::pt(10.0),
            border: TableBorder::default(),
            alignment: TableAlignment::Center,
        }
    }
}

/// Appends styled tables to a document.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    style: TableStyle,
}

impl TableBuilder {
    pub fn new(style: TableStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }

    /// Append a table for `spec` to the end of `document`.
    ///
    /// The spec is validated first; on error the document is unchanged.
    pub fn build<'a>(&self, document: &'a mut Document, spec: &TableSpec) -> Result<&'a mut Table> {
        spec.validate()?;

        let cols = spec.column_count();
        if let Some(ref widths) = spec.column_widths
            && widths.len() != cols
        {
            warn!(
                "{} column widths given for {} columns; applying {}",
                widths.len(),
                cols,
                widths.len().min(cols)
            );
        }

        let table = document.add_table(1 + spec.rows.len(), cols);
        table.set_alignment(self.style.alignment);

        if let Some(header) = table.row_mut(0) {
            for (cell, text) in header.cells_mut().zip(&spec.headers) {
                let para = cell.set_text(text);
                para.set_alignment(ParagraphAlignment::Center);
                self.format_runs(para, self.style.header_font_size, true);
            }
        }

        for (row, values) in table.rows_mut().skip(1).zip(&spec.rows) {
            for (col, (cell, value)) in row.cells_mut().zip(values).enumerate() {
                let para = cell.set_text(&value.to_string());
                para.set_alignment(body_alignment(col, cols));
                self.format_runs(para, self.style.body_font_size, false);
            }
        }

        if let Some(ref widths) = spec.column_widths {
            for (col, &width) in widths.iter().take(cols).enumerate() {
                for row in table.rows_mut() {
                    if let Some(cell) = row.cell_mut(col) {
                        cell.set_width(width);
                    }
                }
                table.set_column_width(col, width);
            }
        }

        let unshaded = table.remove_cell_shading();
        table.set_borders(&TableBorders::uniform(self.style.border.clone()));

        debug!(
            "built {}x{} table ({} shading elements removed)",
            table.row_count(),
            cols,
            unshaded
        );
        Ok(table)
    }

    fn format_runs(&self, para: &mut Paragraph, size: Length, bold: bool) {
        for run in para.runs_mut() {
            if bold {
                run.set_bold(true);
            }
            run.set_font_size(size);
        }
    }
}

/// First and last columns are centred, the rest left-aligned.
fn body_alignment(col: usize, cols: usize) -> ParagraphAlignment {
    if col == 0 || col + 1 == cols {
        ParagraphAlignment::Center
    } else {
        ParagraphAlignment::Left
    }
}

/// Append a table for `spec` using the default [`TableStyle`].
pub fn build_table<'a>(document: &'a mut Document, spec: &TableSpec) -> Result<&'a mut Table> {
    TableBuilder::default().build(document, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::TableBorderStyle;

    fn sample_spec() -> TableSpec {
        TableSpec::new(["A", "B"])
            .with_row(["1", "2"])
            .with_row(["3", "4"])
    }

    #[test]
    fn test_table_shape_and_styling() {
        let mut doc = Document::new();
        let table = build_table(&mut doc, &sample_spec()).unwrap();

        assert_eq!(table.row_count(), 3);
        assert!(table.rows().all(|r| r.cell_count() == 2));
        assert_eq!(table.alignment(), Some(TableAlignment::Center));

        for cell in table.row(0).unwrap().cells() {
            let para = cell.paragraphs().next().unwrap();
            assert_eq!(para.alignment(), Some(ParagraphAlignment::Center));
            assert!(para.runs().all(|r| r.is_bold()));
            assert!(para.runs().all(|r| r.font_size() == Some(Length::pt(11.0))));
        }
        for row in table.rows().skip(1) {
            for cell in row.cells() {
                let para = cell.paragraphs().next().unwrap();
                assert_eq!(para.alignment(), Some(ParagraphAlignment::Center));
                assert!(para.runs().all(|r| !r.is_bold()));
                assert!(para.runs().all(|r| r.font_size() == Some(Length::pt(10.0))));
            }
        }

        assert!(table.rows().flat_map(|r| r.cells()).all(|c| c.shading().is_none()));
        assert_eq!(table.border_definition_count(), 1);
        assert_eq!(table.cell(2, 1).unwrap().text(), "4");
    }

    #[test]
    fn test_interior_columns_left_aligned() {
        let mut doc = Document::new();
        let spec = TableSpec::new(["No.", "Title", "Page"]).with_row(["1", "Intro", "11"]);
        let table = build_table(&mut doc, &spec).unwrap();
        let alignments: Vec<_> = table
            .row(1)
            .unwrap()
            .cells()
            .map(|c| c.paragraphs().next().unwrap().alignment())
            .collect();
        assert_eq!(
            alignments,
            [
                Some(ParagraphAlignment::Center),
                Some(ParagraphAlignment::Left),
                Some(ParagraphAlignment::Center)
            ]
        );
    }

    #[test]
    fn test_column_widths_applied_to_every_row() {
        let mut doc = Document::new();
        let spec = sample_spec().with_column_widths(vec![Length::cm(3.0), Length::cm(5.0)]);
        let table = build_table(&mut doc, &spec).unwrap();
        for row in table.rows() {
            assert_eq!(row.cell(0).unwrap().width().unwrap().to_twips(), Length::cm(3.0).to_twips());
            assert_eq!(row.cell(1).unwrap().width().unwrap().to_twips(), Length::cm(5.0).to_twips());
        }
        assert_eq!(table.column_width(1).unwrap().to_twips(), 2835);
    }

    #[test]
    fn test_short_width_list_keeps_defaults() {
        let mut doc = Document::new();
        let spec = sample_spec()
            .with_column_widths(vec![Length::cm(3.0)]);
        let table = build_table(&mut doc, &spec).unwrap();
        assert_eq!(table.cell(1, 1).unwrap().width(), Some(Length::twips(4513)));

        let spec = sample_spec().with_column_widths(vec![Length::cm(1.0); 4]);
        let table = build_table(&mut doc, &spec).unwrap();
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_mismatched_row_rejected_before_build() {
        let mut doc = Document::new();
        let spec = TableSpec::new(["A", "B"])
            .with_row(["1", "2"])
            .with_row(["3"]);
        let err = build_table(&mut doc, &spec).unwrap_err();
        assert!(matches!(
            err,
            Error::SpecMismatch {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
        assert_eq!(doc.tables().count(), 0);
    }

    #[test]
    fn test_empty_headers_rejected() {
        let mut doc = Document::new();
        let spec = TableSpec::new(Vec::<String>::new());
        assert!(matches!(build_table(&mut doc, &spec), Err(Error::EmptyHeaders)));
    }

    #[test]
    fn test_header_only_table() {
        let mut doc = Document::new();
        let table = build_table(&mut doc, &TableSpec::new(["Only"])).unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_other_tables_untouched() {
        let mut doc = Document::new();
        let first = doc.add_table(1, 1);
        first.cell_mut(0, 0).unwrap().set_shading("FF0000");
        build_table(&mut doc, &sample_spec()).unwrap();

        let first = doc.tables().next().unwrap();
        assert_eq!(first.cell(0, 0).unwrap().shading(), Some("FF0000"));
        assert_eq!(first.border_definition_count(), 0);
    }

    #[test]
    fn test_custom_style() {
        let style = TableStyle {
            header_font_size: Length::pt(14.0),
            border: TableBorder {
                style: TableBorderStyle::Double,
                weight: Length::pt(1.0),
                color: "FF0000".to_string(),
            },
            ..TableStyle::default()
        };
        let mut doc = Document::new();
        let table = TableBuilder::new(style.clone())
            .build(&mut doc, &sample_spec())
            .unwrap();
        let borders = table.borders().unwrap();
        assert_eq!(borders.inside_v, Some(style.border));
        let header_run = table.cell(0, 0).unwrap().paragraphs().next().unwrap().runs().next().unwrap();
        assert_eq!(header_run.font_size(), Some(Length::pt(14.0)));
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::from(3.0f64).to_string(), "3.0");
        assert_eq!(CellValue::from(2.5f64).to_string(), "2.5");
        assert_eq!(CellValue::from(42i64).to_string(), "42");
        assert_eq!(CellValue::from(true).to_string(), "True");
        assert_eq!(CellValue::from("x").to_string(), "x");
    }

    #[test]
    fn test_float_display_switches_to_exponent_form() {
        let shown = |x: f64| CellValue::Float(x).to_string();
        assert_eq!(shown(1e15), "1000000000000000.0");
        assert_eq!(shown(1e16), "1e+16");
        assert_eq!(shown(1e20), "1e+20");
        assert_eq!(shown(1.25e300), "1.25e+300");
        assert_eq!(shown(0.0001), "0.0001");
        assert_eq!(shown(1.5e-5), "1.5e-05");
        assert_eq!(shown(-0.0), "-0.0");
        assert_eq!(shown(f64::NAN), "nan");
        assert_eq!(shown(f64::INFINITY), "inf");
        assert_eq!(shown(f64::NEG_INFINITY), "-inf");
    }
}
