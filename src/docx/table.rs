/// Table types and implementation for DOCX documents.
use crate::common::unit::Length;
use crate::common::xml::{XmlElement, XmlNode};

use super::body::{Block, parse_blocks};
use super::format::{TableAlignment, TableBorders, tblpr_rank, tcpr_rank};
use super::paragraph::Paragraph;

/// Items that can appear directly in a table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableContent {
    Row(Row),
    /// Bookmarks, content controls around rows and the like
    Other(XmlNode),
}

/// A table in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    attributes: Vec<(String, String)>,
    /// `w:tblPr`
    properties: XmlElement,
    /// `w:tblGrid`
    grid: XmlElement,
    content: Vec<TableContent>,
}

impl Table {
    /// Allocate a `rows` x `cols` table with every column `col_width` wide.
    ///
    /// Each cell holds one empty paragraph.
    pub fn new(rows: usize, cols: usize, col_width: Length) -> Self {
        let mut width = itoa::Buffer::new();
        let width = width.format(col_width.to_twips());

        let properties = XmlElement::new("w:tblPr")
            .with_child(
                XmlElement::new("w:tblW")
                    .with_attr("w:w", "0")
                    .with_attr("w:type", "auto"),
            )
            .with_child(
                XmlElement::new("w:tblLook")
                    .with_attr("w:val", "04A0")
                    .with_attr("w:firstRow", "1")
                    .with_attr("w:lastRow", "0")
                    .with_attr("w:firstColumn", "1")
                    .with_attr("w:lastColumn", "0")
                    .with_attr("w:noHBand", "0")
                    .with_attr("w:noVBand", "1"),
            );

        let mut grid = XmlElement::new("w:tblGrid");
        for _ in 0..cols {
            grid = grid.with_child(XmlElement::new("w:gridCol").with_attr("w:w", width));
        }

        let content = (0..rows)
            .map(|_| TableContent::Row(Row::new(cols, col_width)))
            .collect();

        Self {
            attributes: Vec::new(),
            properties,
            grid,
            content,
        }
    }

    pub(crate) fn from_element(element: XmlElement) -> Self {
        let mut properties = None;
        let mut grid = None;
        let mut content = Vec::new();

        for node in element.children {
            match node {
                XmlNode::Element(e) if e.name == "w:tblPr" && properties.is_none() => {
                    properties = Some(e);
                },
                XmlNode::Element(e) if e.name == "w:tblGrid" && grid.is_none() => {
                    grid = Some(e);
                },
                XmlNode::Element(e) if e.name == "w:tr" => {
                    content.push(TableContent::Row(Row::from_element(e)));
                },
                other if other.is_blank_text() => {},
                other => content.push(TableContent::Other(other)),
            }
        }

        Self {
            attributes: element.attributes,
            properties: properties.unwrap_or_else(|| XmlElement::new("w:tblPr")),
            grid: grid.unwrap_or_else(|| XmlElement::new("w:tblGrid")),
            content,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.content.iter().filter_map(|item| match item {
            TableContent::Row(r) => Some(r),
            _ => None,
        })
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.content.iter_mut().filter_map(|item| match item {
            TableContent::Row(r) => Some(r),
            _ => None,
        })
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Number of grid columns, or the first row's cell count without a grid.
    pub fn column_count(&self) -> usize {
        match self.grid.count_children("w:gridCol") {
            0 => self.rows().next().map_or(0, Row::cell_count),
            n => n,
        }
    }

    /// Get a row by index.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows().nth(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows_mut().nth(index)
    }

    /// Get a cell by row and column index.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.row(row)?.cell(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.row_mut(row)?.cell_mut(col)
    }

    /// Horizontal placement of the table on the page.
    pub fn alignment(&self) -> Option<TableAlignment> {
        TableAlignment::from_attr(self.properties.child("w:jc")?.attr("w:val")?)
    }

    pub fn set_alignment(&mut self, alignment: TableAlignment) {
        let jc = XmlElement::new("w:jc").with_attr("w:val", alignment.as_str());
        self.properties.set_child_ordered(jc, tblpr_rank);
    }

    /// Install table-level borders, replacing any existing definition.
    pub fn set_borders(&mut self, borders: &TableBorders) {
        self.properties
            .set_child_ordered(borders.to_element(), tblpr_rank);
    }

    /// Table-level borders, if defined.
    pub fn borders(&self) -> Option<TableBorders> {
        self.properties
            .child("w:tblBorders")
            .map(TableBorders::from_element)
    }

    /// Number of `w:tblBorders` blocks in the table properties.
    pub fn border_definition_count(&self) -> usize {
        self.properties.count_children("w:tblBorders")
    }

    /// Set the width of grid column `col`. Returns false when there is no such column.
    pub fn set_column_width(&mut self, col: usize, width: Length) -> bool {
        let mut twips = itoa::Buffer::new();
        let twips = twips.format(width.to_twips());
        match self.grid.elements_mut().filter(|e| e.name == "w:gridCol").nth(col) {
            Some(grid_col) => {
                grid_col.set_attr("w:w", twips);
                true
            },
            None => false,
        }
    }

    /// Width of grid column `col`.
    pub fn column_width(&self, col: usize) -> Option<Length> {
        let grid_col = self.grid.elements().filter(|e| e.name == "w:gridCol").nth(col)?;
        grid_col.attr("w:w")?.parse().ok().map(Length::twips)
    }

    /// Remove shading from every cell of this table; returns the number removed.
    ///
    /// Cells of nested tables are left alone.
    pub fn remove_cell_shading(&mut self) -> usize {
        self.rows_mut()
            .flat_map(Row::cells_mut)
            .map(Cell::remove_shading)
            .sum()
    }

    pub(crate) fn to_xml(&self, xml: &mut String) {
        let tag = XmlElement {
            name: "w:tbl".to_string(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        };
        tag.write_start(xml, false);
        self.properties.to_xml(xml);
        self.grid.to_xml(xml);
        for item in &self.content {
            match item {
                TableContent::Row(row) => row.to_xml(xml),
                TableContent::Other(node) => node.to_xml(xml),
            }
        }
        tag.write_end(xml);
    }
}

/// Items that can appear directly in a row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowContent {
    Cell(Cell),
    /// Row properties and anything else kept as is
    Other(XmlNode),
}

/// A table row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    attributes: Vec<(String, String)>,
    content: Vec<RowContent>,
}

impl Row {
    fn new(cols: usize, col_width: Length) -> Self {
        Self {
            attributes: Vec::new(),
            content: (0..cols)
                .map(|_| {
                    let mut cell = Cell::new();
                    cell.set_width(col_width);
                    RowContent::Cell(cell)
                })
                .collect(),
        }
    }

    fn from_element(element: XmlElement) -> Self {
        let content = element
            .children
            .into_iter()
            .filter(|n| !n.is_blank_text())
            .map(|node| match node {
                XmlNode::Element(e) if e.name == "w:tc" => RowContent::Cell(Cell::from_element(e)),
                other => RowContent::Other(other),
            })
            .collect();

        Self {
            attributes: element.attributes,
            content,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.content.iter().filter_map(|item| match item {
            RowContent::Cell(c) => Some(c),
            _ => None,
        })
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.content.iter_mut().filter_map(|item| match item {
            RowContent::Cell(c) => Some(c),
            _ => None,
        })
    }

    /// Get the number of cells in this row.
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    /// Get a cell by index.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells().nth(index)
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells_mut().nth(index)
    }

    fn to_xml(&self, xml: &mut String) {
        let tag = XmlElement {
            name: "w:tr".to_string(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        };
        tag.write_start(xml, false);
        for item in &self.content {
            match item {
                RowContent::Cell(cell) => cell.to_xml(xml),
                RowContent::Other(node) => node.to_xml(xml),
            }
        }
        tag.write_end(xml);
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    attributes: Vec<(String, String)>,
    /// `w:tcPr`
    properties: Option<XmlElement>,
    blocks: Vec<Block>,
}

impl Cell {
    fn new() -> Self {
        Self {
            attributes: Vec::new(),
            properties: None,
            blocks: vec![Block::Paragraph(Paragraph::new())],
        }
    }

    fn from_element(element: XmlElement) -> Self {
        let mut properties = None;
        let mut children = Vec::with_capacity(element.children.len());
        for node in element.children {
            match node {
                XmlNode::Element(e) if e.name == "w:tcPr" && properties.is_none() => {
                    properties = Some(e);
                },
                other => children.push(other),
            }
        }

        Self {
            attributes: element.attributes,
            properties,
            blocks: parse_blocks(children),
        }
    }

    /// Visible text of the cell; paragraphs are separated by `\n`.
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace the cell content with a single paragraph holding one run of `text`.
    pub fn set_text(&mut self, text: &str) -> &mut Paragraph {
        self.blocks.clear();
        self.blocks
            .push(Block::Paragraph(Paragraph::with_text(text)));
        match self.blocks.last_mut() {
            Some(Block::Paragraph(p)) => p,
            _ => unreachable!(),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(Block::as_paragraph)
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(Block::as_paragraph_mut)
    }

    /// Preferred cell width, when given in twips.
    pub fn width(&self) -> Option<Length> {
        let tcw = self.properties.as_ref()?.child("w:tcW")?;
        if tcw.attr("w:type").is_some_and(|t| t != "dxa") {
            return None;
        }
        tcw.attr("w:w")?.parse().ok().map(Length::twips)
    }

    /// Set the preferred cell width.
    pub fn set_width(&mut self, width: Length) {
        let mut twips = itoa::Buffer::new();
        let tcw = XmlElement::new("w:tcW")
            .with_attr("w:w", twips.format(width.to_twips()))
            .with_attr("w:type", "dxa");
        self.properties_mut().set_child_ordered(tcw, tcpr_rank);
    }

    /// Background fill of the cell, if shaded.
    pub fn shading(&self) -> Option<&str> {
        self.properties.as_ref()?.child("w:shd")?.attr("w:fill")
    }

    /// Shade the cell with a solid hex RGB fill.
    pub fn set_shading(&mut self, fill: &str) {
        let shd = XmlElement::new("w:shd")
            .with_attr("w:val", "clear")
            .with_attr("w:color", "auto")
            .with_attr("w:fill", fill);
        self.properties_mut().set_child_ordered(shd, tcpr_rank);
    }

    /// Remove direct `w:shd` elements from the cell properties.
    pub fn remove_shading(&mut self) -> usize {
        self.properties
            .as_mut()
            .map_or(0, |p| p.remove_children("w:shd"))
    }

    fn properties_mut(&mut self) -> &mut XmlElement {
        self.properties.get_or_insert_with(|| XmlElement::new("w:tcPr"))
    }

    fn to_xml(&self, xml: &mut String) {
        let tag = XmlElement {
            name: "w:tc".to_string(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        };
        tag.write_start(xml, false);
        if let Some(ref properties) = self.properties {
            properties.to_xml(xml);
        }
        for block in &self.blocks {
            block.to_xml(xml);
        }
        // A cell must end with a paragraph
        if !matches!(self.blocks.last(), Some(Block::Paragraph(_))) {
            xml.push_str("<w:p/>");
        }
        tag.write_end(xml);
    }
}
