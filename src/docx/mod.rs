//! Typed WordprocessingML document tree.
//!
//! Only the nodes the transformations work on are modelled: body blocks,
//! paragraphs, runs, break markers, tables, rows and cells. Everything else
//! is kept as raw XML at its original position so a load/save round trip does
//! not lose content.

pub mod body;
pub mod document;
pub mod format;
pub mod paragraph;
pub mod run;
pub mod table;

pub use body::{Block, Body};
pub use document::Document;
pub use format::{
    Margins, ParagraphAlignment, TableAlignment, TableBorder, TableBorderStyle, TableBorders,
};
pub use paragraph::{Paragraph, ParagraphContent};
pub use run::{Break, BreakKind, Run, RunContent};
pub use table::{Cell, Row, RowContent, Table, TableContent};
