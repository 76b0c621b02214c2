//! docx-tidy - post-processing for Word (.docx) documents
//!
//! The library works on the main document part of a `.docx` package and
//! offers two transformations:
//!
//! - **Normalization**: removes blank paragraphs without runs, strips page
//!   breaks from otherwise empty paragraphs and collapses runs of consecutive
//!   empty paragraphs to one.
//! - **Table building**: renders header/row definitions into styled tables
//!   with centred headers, uniform plain borders and no cell shading.
//!
//! Everything the transformations do not touch, including unknown XML and
//! other package parts, is written back unchanged.
//!
//! # Example - Cleaning a document
//!
//! ```no_run
//! use docx_tidy::{Document, normalize};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::open("report.docx")?;
//! let summary = normalize(&mut doc);
//! println!("removed {} blank paragraphs", summary.pruned + summary.collapsed);
//! doc.save("report-cleaned.docx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Building a table
//!
//! ```no_run
//! use docx_tidy::{Document, Length, TableSpec, build_table};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::new();
//! doc.add_heading("List of Tables", 1)?;
//! let spec = TableSpec::new(["Table No.", "Title", "Page No."])
//!     .with_row(["1", "Cost Analysis", "27"])
//!     .with_column_widths(vec![Length::cm(3.0), Length::cm(10.0), Length::cm(2.5)]);
//! build_table(&mut doc, &spec)?;
//! doc.save("tables.docx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Running jobs from a configuration file
//!
//! ```no_run
//! use docx_tidy::{Config, pipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("jobs.yaml")?;
//! pipeline::run(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod docx;
pub mod error;
pub mod normalize;
pub mod opc;
pub mod pipeline;
pub mod report;
pub mod table;

pub use common::{Length, LengthUnit};
pub use config::Config;
pub use docx::Document;
pub use error::{Error, Result};
pub use normalize::{NormalizeSummary, normalize};
pub use report::{ReportLayout, ReportSection};
pub use table::{TableBuilder, TableSpec, TableStyle, build_table};
