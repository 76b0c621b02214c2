//! Job configuration.
//!
//! A configuration file is YAML:
//!
//! ```yaml
//! style:
//!   header_font_size: 11pt
//!   body_font_size: 10pt
//!   border: { style: single, weight: 0.5pt, color: "000000" }
//!
//! clean:
//!   input: report.docx
//!   output: report-cleaned.docx
//!
//! report:
//!   output: tables.docx
//!   margins: { top: 2.54, bottom: 2.54, left: 2.54, right: 2.54 }
//!   sections:
//!     - heading: { text: List of Tables, level: 1, alignment: center }
//!       table:
//!         headers: [Table No., Title, Page No.]
//!         rows:
//!           - [1, Cost Analysis, 27]
//!         column_widths: [3, 10, 2.5]
//!       page_break_after: true
//! ```
//!
//! Lengths accept a unit suffix (`cm`, `mm`, `in`, `pt`, `twip`, `emu`); bare
//! numbers are centimetres.

use crate::docx::Margins;
use crate::error::{Error, Result};
use crate::report::{ReportLayout, ReportSection};
use crate::table::TableStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration: table style plus the jobs to run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style: TableStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<CleanJob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportJob>,
}

/// Normalize an existing document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Generate a new document from a report layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportJob {
    pub output: PathBuf,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub sections: Vec<ReportSection>,
}

impl ReportJob {
    pub fn layout(&self) -> ReportLayout {
        ReportLayout {
            margins: self.margins,
            sections: self.sections.clone(),
        }
    }
}

impl Config {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.display().to_string()));
        }
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize the configuration back to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::Length;
    use crate::docx::{ParagraphAlignment, TableBorderStyle};
    use crate::table::CellValue;

    const SAMPLE: &str = r#"
style:
  header_font_size: 12pt
  border:
    style: double
    weight: 1pt
clean:
  input: in.docx
  output: out.docx
report:
  output: tables.docx
  margins: { top: 2.54, bottom: 2.54, left: 1in, right: 25mm }
  sections:
    - heading: { text: List of Tables, alignment: center }
      table:
        headers: [Table No., Title, Page No.]
        rows:
          - [1, Cost Analysis, "27"]
          - [2.5, true, x]
        column_widths: [3, 10cm, 2.5]
      page_break_after: true
    - table:
        headers: [A]
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(config.style.header_font_size, Length::pt(12.0));
        assert_eq!(config.style.body_font_size, Length::pt(10.0));
        assert_eq!(config.style.border.style, TableBorderStyle::Double);
        assert_eq!(config.style.border.color, "000000");

        let clean = config.clean.unwrap();
        assert_eq!(clean.input, PathBuf::from("in.docx"));

        let report = config.report.unwrap();
        assert_eq!(report.margins.left, Length::inches(1.0));
        assert_eq!(report.margins.right, Length::mm(25.0));
        assert_eq!(report.sections.len(), 2);

        let first = &report.sections[0];
        let heading = first.heading.as_ref().unwrap();
        assert_eq!(heading.level, 1);
        assert_eq!(heading.alignment, Some(ParagraphAlignment::Center));
        assert_eq!(first.spacing_before, 1);
        assert!(first.page_break_after);
        assert_eq!(
            first.table.rows[0],
            [
                CellValue::Integer(1),
                CellValue::Text("Cost Analysis".to_string()),
                CellValue::Text("27".to_string())
            ]
        );
        assert_eq!(first.table.rows[1][0], CellValue::Float(2.5));
        assert_eq!(first.table.rows[1][1], CellValue::Bool(true));
        assert_eq!(
            first.table.column_widths,
            Some(vec![Length::cm(3.0), Length::cm(10.0), Length::cm(2.5)])
        );

        assert!(report.sections[1].heading.is_none());
        assert!(report.sections[1].table.rows.is_empty());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.clean.is_none());
    }

    #[test]
    fn test_invalid_length_is_config_error() {
        let err = Config::from_yaml_str("style:\n  body_font_size: 10furlongs\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        assert!(Config::load(&path).unwrap().report.is_some());
        assert!(matches!(
            Config::load(dir.path().join("missing.yaml")),
            Err(Error::InputNotFound(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config {
            clean: Some(CleanJob {
                input: PathBuf::from("in.docx"),
                output: PathBuf::from("out.docx"),
            }),
            ..Config::default()
        };
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(Config::from_yaml_str(&yaml).unwrap(), config);
    }
}
