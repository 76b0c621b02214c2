//! The two document jobs: cleaning an existing document and generating a
//! table report.

use crate::config::{CleanJob, Config, ReportJob};
use crate::docx::Document;
use crate::error::Result;
use crate::normalize::{NormalizeSummary, normalize};
use crate::table::TableStyle;
use log::info;

/// Load `job.input`, normalize its paragraphs and save to `job.output`.
pub fn clean(job: &CleanJob) -> Result<NormalizeSummary> {
    let mut doc = Document::open(&job.input)?;
    let summary = normalize(&mut doc);
    doc.save(&job.output)?;

    info!(
        "Cleaned document saved to {} ({} pruned, {} page breaks stripped, {} blank paragraphs collapsed)",
        job.output.display(),
        summary.pruned,
        summary.breaks_stripped,
        summary.collapsed
    );
    Ok(summary)
}

/// Render the job's report layout and save it to `job.output`.
pub fn generate_report(job: &ReportJob, style: &TableStyle) -> Result<()> {
    let mut doc = job.layout().render(style)?;
    doc.save(&job.output)?;

    info!(
        "Report with {} tables saved to {}",
        doc.tables().count(),
        job.output.display()
    );
    Ok(())
}

/// Run every job present in `config`: clean first, then report.
pub fn run(config: &Config) -> Result<()> {
    if let Some(ref job) = config.clean {
        clean(job)?;
    }
    if let Some(ref job) = config.report {
        generate_report(job, &config.style)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::document::tests::docx_with_body;
    use crate::error::Error;
    use crate::report::ReportSection;
    use crate::table::TableSpec;
    use crate::docx::Margins;

    #[test]
    fn test_clean_job() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        let output = dir.path().join("out.docx");
        std::fs::write(
            &input,
            docx_with_body(
                r#"<w:p/><w:p><w:r><w:br w:type="page"/></w:r></w:p><w:p><w:r/></w:p><w:p><w:r><w:t>Body</w:t></w:r></w:p><w:sectPr/>"#,
            ),
        )
        .unwrap();

        let summary = clean(&CleanJob {
            input: input.clone(),
            output: output.clone(),
        })
        .unwrap();
        assert_eq!(summary.pruned, 1);
        assert_eq!(summary.breaks_stripped, 1);
        assert_eq!(summary.collapsed, 1);

        let cleaned = Document::open(&output).unwrap();
        let texts: Vec<_> = cleaned.paragraphs().map(|p| p.text()).collect();
        assert_eq!(texts, ["", "Body"]);
        assert_eq!(
            cleaned.package().part("word/custom.bin"),
            Document::open(&input).unwrap().package().part("word/custom.bin")
        );
    }

    #[test]
    fn test_clean_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let job = CleanJob {
            input: dir.path().join("missing.docx"),
            output: dir.path().join("out.docx"),
        };
        assert!(matches!(clean(&job), Err(Error::InputNotFound(_))));
        assert!(!job.output.exists());
    }

    #[test]
    fn test_generate_report() {
        let dir = tempfile::tempdir().unwrap();
        let job = ReportJob {
            output: dir.path().join("tables.docx"),
            margins: Margins::default(),
            sections: vec![
                ReportSection::new(TableSpec::new(["A", "B"]).with_row(["1", "2"])),
                ReportSection::new(TableSpec::new(["C"]).with_row(["3"])),
            ],
        };
        generate_report(&job, &TableStyle::default()).unwrap();

        let doc = Document::open(&job.output).unwrap();
        assert_eq!(doc.tables().count(), 2);
        assert_eq!(doc.tables().next().unwrap().cell(1, 1).unwrap().text(), "2");
    }

    #[test]
    fn test_invalid_report_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = ReportJob {
            output: dir.path().join("tables.docx"),
            margins: Margins::default(),
            sections: vec![ReportSection::new(TableSpec::new(["A", "B"]).with_row(["1"]))],
        };
        assert!(generate_report(&job, &TableStyle::default()).is_err());
        assert!(!job.output.exists());
    }

    #[test]
    fn test_run_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!(
            "report:\n  output: {}\n  sections:\n    - table:\n        headers: [X]\n        rows: [[1]]\n",
            dir.path().join("r.docx").display()
        );
        let config = Config::from_yaml_str(&yaml).unwrap();
        run(&config).unwrap();
        assert!(dir.path().join("r.docx").exists());
    }
}
