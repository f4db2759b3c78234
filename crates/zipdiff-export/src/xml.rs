//! XML report

use std::io::Write;

use zipdiff_tools::DifferenceReport;

use crate::escape::markup;
use crate::{labels, ExportResult, ReportRenderer};

/// `<zipdiff>` document listing each difference as an element
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlRenderer;

impl XmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ReportRenderer for XmlRenderer {
    fn render(&self, report: &DifferenceReport, out: &mut dyn Write) -> ExportResult<()> {
        let (label1, label2) = labels(report);

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<zipdiff filename1="{}" filename2="{}">"#,
            markup(label1),
            markup(label2)
        )?;
        writeln!(out, "<differences>")?;
        for path in report.added().keys() {
            writeln!(out, "<added>{}</added>", markup(path))?;
        }
        for path in report.removed().keys() {
            writeln!(out, "<removed>{}</removed>", markup(path))?;
        }
        for path in report.changed().keys() {
            writeln!(out, "<changed>{}</changed>", markup(path))?;
        }
        writeln!(out, "</differences>")?;
        writeln!(out, "</zipdiff>")?;
        out.flush()?;
        Ok(())
    }
}
