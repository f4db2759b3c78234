//! HTML report

use std::io::Write;

use zipdiff_tools::DifferenceReport;

use crate::escape::markup;
use crate::{labels, ExportResult, ReportRenderer};

const STYLE: &str = r#"<style type="text/css">
body, p { font-family: verdana,arial,helvetica; font-size: 80%; color:#000000; }
.diffs { font-family: verdana,arial,helvetica; font-size: 80%; font-weight: bold; text-align:left; background:#a6caf0; }
tr, td { font-family: verdana,arial,helvetica; font-size: 80%; background:#eeeee0; }
</style>"#;

/// Stand-alone HTML page with one table per category
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    /// Leave out the generation time, for reproducible output
    pub omit_timestamp: bool,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_section<'a>(
        out: &mut dyn Write,
        title: &str,
        paths: impl ExactSizeIterator<Item = &'a String>,
    ) -> ExportResult<()> {
        writeln!(out, r#"<table cellspacing="1" cellpadding="3" width="100%" border="0">"#)?;
        writeln!(out, "<tr>")?;
        writeln!(out, r#"<td class="diffs" colspan="2">{} ({} entries)</td>"#, title, paths.len())?;
        writeln!(out, "</tr>")?;
        writeln!(out, "<tr>")?;
        writeln!(out, r#"<td width="20"></td>"#)?;
        writeln!(out, "<td>")?;
        if paths.len() > 0 {
            writeln!(out, "<ul>")?;
            for path in paths {
                writeln!(out, "<li>{}</li>", markup(path))?;
            }
            writeln!(out, "</ul>")?;
        }
        writeln!(out, "</td>")?;
        writeln!(out, "</tr>")?;
        writeln!(out, "</table>")?;
        Ok(())
    }
}

impl ReportRenderer for HtmlRenderer {
    fn render(&self, report: &DifferenceReport, out: &mut dyn Write) -> ExportResult<()> {
        let (label1, label2) = labels(report);

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html>")?;
        writeln!(out, "<head>")?;
        writeln!(out, r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8">"#)?;
        writeln!(out, "<title>File differences</title>")?;
        writeln!(out, "{}", STYLE)?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<p>First file: {}<br>", markup(label1))?;
        writeln!(out, "Second file: {}</p>", markup(label2))?;

        Self::write_section(out, "Added", report.added().keys())?;
        Self::write_section(out, "Removed", report.removed().keys())?;
        Self::write_section(out, "Changed", report.changed().keys())?;

        if !self.omit_timestamp {
            writeln!(out, "<hr>")?;
            writeln!(
                out,
                "<p>Generated at {}</p>",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            )?;
        }
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_and_labels() {
        let mut out = Vec::new();
        HtmlRenderer::new().render(&DifferenceReport::new(), &mut out).unwrap();
        let html = String::from_utf8(out).unwrap();

        assert!(html.contains("First file: filename1.zip<br>"));
        assert!(html.contains("Added (0 entries)"));
        assert!(html.contains("Removed (0 entries)"));
        assert!(html.contains("Changed (0 entries)"));
        assert!(!html.contains("<ul>"));
        assert!(html.contains("Generated at "));
    }

    #[test]
    fn test_labels_are_escaped() {
        let mut out = Vec::new();
        let renderer = HtmlRenderer { omit_timestamp: true };
        renderer
            .render(&DifferenceReport::new().with_labels("a&b.zip", "<c>.zip"), &mut out)
            .unwrap();
        let html = String::from_utf8(out).unwrap();

        assert!(html.contains("First file: a&amp;b.zip"));
        assert!(html.contains("Second file: &lt;c&gt;.zip"));
        assert!(!html.contains("Generated at"));
    }
}
