//! Plain-text summary

use std::fmt::Write as _;
use std::io::Write;

use zipdiff_tools::DifferenceReport;

use crate::{labels, ExportResult, ReportRenderer};

/// Console-style listing of every difference
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    /// The summary without a trailing newline
    pub fn to_text(report: &DifferenceReport) -> String {
        let (_, label2) = labels(report);
        let mut text = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(text, "{} added to {}", files_were(report.added().len()), label2);
        for path in report.added().keys() {
            let _ = writeln!(text, "\t[added] {}", path);
        }

        let _ = writeln!(text, "{} removed from {}", files_were(report.removed().len()), label2);
        for path in report.removed().keys() {
            let _ = writeln!(text, "\t[removed] {}", path);
        }

        match report.changed().len() {
            1 => text.push_str("1 file changed\n"),
            n => {
                let _ = writeln!(text, "{} files changed", n);
            }
        }
        for (path, (first, second)) in report.changed() {
            let _ = writeln!(
                text,
                "\t[changed] {}  ( size {} : {} )",
                path, first.uncompressed_size, second.uncompressed_size
            );
        }

        let _ = write!(text, "Total differences: {}", report.difference_count());
        text
    }
}

fn files_were(count: usize) -> String {
    match count {
        1 => "1 file was".to_string(),
        n => format!("{} files were", n),
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &DifferenceReport, out: &mut dyn Write) -> ExportResult<()> {
        writeln!(out, "{}", Self::to_text(report))?;
        out.flush()?;
        Ok(())
    }
}
