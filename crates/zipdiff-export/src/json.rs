//! JSON report
//!
//! Emits the labels, per-category counts and the full entry records, so a
//! consumer can see why a path was reported as changed.

use std::io::Write;

use serde_json::json;
use zipdiff_tools::DifferenceReport;

use crate::{labels, ExportResult, ReportRenderer};

/// JSON export options
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    /// Use pretty-print formatting
    pub pretty: bool,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the document without writing it anywhere
    pub fn to_value(report: &DifferenceReport) -> serde_json::Value {
        let (label1, label2) = labels(report);

        let changed: Vec<_> = report
            .changed()
            .iter()
            .map(|(path, (first, second))| {
                json!({
                    "path": path,
                    "first": first,
                    "second": second,
                })
            })
            .collect();

        json!({
            "filename1": label1,
            "filename2": label2,
            "summary": {
                "added": report.added().len(),
                "removed": report.removed().len(),
                "changed": report.changed().len(),
                "total": report.difference_count(),
            },
            "added": report.added().values().collect::<Vec<_>>(),
            "removed": report.removed().values().collect::<Vec<_>>(),
            "changed": changed,
        })
    }
}

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &DifferenceReport, out: &mut dyn Write) -> ExportResult<()> {
        let value = Self::to_value(report);
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, &value)?;
        } else {
            serde_json::to_writer(&mut *out, &value)?;
        }
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
