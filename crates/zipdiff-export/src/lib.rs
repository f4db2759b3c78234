//! zipdiff Export Pipeline
//!
//! Renders a [`DifferenceReport`] for people and tools:
//! - Text (console summary)
//! - HTML (browsable page)
//! - XML and JSON (machine readable)
//! - Zip (the added and changed entries of the second archive)

pub mod format;
pub mod html;
pub mod json;
pub mod rebuild;
pub mod text;
pub mod xml;

mod escape;

use std::io::Write;

use thiserror::Error;
use zipdiff_tools::DifferenceReport;

pub use format::{renderer_for, OutputFormat};
pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use rebuild::ZipRebuilder;
pub use text::TextRenderer;
pub use xml::XmlRenderer;

/// Label used when the first source has no name
pub const DEFAULT_LABEL1: &str = "filename1.zip";

/// Label used when the second source has no name
pub const DEFAULT_LABEL2: &str = "filename2.zip";

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Archive(#[from] zipdiff_core::Error),

    #[error("Export failed: {0}")]
    ExportFailed(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Options shared by every renderer
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Leading path segments removed from entry names written by the
    /// archive rebuilder
    pub skip_output_prefixes: usize,
}

/// Something that can turn a report into bytes
pub trait ReportRenderer {
    fn render(&self, report: &DifferenceReport, out: &mut dyn Write) -> ExportResult<()>;
}

/// Both labels, falling back to the placeholders
pub(crate) fn labels(report: &DifferenceReport) -> (&str, &str) {
    (
        report.filename1().unwrap_or(DEFAULT_LABEL1),
        report.filename2().unwrap_or(DEFAULT_LABEL2),
    )
}
