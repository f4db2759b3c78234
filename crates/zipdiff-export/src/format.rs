//! Output format selection

use std::path::Path;

use crate::{
    HtmlRenderer, JsonRenderer, RenderOptions, ReportRenderer, TextRenderer, XmlRenderer,
    ZipRebuilder,
};

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Xml,
    Json,
    Zip,
}

impl OutputFormat {
    /// Pick the format from the output file's extension
    ///
    /// No destination, or `-`, means text on stdout. Unknown extensions
    /// fall back to text.
    pub fn from_output_path(path: Option<&Path>) -> Self {
        let Some(path) = path.filter(|p| p.as_os_str() != "-") else {
            return OutputFormat::Text;
        };

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("txt") => OutputFormat::Text,
            Some("html") | Some("htm") => OutputFormat::Html,
            Some("xml") => OutputFormat::Xml,
            Some("json") => OutputFormat::Json,
            Some("zip") => OutputFormat::Zip,
            _ => {
                tracing::warn!(path = %path.display(), "unknown output extension, using text output");
                OutputFormat::Text
            }
        }
    }
}

/// Renderer for `format`
pub fn renderer_for(format: OutputFormat, options: &RenderOptions) -> Box<dyn ReportRenderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer::new()),
        OutputFormat::Html => Box::new(HtmlRenderer::new()),
        OutputFormat::Xml => Box::new(XmlRenderer::new()),
        OutputFormat::Json => Box::new(JsonRenderer::new()),
        OutputFormat::Zip => Box::new(ZipRebuilder::new(options)),
    }
}
