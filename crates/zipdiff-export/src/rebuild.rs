//! Archive rebuilder
//!
//! Writes a new zip holding every added or changed entry of the second
//! archive, so the result can be laid over the first one. Entries of
//! nested archives have no entry of their own in the second archive and
//! are left out; the embedding archive itself is copied when it changed.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use zipdiff_core::NESTED_ARCHIVE_MARKER;
use zipdiff_parsers::{Parser, ZipParser, ZipWriter};
use zipdiff_tools::{check_input, strip_prefix, DifferenceReport};

use crate::{ExportError, ExportResult, RenderOptions, ReportRenderer};

/// Copies added and changed entries out of the second archive
#[derive(Debug, Clone, Default)]
pub struct ZipRebuilder {
    skip_output_prefixes: usize,
    source: Option<PathBuf>,
}

impl ZipRebuilder {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            skip_output_prefixes: options.skip_output_prefixes,
            source: None,
        }
    }

    /// Read entries from `path` instead of the report's second label
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Raw names, inside the second archive, of the entries to copy
    pub fn selected_entries(report: &DifferenceReport) -> BTreeSet<&str> {
        let changed = report.changed().iter().map(|(path, (_, second))| (path, second));

        report
            .added()
            .iter()
            .chain(changed)
            .filter(|(path, _)| !path.contains(NESTED_ARCHIVE_MARKER))
            .map(|(_, record)| record.entry_name.as_str())
            .collect()
    }
}

impl ReportRenderer for ZipRebuilder {
    fn render(&self, report: &DifferenceReport, out: &mut dyn Write) -> ExportResult<()> {
        let source = match (&self.source, report.filename2()) {
            (Some(path), _) => path.clone(),
            (None, Some(label)) => PathBuf::from(label),
            (None, None) => {
                return Err(ExportError::ExportFailed(
                    "no second archive to copy entries from".to_string(),
                ))
            }
        };
        check_input(&source)?;
        let label = source.display().to_string();

        let parser = ZipParser::new();
        let mut reader = BufReader::new(File::open(&source)?);
        let archive = parser
            .parse(&mut reader)
            .map_err(|e| e.into_archive_error(&label))?;

        let mut writer = ZipWriter::new(out);
        let mut written = BTreeSet::new();

        for name in Self::selected_entries(report) {
            let entry = archive.get(name).ok_or_else(|| {
                ExportError::ExportFailed(format!("{} has no entry named {}", label, name))
            })?;

            let target = match strip_prefix(name, self.skip_output_prefixes) {
                Some(stripped) if !stripped.is_empty() => stripped,
                _ => {
                    tracing::debug!(entry = name, "nothing left after stripping, skipped");
                    continue;
                }
            };
            if !written.insert(target) {
                tracing::warn!(entry = name, output = target, "output name already written, skipped");
                continue;
            }

            let raw = parser
                .read_raw(&mut reader, entry)
                .map_err(|e| e.into_archive_error(&label))?;
            writer
                .add_raw(target, entry, &raw)
                .map_err(|e| e.into_archive_error("rebuilt archive"))?;
            tracing::debug!(entry = name, output = target, "copied");
        }

        tracing::info!(entries = writer.len(), "archive rebuilt");
        writer
            .finish()
            .map_err(|e| e.into_archive_error("rebuilt archive"))?;
        Ok(())
    }
}
