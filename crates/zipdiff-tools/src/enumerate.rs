//! Archive entry enumeration
//!
//! Flattens an archive, and every archive embedded in it, into one
//! [`EntryMapping`] keyed by logical path. Entries of an embedded archive
//! are named `<path of the embedding entry>!<inner name>`.

use std::collections::HashMap;
use std::collections::hash_map;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use zipdiff_core::{EntryRecord, Error, NESTED_ARCHIVE_MARKER, Result};
use zipdiff_parsers::{Parser, ZipParser};

use crate::config::DiffConfig;
use crate::filter::PathFilter;
use crate::prefix::strip_prefix;

/// Logical path to entry record, one per archive side
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMapping {
    entries: HashMap<String, EntryRecord>,
}

impl EntryMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&EntryRecord> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Logical paths, in no particular order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, EntryRecord> {
        self.entries.iter()
    }

    /// Insert under the record's own path; a previous record is replaced and returned
    pub(crate) fn insert(&mut self, record: EntryRecord) -> Option<EntryRecord> {
        self.entries.insert(record.path.clone(), record)
    }
}

impl FromIterator<EntryRecord> for EntryMapping {
    /// Later records win over earlier ones with the same path
    fn from_iter<I: IntoIterator<Item = EntryRecord>>(iter: I) -> Self {
        let mut mapping = EntryMapping::new();
        for record in iter {
            mapping.insert(record);
        }
        mapping
    }
}

impl<'a> IntoIterator for &'a EntryMapping {
    type Item = (&'a String, &'a EntryRecord);
    type IntoIter = hash_map::Iter<'a, String, EntryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Enumerate the archive at `path`, stripping `skip_prefixes` leading
/// segments from top-level names
pub fn enumerate_file(path: &Path, skip_prefixes: usize, config: &DiffConfig) -> Result<EntryMapping> {
    let label = path.display().to_string();
    let file = File::open(path).map_err(|e| Error::InputUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mapping = zipdiff_parsers::logging::instrument_parse("enumerate", || {
        enumerate_reader(BufReader::new(file), &label, skip_prefixes, config)
    })?;

    tracing::info!(archive = %label, entries = mapping.len(), "archive enumerated");
    Ok(mapping)
}

/// Enumerate an archive held by any seekable reader
///
/// `label` names the archive in error messages.
pub fn enumerate_reader<R: Read + Seek>(
    mut reader: R,
    label: &str,
    skip_prefixes: usize,
    config: &DiffConfig,
) -> Result<EntryMapping> {
    let enumerator = Enumerator {
        parser: ZipParser::with_options(config.parse_options.clone()),
        filter: config.path_filter(),
    };

    let mut mapping = EntryMapping::new();
    enumerator.walk(&mut reader, label, "", skip_prefixes, &mut mapping)?;
    Ok(mapping)
}

struct Enumerator<'a> {
    parser: ZipParser,
    filter: PathFilter<'a>,
}

impl Enumerator<'_> {
    /// Add every entry of one archive level, descending into embedded archives
    fn walk<R: Read + Seek>(
        &self,
        reader: &mut R,
        label: &str,
        prefix: &str,
        skip_prefixes: usize,
        mapping: &mut EntryMapping,
    ) -> Result<()> {
        let archive = self
            .parser
            .parse(&mut *reader)
            .map_err(|e| e.into_archive_error(label))?;

        for entry in &archive.entries {
            let raw_path = format!("{}{}", prefix, entry.path);

            if self.filter.should_ignore(prefix, &raw_path) {
                tracing::debug!(path = %raw_path, "excluded");
                continue;
            }

            let path = match strip_prefix(&raw_path, skip_prefixes) {
                Some(stripped) if !stripped.is_empty() => stripped.to_string(),
                _ => {
                    tracing::debug!(path = %raw_path, skip_prefixes, "dropped by prefix stripping");
                    continue;
                }
            };

            tracing::debug!(path = %path, "entry");
            if mapping.insert(entry.to_record(path.as_str())).is_some() {
                tracing::warn!(archive = %label, path = %path, "duplicate entry path, keeping the later one");
            }

            if entry.is_directory || !self.parser.handles_name(&path) {
                continue;
            }

            let nested_label = format!("{}{}{}", label, NESTED_ARCHIVE_MARKER, entry.path);
            let data = self
                .parser
                .extract_data(reader, entry)
                .map_err(|e| e.into_archive_error(&nested_label))?;

            tracing::debug!(archive = %nested_label, bytes = data.len(), "descending into nested archive");
            let nested_prefix = format!("{}{}", path, NESTED_ARCHIVE_MARKER);
            self.walk(&mut Cursor::new(data), &nested_label, &nested_prefix, 0, mapping)?;
        }

        Ok(())
    }
}
