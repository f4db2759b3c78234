//! Comparison result

use std::collections::BTreeMap;

use serde::Serialize;
use zipdiff_core::EntryRecord;

/// Outcome of comparing two archives
///
/// Every category is keyed by logical path and iterates in path order.
/// A path appears in at most one of added, removed and changed. The
/// report is filled by a single comparison and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DifferenceReport {
    filename1: Option<String>,
    filename2: Option<String>,
    added: BTreeMap<String, EntryRecord>,
    removed: BTreeMap<String, EntryRecord>,
    changed: BTreeMap<String, (EntryRecord, EntryRecord)>,
    ignored: BTreeMap<String, EntryRecord>,
}

impl DifferenceReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the names of the two compared sources
    pub fn with_labels(mut self, filename1: impl Into<String>, filename2: impl Into<String>) -> Self {
        self.filename1 = Some(filename1.into());
        self.filename2 = Some(filename2.into());
        self
    }

    pub fn filename1(&self) -> Option<&str> {
        self.filename1.as_deref()
    }

    pub fn filename2(&self) -> Option<&str> {
        self.filename2.as_deref()
    }

    /// Entries only in the second archive
    pub fn added(&self) -> &BTreeMap<String, EntryRecord> {
        &self.added
    }

    /// Entries only in the first archive
    pub fn removed(&self) -> &BTreeMap<String, EntryRecord> {
        &self.removed
    }

    /// Entries in both archives that differ, as (first, second)
    pub fn changed(&self) -> &BTreeMap<String, (EntryRecord, EntryRecord)> {
        &self.changed
    }

    /// Never filled by the aggregation; kept for consumers of the report
    pub fn ignored(&self) -> &BTreeMap<String, EntryRecord> {
        &self.ignored
    }

    /// Whether anything was added, removed or changed
    pub fn has_differences(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.changed.is_empty()
    }

    /// Number of added, removed and changed paths together
    pub fn difference_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    pub(crate) fn file_added(&mut self, path: &str, record: EntryRecord) {
        self.added.insert(path.to_string(), record);
    }

    pub(crate) fn file_removed(&mut self, path: &str, record: EntryRecord) {
        self.removed.insert(path.to_string(), record);
    }

    pub(crate) fn file_changed(&mut self, path: &str, first: EntryRecord, second: EntryRecord) {
        self.changed.insert(path.to_string(), (first, second));
    }
}
