//! Comparison entry points

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use zipdiff_core::{Error, Result, ResultExt};

use crate::config::DiffConfig;
use crate::enumerate::{EntryMapping, enumerate_file};
use crate::equivalence::entries_match;
use crate::report::DifferenceReport;

/// Fail unless `path` is an existing, readable regular file
pub fn check_input(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::InputNotFound(path.to_path_buf()),
        _ => Error::InputUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    if metadata.is_dir() {
        return Err(Error::InputUnreadable {
            path: path.to_path_buf(),
            reason: "is a directory".to_string(),
        });
    }

    File::open(path).map_err(|e| Error::InputUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(())
}

/// Compare two entry mappings
///
/// Paths excluded by the configured filter are left out of every
/// category, including mappings that were built without filtering.
pub fn compare_mappings(first: &EntryMapping, second: &EntryMapping, config: &DiffConfig) -> DifferenceReport {
    let filter = config.path_filter();
    let mut report = DifferenceReport::new();

    let second_only = second.paths().filter(|path| !first.contains(path));
    for path in first.paths().chain(second_only) {
        if filter.should_ignore("", path) {
            tracing::debug!(path, "excluded from comparison");
            continue;
        }

        match (first.get(path), second.get(path)) {
            (Some(old), None) => report.file_removed(path, old.clone()),
            (None, Some(new)) => report.file_added(path, new.clone()),
            (Some(old), Some(new)) => {
                if !entries_match(old, new, config) {
                    report.file_changed(path, old.clone(), new.clone());
                }
            }
            (None, None) => {}
        }
    }

    tracing::info!(
        added = report.added().len(),
        removed = report.removed().len(),
        changed = report.changed().len(),
        "comparison complete"
    );
    report
}

/// Compare the archives at `path1` and `path2`
///
/// The report is labelled with both paths as given.
pub fn compare_files(path1: &Path, path2: &Path, config: &DiffConfig) -> Result<DifferenceReport> {
    check_input(path1)?;
    check_input(path2)?;

    let first = enumerate_file(path1, config.skip_prefixes1, config)
        .with_context(|| format!("reading {}", path1.display()))?;
    let second = enumerate_file(path2, config.skip_prefixes2, config)
        .with_context(|| format!("reading {}", path2.display()))?;

    Ok(compare_mappings(&first, &second, config)
        .with_labels(path1.display().to_string(), path2.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipdiff_core::{DosDateTime, EntryRecord};

    fn record(path: &str, crc32: u32) -> EntryRecord {
        EntryRecord {
            path: path.into(),
            entry_name: path.into(),
            is_directory: false,
            uncompressed_size: 4,
            compressed_size: 4,
            modified: DosDateTime::default(),
            crc32,
        }
    }

    fn mapping(records: &[(&str, u32)]) -> EntryMapping {
        records.iter().map(|(path, crc)| record(path, *crc)).collect()
    }

    #[test]
    fn test_partitions_paths() {
        let first = mapping(&[("A", 1), ("same", 7), ("edited", 1)]);
        let second = mapping(&[("B", 1), ("same", 7), ("edited", 2)]);

        let report = compare_mappings(&first, &second, &DiffConfig::default());
        assert_eq!(report.added().keys().collect::<Vec<_>>(), ["B"]);
        assert_eq!(report.removed().keys().collect::<Vec<_>>(), ["A"]);
        assert_eq!(report.changed().keys().collect::<Vec<_>>(), ["edited"]);
        assert_eq!(report.changed()["edited"].1.crc32, 2);
        assert!(report.filename1().is_none());
    }

    #[test]
    fn test_filter_applies_to_unfiltered_mappings() {
        let first = mapping(&[("keep", 1), ("build/out.o", 1)]);
        let second = mapping(&[("keep", 2), ("src/CVS/Root", 1)]);
        let config = DiffConfig::builder()
            .ignore_vcs_metadata(true)
            .exclusion_pattern("build/.*")
            .build()
            .unwrap();

        let report = compare_mappings(&first, &second, &config);
        assert!(report.added().is_empty());
        assert!(report.removed().is_empty());
        assert_eq!(report.changed().len(), 1);
        assert!(report.ignored().is_empty());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_input(&dir.path().join("nope.zip")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_directory_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_input(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InputUnreadable { .. }));
    }
}
