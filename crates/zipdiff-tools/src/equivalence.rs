//! Entry equivalence

use zipdiff_core::EntryRecord;

use crate::config::DiffConfig;

/// Whether two records under the same path count as unchanged
///
/// Directory flag and both sizes are always compared. The modification
/// time is compared unless `ignore_timestamps` is set, the CRC-32 only
/// when `compare_checksums` is set.
pub fn entries_match(a: &EntryRecord, b: &EntryRecord, config: &DiffConfig) -> bool {
    if a.is_directory != b.is_directory {
        return false;
    }

    if a.uncompressed_size != b.uncompressed_size || a.compressed_size != b.compressed_size {
        return false;
    }

    if !config.ignore_timestamps && a.modified != b.modified {
        return false;
    }

    !config.compare_checksums || a.crc32 == b.crc32
}
