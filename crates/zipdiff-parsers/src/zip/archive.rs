// zipdiff-parsers/src/zip/archive.rs
//! Zip container table of contents

use std::collections::HashMap;
use super::entry::ZipEntry;

/// Parsed zip table of contents
#[derive(Debug, Default)]
pub struct ZipArchive {
    /// All entries in central directory order
    pub entries: Vec<ZipEntry>,
    /// Path to entry index mapping for fast lookup
    pub path_index: HashMap<String, usize>,
}

impl ZipArchive {
    /// Get total number of entries
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Get an entry by path
    pub fn get(&self, path: &str) -> Option<&ZipEntry> {
        self.path_index.get(path).map(|idx| &self.entries[*idx])
    }

    /// Check if path exists in archive
    pub fn contains(&self, path: &str) -> bool {
        self.path_index.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::CompressionMethod;
    use zipdiff_core::DosDateTime;

    fn make_test_archive() -> ZipArchive {
        let entries = vec![
            ("META-INF/", true),
            ("META-INF/MANIFEST.MF", false),
            ("WEB-INF/", true),
            ("WEB-INF/web.xml", false),
            ("index.jsp", false),
        ];

        let entries: Vec<_> = entries
            .iter()
            .map(|(path, is_dir)| ZipEntry {
                path: path.to_string(),
                compression: CompressionMethod::Store,
                crc32: 0,
                compressed_size: 100,
                uncompressed_size: 100,
                local_header_offset: 0,
                flags: 0,
                modified: DosDateTime::default(),
                is_encrypted: false,
                is_directory: *is_dir,
            })
            .collect();

        let mut path_index = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            path_index.insert(entry.path.clone(), idx);
        }

        ZipArchive { entries, path_index }
    }

    #[test]
    fn test_entry_count() {
        let archive = make_test_archive();
        assert_eq!(archive.entry_count(), 5);
    }

    #[test]
    fn test_lookup() {
        let archive = make_test_archive();
        assert!(archive.contains("WEB-INF/web.xml"));
        assert!(!archive.contains("WEB-INF/missing.xml"));
        assert_eq!(archive.get("index.jsp").map(|e| e.uncompressed_size), Some(100));
        assert!(ZipArchive::default().get("index.jsp").is_none());
    }
}
