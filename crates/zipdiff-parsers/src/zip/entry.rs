// zipdiff-parsers/src/zip/entry.rs
//! Zip archive entry structures

use super::CompressionMethod;
use zipdiff_core::{DosDateTime, EntryRecord};

/// Represents a single entry in a zip central directory
#[derive(Debug, Clone)]
pub struct ZipEntry {
    /// Full path within the archive
    pub path: String,
    /// Compression method used
    pub compression: CompressionMethod,
    /// CRC32 checksum of uncompressed data
    pub crc32: u32,
    /// Size of compressed data
    pub compressed_size: u64,
    /// Size of uncompressed data
    pub uncompressed_size: u64,
    /// Offset to local file header
    pub local_header_offset: u64,
    /// General purpose bit flags
    pub flags: u16,
    /// DOS modification date and time
    pub modified: DosDateTime,
    /// Whether entry is encrypted
    pub is_encrypted: bool,
    /// Whether entry is a directory
    pub is_directory: bool,
}

impl ZipEntry {
    /// Describe this entry under the logical name `path`
    pub fn to_record(&self, path: impl Into<String>) -> EntryRecord {
        EntryRecord {
            path: path.into(),
            entry_name: self.path.clone(),
            is_directory: self.is_directory,
            uncompressed_size: self.uncompressed_size,
            compressed_size: self.compressed_size,
            modified: self.modified,
            crc32: self.crc32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_entry(path: &str) -> ZipEntry {
        ZipEntry {
            path: path.to_string(),
            compression: CompressionMethod::Store,
            crc32: 0,
            compressed_size: 100,
            uncompressed_size: 100,
            local_header_offset: 0,
            flags: 0,
            modified: DosDateTime::default(),
            is_encrypted: false,
            is_directory: path.ends_with('/'),
        }
    }

    #[test]
    fn test_to_record_keeps_raw_name() {
        let mut entry = make_test_entry("app/lib/core.jar");
        entry.crc32 = 0xCAFEBABE;

        let record = entry.to_record("lib/core.jar");
        assert_eq!(record.path, "lib/core.jar");
        assert_eq!(record.entry_name, "app/lib/core.jar");
        assert_eq!(record.crc32, 0xCAFEBABE);
        assert!(!record.is_directory);
    }
}
