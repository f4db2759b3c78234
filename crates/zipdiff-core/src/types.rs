//! Common types used across zipdiff
//!
//! This module provides the entry record shared by the codec, the
//! comparison engine and the renderers.

use serde::{Deserialize, Serialize};

/// Separator between an embedded archive's logical path and the entries inside it
pub const NESTED_ARCHIVE_MARKER: char = '!';

/// Modification time as stored in a zip header (MS-DOS date and time words)
///
/// Resolution is two seconds. Two values are equal exactly when both words
/// are equal, which is the precision the container guarantees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DosDateTime {
    pub date: u16,
    pub time: u16,
}

impl DosDateTime {
    pub fn new(date: u16, time: u16) -> Self {
        Self { date, time }
    }

    /// Encode calendar components. Years before 1980 clamp to 1980.
    pub fn from_parts(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        let year = year.clamp(1980, 1980 + 0x7F) - 1980;
        let date = (year << 9) | (u16::from(month & 0x0F) << 5) | u16::from(day & 0x1F);
        let time = (u16::from(hour & 0x1F) << 11)
            | (u16::from(minute & 0x3F) << 5)
            | u16::from((second / 2) & 0x1F);
        Self { date, time }
    }

    /// Decode to (year, month, day, hour, minute, second)
    pub fn to_parts(&self) -> (u16, u8, u8, u8, u8, u8) {
        let year = 1980 + ((self.date >> 9) & 0x7F);
        let month = ((self.date >> 5) & 0x0F) as u8;
        let day = (self.date & 0x1F) as u8;
        let hour = ((self.time >> 11) & 0x1F) as u8;
        let minute = ((self.time >> 5) & 0x3F) as u8;
        let second = ((self.time & 0x1F) * 2) as u8;

        (year, month, day, hour, minute, second)
    }
}

impl std::fmt::Display for DosDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (y, mo, d, h, mi, s) = self.to_parts();
        write!(f, "{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}")
    }
}

/// One logical entry found anywhere in a (possibly nested) archive tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Fully-qualified logical name, nested archives joined with `!`
    pub path: String,
    /// Raw name inside the immediately containing archive
    pub entry_name: String,
    pub is_directory: bool,
    pub uncompressed_size: u64,
    pub compressed_size: u64,
    pub modified: DosDateTime,
    /// CRC-32 of the uncompressed data
    pub crc32: u32,
}

impl EntryRecord {
    /// Whether this record lives inside an embedded archive
    pub fn is_nested(&self) -> bool {
        self.path.contains(NESTED_ARCHIVE_MARKER)
    }
}
