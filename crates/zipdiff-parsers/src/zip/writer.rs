// zipdiff-parsers/src/zip/writer.rs
//! Minimal zip writer
//!
//! Writes local headers with sizes known up front (no data descriptors)
//! and a classic end of central directory. Archives that would need ZIP64
//! are rejected.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use zipdiff_core::DosDateTime;

use super::{
    CompressionMethod, ZipCompression, ZipEntry, CD_SIGNATURE, EOCD_SIGNATURE,
    FLAG_DATA_DESCRIPTOR, FLAG_UTF8, LOCAL_HEADER_SIGNATURE,
};
use crate::traits::{ParseError, ParseResult};

/// Version 2.0: deflate, directories
const VERSION_NEEDED: u16 = 20;

/// MS-DOS directory attribute
const DOS_DIRECTORY_ATTR: u32 = 0x10;

/// What the central directory needs to remember about a written entry
#[derive(Debug)]
struct CentralRecord {
    name: String,
    flags: u16,
    method: u16,
    modified: DosDateTime,
    crc32: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    local_header_offset: u32,
    is_directory: bool,
}

/// Streams a zip container into any writer
pub struct ZipWriter<W: Write> {
    inner: W,
    offset: u64,
    central: Vec<CentralRecord>,
}

impl<W: Write> ZipWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            offset: 0,
            central: Vec::new(),
        }
    }

    /// Number of entries written so far
    pub fn len(&self) -> usize {
        self.central.len()
    }

    pub fn is_empty(&self) -> bool {
        self.central.is_empty()
    }

    /// Compress `data` with `method` and append it as `name`
    pub fn add_file(
        &mut self,
        name: &str,
        data: &[u8],
        method: CompressionMethod,
        modified: DosDateTime,
    ) -> ParseResult<()> {
        let compressed = ZipCompression::compress(data, method)?;
        let record = CentralRecord {
            name: name.to_string(),
            flags: name_flags(name),
            method: method.code(),
            modified,
            crc32: ZipCompression::crc32(data),
            compressed_size: fit_u32(compressed.len() as u64, name)?,
            uncompressed_size: fit_u32(data.len() as u64, name)?,
            local_header_offset: fit_u32(self.offset, name)?,
            is_directory: false,
        };
        self.write_entry(record, &compressed)
    }

    /// Append a directory entry; a trailing `/` is added when missing
    pub fn add_directory(&mut self, name: &str, modified: DosDateTime) -> ParseResult<()> {
        let name = if name.ends_with('/') {
            name.to_string()
        } else {
            format!("{}/", name)
        };
        let record = CentralRecord {
            flags: name_flags(&name),
            method: CompressionMethod::Store.code(),
            modified,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            local_header_offset: fit_u32(self.offset, &name)?,
            is_directory: true,
            name,
        };
        self.write_entry(record, &[])
    }

    /// Copy an entry's stored bytes verbatim under a new name
    ///
    /// `raw` is what [`super::ZipParser::read_raw`] returned for `entry`;
    /// method, checksum and sizes are carried over unchanged.
    pub fn add_raw(&mut self, name: &str, entry: &ZipEntry, raw: &[u8]) -> ParseResult<()> {
        if raw.len() as u64 != entry.compressed_size {
            return Err(ParseError::InvalidStructure(format!(
                "{}: {} raw bytes for an entry of {} stored bytes",
                name,
                raw.len(),
                entry.compressed_size
            )));
        }

        let record = CentralRecord {
            name: name.to_string(),
            flags: (entry.flags & !FLAG_DATA_DESCRIPTOR) | name_flags(name),
            method: entry.compression.code(),
            modified: entry.modified,
            crc32: entry.crc32,
            compressed_size: fit_u32(entry.compressed_size, name)?,
            uncompressed_size: fit_u32(entry.uncompressed_size, name)?,
            local_header_offset: fit_u32(self.offset, name)?,
            is_directory: name.ends_with('/'),
        };
        self.write_entry(record, raw)
    }

    fn write_entry(&mut self, record: CentralRecord, data: &[u8]) -> ParseResult<()> {
        let name = record.name.as_bytes();
        let name_len = u16::try_from(name.len()).map_err(|_| {
            ParseError::UnsupportedFeature(format!("entry name of {} bytes", name.len()))
        })?;

        let w = &mut self.inner;
        w.write_u32::<LittleEndian>(LOCAL_HEADER_SIGNATURE)?;
        w.write_u16::<LittleEndian>(VERSION_NEEDED)?;
        w.write_u16::<LittleEndian>(record.flags)?;
        w.write_u16::<LittleEndian>(record.method)?;
        w.write_u16::<LittleEndian>(record.modified.time)?;
        w.write_u16::<LittleEndian>(record.modified.date)?;
        w.write_u32::<LittleEndian>(record.crc32)?;
        w.write_u32::<LittleEndian>(record.compressed_size)?;
        w.write_u32::<LittleEndian>(record.uncompressed_size)?;
        w.write_u16::<LittleEndian>(name_len)?;
        w.write_u16::<LittleEndian>(0)?;
        w.write_all(name)?;
        w.write_all(data)?;

        self.offset += 30 + name.len() as u64 + data.len() as u64;
        self.central.push(record);
        Ok(())
    }

    /// Write the central directory and hand back the underlying writer
    pub fn finish(mut self) -> ParseResult<W> {
        let cd_offset = fit_u32(self.offset, "central directory")?;
        let total = u16::try_from(self.central.len())
            .ok()
            .filter(|n| *n != u16::MAX)
            .ok_or_else(|| {
                ParseError::UnsupportedFeature(format!("{} entries need ZIP64", self.central.len()))
            })?;

        let mut cd_size: u64 = 0;
        for record in &self.central {
            let w = &mut self.inner;
            let name = record.name.as_bytes();
            w.write_u32::<LittleEndian>(CD_SIGNATURE)?;
            w.write_u16::<LittleEndian>(VERSION_NEEDED)?;
            w.write_u16::<LittleEndian>(VERSION_NEEDED)?;
            w.write_u16::<LittleEndian>(record.flags)?;
            w.write_u16::<LittleEndian>(record.method)?;
            w.write_u16::<LittleEndian>(record.modified.time)?;
            w.write_u16::<LittleEndian>(record.modified.date)?;
            w.write_u32::<LittleEndian>(record.crc32)?;
            w.write_u32::<LittleEndian>(record.compressed_size)?;
            w.write_u32::<LittleEndian>(record.uncompressed_size)?;
            // name length was validated when the entry was written
            w.write_u16::<LittleEndian>(name.len() as u16)?;
            w.write_u16::<LittleEndian>(0)?;
            w.write_u16::<LittleEndian>(0)?;
            w.write_u16::<LittleEndian>(0)?;
            w.write_u16::<LittleEndian>(0)?;
            w.write_u32::<LittleEndian>(if record.is_directory { DOS_DIRECTORY_ATTR } else { 0 })?;
            w.write_u32::<LittleEndian>(record.local_header_offset)?;
            w.write_all(name)?;
            cd_size += 46 + name.len() as u64;
        }

        let cd_size = fit_u32(cd_size, "central directory")?;
        let w = &mut self.inner;
        w.write_u32::<LittleEndian>(EOCD_SIGNATURE)?;
        w.write_u16::<LittleEndian>(0)?;
        w.write_u16::<LittleEndian>(0)?;
        w.write_u16::<LittleEndian>(total)?;
        w.write_u16::<LittleEndian>(total)?;
        w.write_u32::<LittleEndian>(cd_size)?;
        w.write_u32::<LittleEndian>(cd_offset)?;
        w.write_u16::<LittleEndian>(0)?;
        w.flush()?;

        Ok(self.inner)
    }
}

fn name_flags(name: &str) -> u16 {
    if name.is_ascii() {
        0
    } else {
        FLAG_UTF8
    }
}

/// `u32::MAX` itself is the ZIP64 marker and cannot be written as a value
fn fit_u32(value: u64, what: &str) -> ParseResult<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v != u32::MAX)
        .ok_or_else(|| {
            ParseError::UnsupportedFeature(format!("{}: {} exceeds the 4 GiB limit without ZIP64", what, value))
        })
}
