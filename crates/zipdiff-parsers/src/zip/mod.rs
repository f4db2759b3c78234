// zipdiff-parsers/src/zip/mod.rs
//! Zip Container Parser
//!
//! Reads the table of contents of zip-family containers (zip, jar, war,
//! ear and friends) from the central directory, and extracts individual
//! entries on demand.
//!
//! # Format Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! |                        Zip Container                        |
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │         Local Header + File Data (per entry)            ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │           Central Directory (Entries)                   ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │   [ZIP64 End of Central Directory + Locator]            ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │            End of Central Directory                     ││
//! │  │  - Signature (0x06054B50)                               ││
//! │  │  - Central Directory offset                             ││
//! │  │  - Total entries count                                  ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod archive;
mod compression;
mod entry;
mod writer;

pub use archive::ZipArchive;
pub use compression::ZipCompression;
pub use entry::ZipEntry;
pub use writer::ZipWriter;

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use zipdiff_core::DosDateTime;

use crate::traits::{ParseError, ParseOptions, ParseResult, Parser};

/// End of central directory signature
pub(crate) const EOCD_SIGNATURE: u32 = 0x06054B50;

/// Central directory file header signature
pub(crate) const CD_SIGNATURE: u32 = 0x02014B50;

/// Local file header signature
pub(crate) const LOCAL_HEADER_SIGNATURE: u32 = 0x04034B50;

/// ZIP64 end of central directory record signature
const ZIP64_EOCD_SIGNATURE: u32 = 0x06064B50;

/// ZIP64 end of central directory locator signature
const ZIP64_EOCD_LOCATOR_SIGNATURE: u32 = 0x07064B50;

/// Extra field header id carrying 64-bit sizes and offsets
const ZIP64_EXTRA_ID: u16 = 0x0001;

/// Fixed part of the end of central directory record
const EOCD_LEN: u64 = 22;

/// Maximum trailing comment length
const MAX_COMMENT_LEN: u64 = 65535;

/// General purpose flag: entry is encrypted
pub(crate) const FLAG_ENCRYPTED: u16 = 0x0001;

/// General purpose flag: sizes follow the data in a data descriptor
pub(crate) const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;

/// General purpose flag: name is UTF-8
pub(crate) const FLAG_UTF8: u16 = 0x0800;

/// Compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMethod {
    #[default]
    Store,
    Deflate,
    Zstd,
    Unknown(u16),
}

impl CompressionMethod {
    /// Method number as written in zip headers
    pub fn code(&self) -> u16 {
        match self {
            CompressionMethod::Store => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Zstd => 93,
            CompressionMethod::Unknown(code) => *code,
        }
    }
}

impl From<u16> for CompressionMethod {
    fn from(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Store,
            8 => CompressionMethod::Deflate,
            93 => CompressionMethod::Zstd,
            other => CompressionMethod::Unknown(other),
        }
    }
}

/// Zip Container Parser
///
/// Parses zip-family containers, providing both the full table of contents
/// and random access to individual entries.
#[derive(Debug, Clone, Default)]
pub struct ZipParser {
    options: ParseOptions,
}

impl ZipParser {
    /// Create a new zip parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse the end of central directory record
    fn parse_eocd<R: Read + Seek>(&self, reader: &mut R) -> ParseResult<EndOfCentralDirectory> {
        // Seek to end and search backwards for EOCD signature
        let file_size = reader.seek(SeekFrom::End(0))?;
        if file_size < EOCD_LEN {
            return Err(ParseError::InvalidStructure(format!(
                "{} bytes is too short for an end of central directory record",
                file_size
            )));
        }

        // EOCD is at least 22 bytes and may be followed by a comment
        let search_start = file_size.saturating_sub(MAX_COMMENT_LEN + EOCD_LEN);
        reader.seek(SeekFrom::Start(search_start))?;

        let mut buffer = vec![0u8; (file_size - search_start) as usize];
        reader.read_exact(&mut buffer)?;

        // Search for EOCD signature from end
        let sig_bytes = EOCD_SIGNATURE.to_le_bytes();
        let eocd_offset = buffer[..buffer.len() - (EOCD_LEN as usize - 4)]
            .windows(4)
            .rposition(|w| w == sig_bytes)
            .ok_or_else(|| ParseError::InvalidMagic {
                expected: sig_bytes.to_vec(),
                found: vec![],
            })?;

        let eocd_abs_offset = search_start + eocd_offset as u64;
        let mut eocd = &buffer[eocd_offset + 4..eocd_offset + EOCD_LEN as usize];

        let _disk_number = eocd.read_u16::<LittleEndian>()?;
        let _cd_disk = eocd.read_u16::<LittleEndian>()?;
        let _disk_entries = eocd.read_u16::<LittleEndian>()?;
        let total_entries = eocd.read_u16::<LittleEndian>()?;
        let cd_size = eocd.read_u32::<LittleEndian>()?;
        let cd_offset = eocd.read_u32::<LittleEndian>()?;

        // Check for ZIP64
        let zip64 = cd_offset == u32::MAX || cd_size == u32::MAX || total_entries == u16::MAX;
        let (cd_offset, cd_size, total_entries) = if zip64 {
            self.parse_zip64_eocd(reader, eocd_abs_offset)?
        } else {
            (u64::from(cd_offset), u64::from(cd_size), u64::from(total_entries))
        };

        let overlap = || ParseError::CorruptedData {
            offset: eocd_abs_offset,
            message: format!(
                "central directory ({} bytes at {}) overlaps its end record",
                cd_size, cd_offset
            ),
        };

        // A classic directory ends right at its end record, so any gap
        // between where it sits and where it claims to sit is data prepended
        // to the archive after its offsets were written.
        let prefix_len = if zip64 {
            if cd_offset.saturating_add(cd_size) > eocd_abs_offset {
                return Err(overlap());
            }
            0
        } else {
            let cd_start = eocd_abs_offset.checked_sub(cd_size).ok_or_else(overlap)?;
            cd_start.checked_sub(cd_offset).ok_or_else(overlap)?
        };

        if prefix_len > 0 {
            tracing::debug!(prefix_len, "archive data starts after a prefix");
        }

        Ok(EndOfCentralDirectory {
            total_entries,
            cd_size,
            cd_offset,
            prefix_len,
        })
    }

    /// Parse ZIP64 end of central directory
    fn parse_zip64_eocd<R: Read + Seek>(
        &self,
        reader: &mut R,
        eocd_offset: u64,
    ) -> ParseResult<(u64, u64, u64)> {
        // ZIP64 EOCD locator sits right before the EOCD
        let locator_offset = eocd_offset.checked_sub(20).ok_or_else(|| {
            ParseError::InvalidStructure("no room for a ZIP64 locator".to_string())
        })?;
        reader.seek(SeekFrom::Start(locator_offset))?;

        let sig = reader.read_u32::<LittleEndian>()?;
        if sig != ZIP64_EOCD_LOCATOR_SIGNATURE {
            return Err(ParseError::InvalidMagic {
                expected: ZIP64_EOCD_LOCATOR_SIGNATURE.to_le_bytes().to_vec(),
                found: sig.to_le_bytes().to_vec(),
            });
        }
        let _disk = reader.read_u32::<LittleEndian>()?;
        let zip64_eocd_offset = reader.read_u64::<LittleEndian>()?;

        reader.seek(SeekFrom::Start(zip64_eocd_offset))?;

        let mut record = [0u8; 56];
        reader.read_exact(&mut record)?;
        let mut record = &record[..];

        let sig = record.read_u32::<LittleEndian>()?;
        if sig != ZIP64_EOCD_SIGNATURE {
            return Err(ParseError::InvalidMagic {
                expected: ZIP64_EOCD_SIGNATURE.to_le_bytes().to_vec(),
                found: sig.to_le_bytes().to_vec(),
            });
        }

        let _record_size = record.read_u64::<LittleEndian>()?;
        let _version_made = record.read_u16::<LittleEndian>()?;
        let _version_needed = record.read_u16::<LittleEndian>()?;
        let _disk_number = record.read_u32::<LittleEndian>()?;
        let _cd_disk = record.read_u32::<LittleEndian>()?;
        let _disk_entries = record.read_u64::<LittleEndian>()?;
        let total_entries = record.read_u64::<LittleEndian>()?;
        let cd_size = record.read_u64::<LittleEndian>()?;
        let cd_offset = record.read_u64::<LittleEndian>()?;

        Ok((cd_offset, cd_size, total_entries))
    }

    /// Parse central directory entries
    fn parse_central_directory<R: Read + Seek>(
        &self,
        reader: &mut R,
        eocd: &EndOfCentralDirectory,
    ) -> ParseResult<Vec<ZipEntry>> {
        reader.seek(SeekFrom::Start(eocd.cd_offset + eocd.prefix_len))?;

        // Every header is at least 46 bytes, so a hostile count cannot
        // make us reserve more than the directory could hold.
        let capacity = eocd.total_entries.min(eocd.cd_size / 46) as usize;
        let mut entries = Vec::with_capacity(capacity);

        for index in 0..eocd.total_entries {
            let mut entry = self
                .parse_cd_entry(reader)
                .map_err(|e| e.with_context(format!("central directory entry {}", index)))?;
            entry.local_header_offset = entry
                .local_header_offset
                .checked_add(eocd.prefix_len)
                .ok_or_else(|| {
                    ParseError::InvalidStructure(format!("{} lies past the end of the archive", entry.path))
                })?;
            tracing::trace!(path = %entry.path, "indexed entry");
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Parse a single central directory entry
    fn parse_cd_entry<R: Read + Seek>(&self, reader: &mut R) -> ParseResult<ZipEntry> {
        let mut header = [0u8; 46];
        reader.read_exact(&mut header)?;
        let mut header = &header[..];

        let sig = header.read_u32::<LittleEndian>()?;
        if sig != CD_SIGNATURE {
            return Err(ParseError::InvalidMagic {
                expected: CD_SIGNATURE.to_le_bytes().to_vec(),
                found: sig.to_le_bytes().to_vec(),
            });
        }

        let _version_made = header.read_u16::<LittleEndian>()?;
        let _version_needed = header.read_u16::<LittleEndian>()?;
        let flags = header.read_u16::<LittleEndian>()?;
        let compression = CompressionMethod::from(header.read_u16::<LittleEndian>()?);
        let mod_time = header.read_u16::<LittleEndian>()?;
        let mod_date = header.read_u16::<LittleEndian>()?;
        let crc32 = header.read_u32::<LittleEndian>()?;
        let compressed_size = header.read_u32::<LittleEndian>()?;
        let uncompressed_size = header.read_u32::<LittleEndian>()?;
        let name_length = header.read_u16::<LittleEndian>()? as usize;
        let extra_length = header.read_u16::<LittleEndian>()? as usize;
        let comment_length = header.read_u16::<LittleEndian>()?;
        let _disk_start = header.read_u16::<LittleEndian>()?;
        let _internal_attrs = header.read_u16::<LittleEndian>()?;
        let _external_attrs = header.read_u32::<LittleEndian>()?;
        let local_header_offset = header.read_u32::<LittleEndian>()?;

        // Read filename
        let mut name_bytes = vec![0u8; name_length];
        reader.read_exact(&mut name_bytes)?;
        let path = String::from_utf8_lossy(&name_bytes).into_owned();

        // Read extra field
        let mut extra = vec![0u8; extra_length];
        reader.read_exact(&mut extra)?;

        let (compressed_size, uncompressed_size, local_header_offset) =
            parse_zip64_extra(&extra, compressed_size, uncompressed_size, local_header_offset)?;

        // Skip comment
        reader.seek(SeekFrom::Current(i64::from(comment_length)))?;

        Ok(ZipEntry {
            is_directory: path.ends_with('/'),
            path,
            compression,
            crc32,
            compressed_size,
            uncompressed_size,
            local_header_offset,
            flags,
            modified: DosDateTime::new(mod_date, mod_time),
            is_encrypted: flags & FLAG_ENCRYPTED != 0,
        })
    }

    /// Read the entry's stored bytes exactly as they sit in the container
    pub fn read_raw<R: Read + Seek>(&self, reader: &mut R, entry: &ZipEntry) -> ParseResult<Vec<u8>> {
        reader.seek(SeekFrom::Start(entry.local_header_offset))?;

        let mut local_header = [0u8; 30];
        reader.read_exact(&mut local_header)?;
        let mut local_header = &local_header[..];

        let sig = local_header.read_u32::<LittleEndian>()?;
        if sig != LOCAL_HEADER_SIGNATURE {
            return Err(ParseError::InvalidMagic {
                expected: LOCAL_HEADER_SIGNATURE.to_le_bytes().to_vec(),
                found: sig.to_le_bytes().to_vec(),
            }
            .with_context(format!("local header of {}", entry.path)));
        }

        // name and extra lengths sit at bytes 26..30
        let mut lengths = &local_header[22..];
        let name_len = lengths.read_u16::<LittleEndian>()?;
        let extra_len = lengths.read_u16::<LittleEndian>()?;

        // Skip to data
        reader.seek(SeekFrom::Current(i64::from(name_len) + i64::from(extra_len)))?;

        let size = usize::try_from(entry.compressed_size).map_err(|_| {
            ParseError::UnsupportedFeature(format!(
                "{} bytes of stored data do not fit in memory",
                entry.compressed_size
            ))
        })?;

        let mut data = Vec::new();
        reader.by_ref().take(size as u64).read_to_end(&mut data)?;
        if data.len() != size {
            return Err(ParseError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("{} ends after {} of {} bytes", entry.path, data.len(), size),
            )));
        }

        Ok(data)
    }

    /// Extract and decompress file data
    pub fn extract_data<R: Read + Seek>(
        &self,
        reader: &mut R,
        entry: &ZipEntry,
    ) -> ParseResult<Vec<u8>> {
        if entry.is_encrypted {
            return Err(ParseError::UnsupportedFeature(format!(
                "{} is encrypted",
                entry.path
            )));
        }

        let compressed = self.read_raw(reader, entry)?;

        let expected_size = usize::try_from(entry.uncompressed_size).map_err(|_| {
            ParseError::UnsupportedFeature(format!(
                "{} bytes of entry data do not fit in memory",
                entry.uncompressed_size
            ))
        })?;

        let decompressed = ZipCompression::decompress(&compressed, entry.compression, expected_size)
            .map_err(|e| e.with_context(entry.path.clone()))?;

        if self.options.strict_validation {
            let actual = ZipCompression::crc32(&decompressed);
            if actual != entry.crc32 {
                return Err(ParseError::ChecksumMismatch {
                    expected: entry.crc32,
                    actual,
                }
                .with_context(entry.path.clone()));
            }
        }

        Ok(decompressed)
    }
}

/// Parse ZIP64 extra field
///
/// Only the values saturated in the fixed header are present, in the
/// order uncompressed size, compressed size, local header offset.
fn parse_zip64_extra(
    extra: &[u8],
    compressed_size: u32,
    uncompressed_size: u32,
    local_offset: u32,
) -> ParseResult<(u64, u64, u64)> {
    let mut compressed = u64::from(compressed_size);
    let mut uncompressed = u64::from(uncompressed_size);
    let mut offset = u64::from(local_offset);

    let mut rest = extra;
    while rest.len() >= 4 {
        let id = rest.read_u16::<LittleEndian>()?;
        let size = rest.read_u16::<LittleEndian>()? as usize;
        if size > rest.len() {
            break;
        }
        let (mut field, tail) = rest.split_at(size);
        rest = tail;

        if id != ZIP64_EXTRA_ID {
            continue;
        }

        if uncompressed_size == u32::MAX && field.len() >= 8 {
            uncompressed = field.read_u64::<LittleEndian>()?;
        }
        if compressed_size == u32::MAX && field.len() >= 8 {
            compressed = field.read_u64::<LittleEndian>()?;
        }
        if local_offset == u32::MAX && field.len() >= 8 {
            offset = field.read_u64::<LittleEndian>()?;
        }
        break;
    }

    Ok((compressed, uncompressed, offset))
}

impl Parser for ZipParser {
    type Output = ZipArchive;

    fn extensions(&self) -> &[&str] {
        &["zip", "ear", "war", "rar", "jar"]
    }

    fn name(&self) -> &str {
        "Zip Container Parser"
    }

    fn parse<R: Read + Seek>(&self, mut reader: R) -> ParseResult<Self::Output> {
        let eocd = self.parse_eocd(&mut reader)?;
        let entries = self.parse_central_directory(&mut reader, &eocd)?;

        // Build path index; a later duplicate name wins
        let mut path_index = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            path_index.insert(entry.path.clone(), idx);
        }

        tracing::debug!(entries = entries.len(), "central directory read");

        Ok(ZipArchive {
            entries,
            path_index,
        })
    }
}

/// End of Central Directory record
#[derive(Debug)]
struct EndOfCentralDirectory {
    total_entries: u64,
    cd_size: u64,
    cd_offset: u64,
    /// Bytes in front of the archive not counted by the recorded offsets
    prefix_len: u64,
}
