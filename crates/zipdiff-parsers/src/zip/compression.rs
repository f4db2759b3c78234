// zipdiff-parsers/src/zip/compression.rs
//! Compression handling for zip entries
//!
//! Supports the methods found in practice in zip-family containers:
//! - Store (no compression)
//! - Deflate (standard ZIP)
//! - ZStd (method 93, read only)

use std::io::{Read, Write};

use crate::traits::{ParseError, ParseResult};
use super::CompressionMethod;

/// Handles compression and decompression for zip entries
pub struct ZipCompression;

impl ZipCompression {
    /// Decompress data using the specified compression method
    pub fn decompress(
        data: &[u8],
        method: CompressionMethod,
        expected_size: usize,
    ) -> ParseResult<Vec<u8>> {
        let output = match method {
            CompressionMethod::Store => data.to_vec(),
            CompressionMethod::Deflate => Self::decompress_deflate(data, expected_size)?,
            CompressionMethod::Zstd => Self::decompress_zstd(data, expected_size)?,
            CompressionMethod::Unknown(method) => {
                return Err(ParseError::UnsupportedFeature(format!(
                    "Unknown compression method: {}",
                    method
                )))
            }
        };

        if output.len() != expected_size {
            return Err(ParseError::DecompressionFailed(format!(
                "{:?} size mismatch: expected {}, got {}",
                method,
                expected_size,
                output.len()
            )));
        }

        Ok(output)
    }

    /// Decompress using DEFLATE algorithm
    ///
    /// Header sizes are untrusted: the buffer grows with the actual output,
    /// and at most one byte past `expected_size` is produced so the caller's
    /// size check rejects overlong streams.
    fn decompress_deflate(data: &[u8], expected_size: usize) -> ParseResult<Vec<u8>> {
        let decoder = flate2::read::DeflateDecoder::new(data);
        let mut output = Vec::with_capacity(initial_capacity(data, expected_size));

        decoder
            .take(output_limit(expected_size))
            .read_to_end(&mut output)
            .map_err(|e| ParseError::DecompressionFailed(format!("DEFLATE decompression failed: {}", e)))?;

        Ok(output)
    }

    /// Decompress using Zstandard algorithm
    fn decompress_zstd(data: &[u8], expected_size: usize) -> ParseResult<Vec<u8>> {
        let decoder = zstd::stream::read::Decoder::new(data)
            .map_err(|e| ParseError::DecompressionFailed(format!("ZSTD decompression failed: {}", e)))?;
        let mut output = Vec::with_capacity(initial_capacity(data, expected_size));

        decoder
            .take(output_limit(expected_size))
            .read_to_end(&mut output)
            .map_err(|e| ParseError::DecompressionFailed(format!("ZSTD decompression failed: {}", e)))?;

        Ok(output)
    }

    /// Compress data using the specified method
    pub fn compress(data: &[u8], method: CompressionMethod) -> ParseResult<Vec<u8>> {
        match method {
            CompressionMethod::Store => Ok(data.to_vec()),
            CompressionMethod::Deflate => Self::compress_deflate(data),
            other => Err(ParseError::UnsupportedFeature(format!(
                "Cannot compress with {:?}",
                other
            ))),
        }
    }

    /// Compress using DEFLATE algorithm
    fn compress_deflate(data: &[u8]) -> ParseResult<Vec<u8>> {
        let mut encoder =
            flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());

        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    /// Calculate CRC32 checksum
    pub fn crc32(data: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Starting buffer size, bounded by what a small input can plausibly inflate to
fn initial_capacity(data: &[u8], expected_size: usize) -> usize {
    expected_size.min(data.len().saturating_mul(8))
}

fn output_limit(expected_size: usize) -> u64 {
    (expected_size as u64).saturating_add(1)
}
