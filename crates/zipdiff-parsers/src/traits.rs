// zipdiff-parsers/src/traits.rs
//! Core traits defining the parser interface.
//!
//! This module establishes the parsing interface used by the container
//! codec:
//! - Consistent error handling, convertible into the unified error type
//! - Reader-based parsing with a file-path convenience layer
//! - Extension-based format recognition

use std::io::{Read, Seek};
use std::path::Path;

use thiserror::Error;

/// Errors that can occur during parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid magic bytes: expected {expected:02X?}, found {found:02X?}")]
    InvalidMagic { expected: Vec<u8>, found: Vec<u8> },

    #[error("Corrupted data at offset {offset}: {message}")]
    CorruptedData { offset: u64, message: String },

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("Checksum mismatch: expected {expected:08X}, got {actual:08X}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("Nested error in {context}: {source}")]
    Nested {
        context: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Wrap this error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ParseError::Nested {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Convert into the unified error, attributing it to `archive`.
    ///
    /// Truncated input is a malformed container, not an I/O failure; any
    /// other I/O error keeps its category.
    pub fn into_archive_error(self, archive: &str) -> zipdiff_core::Error {
        let is_io_failure = self
            .io_source()
            .is_some_and(|io| io.kind() != std::io::ErrorKind::UnexpectedEof);

        if is_io_failure {
            if let Some(io) = self.into_io() {
                return zipdiff_core::Error::Io(io);
            }
            return zipdiff_core::Error::malformed(archive, "I/O failure");
        }
        zipdiff_core::Error::malformed(archive, self.to_string())
    }

    fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            ParseError::Io(e) => Some(e),
            ParseError::Nested { source, .. } => source.io_source(),
            _ => None,
        }
    }

    fn into_io(self) -> Option<std::io::Error> {
        match self {
            ParseError::Io(e) => Some(e),
            ParseError::Nested { source, .. } => source.into_io(),
            _ => None,
        }
    }
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Configuration options for parsing
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Verify the CRC-32 of every extracted entry (slower but safer)
    pub strict_validation: bool,
}

/// Core trait for container parsers
pub trait Parser: Send + Sync {
    /// The parsed output type
    type Output: Send + Sync;

    /// Returns the file extensions this parser handles (e.g., ["zip"])
    fn extensions(&self) -> &[&str];

    /// Returns a human-readable name for this parser
    fn name(&self) -> &str;

    /// Parse from a reader
    fn parse<R: Read + Seek>(&self, reader: R) -> ParseResult<Self::Output>;

    /// Parse from a file path
    fn parse_file(&self, path: &Path) -> ParseResult<Self::Output> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        crate::logging::instrument_parse(self.name(), || self.parse(reader))
    }

    /// Check by name alone whether this parser handles the file.
    /// Extension matching is case-insensitive.
    fn handles_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.extensions().iter().any(|ext| {
            lower
                .strip_suffix(&ext.to_lowercase())
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_context() {
        let error = ParseError::InvalidMagic {
            expected: vec![0x50, 0x4B, 0x03, 0x04],
            found: vec![0x00, 0x00, 0x00, 0x00],
        };

        let contextualized = error.with_context("reading header");

        match contextualized {
            ParseError::Nested { context, .. } => {
                assert_eq!(context, "reading header");
            }
            _ => panic!("Expected Nested error"),
        }
    }

    #[test]
    fn test_truncation_becomes_malformed() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err = ParseError::Io(eof)
            .with_context("central directory")
            .into_archive_error("a.zip");
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("a.zip"));
    }

    #[test]
    fn test_other_io_stays_io() {
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ParseError::Io(denied).into_archive_error("a.zip");
        assert!(matches!(err, zipdiff_core::Error::Io(_)));
    }

    #[test]
    fn test_structural_error_becomes_malformed() {
        let err = ParseError::UnsupportedFeature("encrypted entry".into()).into_archive_error("b.jar");
        assert!(err.is_parse_error());
    }
}
