//! zipdiff-parsers
//!
//! Codec for zip-family containers, used to read the table of contents of
//! the archives being compared and to write rebuilt ones.
//!
//! # Supported Formats
//!
//! | Format | Extension | Description |
//! |--------|-----------|-------------|
//! | ZIP    | `.zip`    | Plain zip archive |
//! | JAR    | `.jar`    | Java archive |
//! | WAR    | `.war`    | Web application archive |
//! | EAR    | `.ear`    | Enterprise application archive |
//! | RAR    | `.rar`    | Resource adapter archive (zip layout) |
//!
//! # Example
//!
//! ```rust,ignore
//! use zipdiff_parsers::{Parser, ZipParser};
//!
//! let parser = ZipParser::new();
//! let archive = parser.parse_file("app.war".as_ref())?;
//!
//! println!("Found {} entries", archive.entry_count());
//! ```

pub mod logging;
pub mod traits;
pub mod zip;

// Re-export main types
pub use traits::{ParseError, ParseOptions, ParseResult, Parser};
pub use zip::{
    CompressionMethod, ZipArchive, ZipCompression, ZipEntry, ZipParser, ZipWriter,
};
