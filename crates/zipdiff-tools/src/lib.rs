//! zipdiff-tools
//!
//! Structural comparison of zip-family archives. Both archives are
//! flattened into entry mappings (descending into embedded archives),
//! which are then partitioned into added, removed and changed paths.
//!
//! # Example
//!
//! ```rust,ignore
//! use zipdiff_tools::{DiffConfig, compare_files};
//!
//! let config = DiffConfig::builder()
//!     .ignore_timestamps(true)
//!     .exclusion_pattern(".*\\.class")
//!     .build()?;
//! let report = compare_files("old.war".as_ref(), "new.war".as_ref(), &config)?;
//!
//! println!("{} differences", report.difference_count());
//! ```

pub mod config;
pub mod diff;
pub mod enumerate;
pub mod equivalence;
pub mod filter;
pub mod prefix;
pub mod report;

pub use config::{DiffConfig, DiffConfigBuilder};
pub use diff::{check_input, compare_files, compare_mappings};
pub use enumerate::{EntryMapping, enumerate_file, enumerate_reader};
pub use equivalence::entries_match;
pub use filter::PathFilter;
pub use prefix::strip_prefix;
pub use report::DifferenceReport;
