//! Unified error handling for zipdiff
//!
//! Every fallible operation in the comparison pipeline reports one of the
//! categories below. Library code never swallows these; the caller decides
//! how to report them and which exit status to use.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all zipdiff operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Input Errors ====================

    /// Input path does not exist
    #[error("'{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    /// Input path exists but cannot be read as a file
    #[error("'{}' is not readable: {reason}", path.display())]
    InputUnreadable {
        path: PathBuf,
        reason: String,
    },

    // ==================== Archive Errors ====================

    /// Container is corrupt, truncated or not an archive at all.
    /// Also raised for nested archives that fail to parse.
    #[error("Malformed archive {archive}: {message}")]
    MalformedArchive {
        archive: String,
        message: String,
    },

    /// Stream read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Configuration Errors ====================

    /// Invalid configuration, e.g. an exclusion pattern that does not compile
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
    },

    // ==================== General Errors ====================

    /// Error with additional context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a malformed archive error
    pub fn malformed(archive: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedArchive {
            archive: archive.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }

    /// Strip any context layers and return the underlying error
    pub fn root(&self) -> &Error {
        match self {
            Error::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Error::InputNotFound(_))
    }

    /// Check if this is an input access error
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.root(),
            Error::InputNotFound(_) | Error::InputUnreadable { .. }
        )
    }

    /// Check if this is a parse/format error
    pub fn is_parse_error(&self) -> bool {
        matches!(self.root(), Error::MalformedArchive { .. })
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self.root(), Error::InvalidConfig { .. })
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
