//! zipdiff Core Library
//!
//! This crate provides the error type and the entry record shared by all
//! zipdiff components.

pub mod error;
pub mod types;

pub use error::{Error, Result, ResultExt};
pub use types::*;
