//! Core types, schema, formatting and sanitization for cursorstat
//!
//! This crate provides the foundational record types, the error type,
//! the fixed CSV schema, Spanish-locale number/date formatting and the
//! HTML sanitization helpers used by all other cursorstat crates.

pub mod error;
pub mod format;
pub mod sanitize;
pub mod schema;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use error::{CursorstatError, Result};
pub use table::RawTable;
pub use types::{DailyDate, LineCounts, RequestCounts, TabCounts, UsageRecord, UserEmail};
