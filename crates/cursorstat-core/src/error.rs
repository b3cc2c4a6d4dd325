//! Error types for cursorstat
//!
//! This module defines the error types used throughout the cursorstat crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use cursorstat_core::error::{CursorstatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to CursorstatError
//!     let _file = std::fs::read_to_string("nonexistent.csv")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cursorstat operations
///
/// Data errors (schema, period dates) are kept apart from I/O errors
/// (input, template, output) so the binary can report them distinctly.
#[derive(Error, Debug)]
pub enum CursorstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input CSV file does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// One or more required columns are absent from the export
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// No record survived date parsing
    #[error("The dataset contains no records with a valid date")]
    EmptyDataset,

    /// Manual period boundaries were rejected
    #[error("Invalid period dates:{}", itemize(.0))]
    InvalidPeriodDates(Vec<String>),

    /// Template file does not exist
    #[error("Template file not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Writing the rendered report failed
    #[error("Failed to write report to {}: {source}", path.display())]
    OutputWrite {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },
}

fn itemize(items: &[String]) -> String {
    items.iter().map(|item| format!("\n  • {item}")).collect()
}

/// Convenience type alias for Results in cursorstat
///
/// # Example
///
/// ```
/// use cursorstat_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CursorstatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CursorstatError::EmptyDataset;
        assert_eq!(
            error.to_string(),
            "The dataset contains no records with a valid date"
        );
    }

    #[test]
    fn test_missing_columns_lists_every_column() {
        let error = CursorstatError::MissingColumns(vec!["Date".into(), "Email".into()]);
        assert_eq!(error.to_string(), "Missing required columns: Date, Email");
    }

    #[test]
    fn test_invalid_period_dates_is_itemized() {
        let error = CursorstatError::InvalidPeriodDates(vec![
            "first problem".into(),
            "second problem".into(),
        ]);
        let text = error.to_string();
        assert!(text.contains("\n  • first problem"));
        assert!(text.contains("\n  • second problem"));
    }

    fn is_data_error(error: &CursorstatError) -> bool {
        match error {
            CursorstatError::MissingColumns(_)
            | CursorstatError::EmptyDataset
            | CursorstatError::InvalidPeriodDates(_) => true,
            CursorstatError::Io(_)
            | CursorstatError::Json(_)
            | CursorstatError::Csv(_)
            | CursorstatError::InputNotFound(_)
            | CursorstatError::TemplateNotFound(_)
            | CursorstatError::OutputWrite { .. } => false,
        }
    }

    #[test]
    fn test_data_errors_kept_apart_from_io_errors() {
        assert!(is_data_error(&CursorstatError::EmptyDataset));
        assert!(is_data_error(&CursorstatError::InvalidPeriodDates(vec![])));
        assert!(!is_data_error(&CursorstatError::TemplateNotFound(
            PathBuf::from("report.html")
        )));
        let write = CursorstatError::OutputWrite {
            path: PathBuf::from("out/report.html"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!is_data_error(&write));
        assert!(write.to_string().starts_with("Failed to write report to out/report.html"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: CursorstatError = io_error.into();
        assert!(matches!(error, CursorstatError::Io(_)));
    }
}
