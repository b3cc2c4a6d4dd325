//! cursorstat - Comparative adoption reports from Cursor usage exports
//!
//! This library wires the workspace crates together:
//! - Load and validate a usage CSV export (`cursorstat-loader`)
//! - Split it into a previous and a current period and aggregate
//!   metrics, cohorts and rankings (`cursorstat-analytics`)
//! - Fill an HTML template with the results (`cursorstat-html`)
//! - Print a short terminal summary of the run
//!
//! # Examples
//!
//! ```no_run
//! use cursorstat::pipeline::{ReportOptions, generate_report};
//!
//! fn main() -> cursorstat::Result<()> {
//!     let options = ReportOptions::new("usage.csv", "report_template.html", "report.html");
//!     let run = generate_report(&options, chrono::Local::now().date_naive())?;
//!     println!("{} records analysed", run.record_count);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod pipeline;
pub mod summary;

// Re-export commonly used types
pub use cursorstat_core::{CursorstatError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
