//! CLI interface for cursorstat
//!
//! A single command: read a usage CSV, render the HTML report and print a
//! short summary. Period boundaries are optional; when none are given the
//! distinct dates of the export are split in half automatically.
//!
//! # Example
//!
//! ```bash
//! # Automatic halves, default template and output
//! cursorstat team-usage.csv
//!
//! # Explicit periods and a custom template
//! cursorstat team-usage.csv -t report.html -o out/informe.html \
//!     --previous-start 2024-02-01 --previous-end 2024-02-14 \
//!     --current-start 2024-02-15 --current-end 2024-02-28
//! ```

use clap::{Args, Parser};
use cursorstat_analytics::ManualPeriodInput;
use std::path::PathBuf;

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "informe_cursor_analytics.html";

/// Default template file name
pub const DEFAULT_TEMPLATE: &str = "cursor_stats_report_ux.html";

/// Generate a comparative HTML adoption report from a Cursor usage export
#[derive(Parser, Debug, Clone)]
#[command(name = "cursorstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Usage export in CSV format
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the rendered HTML report
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// HTML template containing {{PLACEHOLDER}} tokens
    #[arg(long, short = 't', env = "CURSORSTAT_TEMPLATE", default_value = DEFAULT_TEMPLATE)]
    pub template: PathBuf,

    /// Enable debug logging
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    pub quiet: bool,

    #[command(flatten)]
    pub periods: PeriodArgs,

    /// Also write the computed report data as pretty JSON
    #[arg(long, value_name = "PATH")]
    pub dump_json: Option<PathBuf>,

    /// Do not print the summary table after writing the report
    #[arg(long)]
    pub no_summary: bool,
}

/// Manual period boundaries (all four or none, YYYY-MM-DD)
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodArgs {
    /// First day of the current period
    #[arg(long, value_name = "DATE", alias = "fecha-inicio-actual")]
    pub current_start: Option<String>,

    /// Last day of the current period
    #[arg(long, value_name = "DATE", alias = "fecha-fin-actual")]
    pub current_end: Option<String>,

    /// First day of the previous period
    #[arg(long, value_name = "DATE", alias = "fecha-inicio-anterior")]
    pub previous_start: Option<String>,

    /// Last day of the previous period
    #[arg(long, value_name = "DATE", alias = "fecha-fin-anterior")]
    pub previous_end: Option<String>,
}

impl PeriodArgs {
    /// Convert into the input expected by the period validator
    pub fn to_input(&self) -> ManualPeriodInput {
        ManualPeriodInput {
            current_start: self.current_start.clone(),
            current_end: self.current_end.clone(),
            previous_start: self.previous_start.clone(),
            previous_end: self.previous_end.clone(),
        }
    }
}

impl Cli {
    /// Log filter directive implied by the verbosity flags, if any
    pub fn log_directive(&self) -> Option<&'static str> {
        if self.quiet {
            Some("warn")
        } else if self.verbose {
            Some("debug")
        } else {
            None
        }
    }
}
