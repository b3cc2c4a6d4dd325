//! Fixed column schema of the usage export and its validator
//!
//! Validation never builds records. It inspects a [`RawTable`] and returns a
//! [`SchemaReport`] whose errors are fatal and whose warnings are advisory.
//!
//! # Example
//!
//! ```
//! use cursorstat_core::schema::validate_table;
//! use cursorstat_core::RawTable;
//!
//! let table = RawTable::new(vec!["Date".into()], vec![]);
//! let report = validate_table(&table);
//! assert!(report.has_errors());
//! assert_eq!(report.missing_columns.len(), 16);
//! ```

use crate::RawTable;
use crate::sanitize::is_valid_email;
use crate::types::{DailyDate, parse_active_flag, parse_numeric};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Column names of the export
pub mod columns {
    pub const DATE: &str = "Date";
    pub const EMAIL: &str = "Email";
    pub const IS_ACTIVE: &str = "Is Active";
    pub const ACCEPTED_LINES_ADDED: &str = "Chat Accepted Lines Added";
    pub const ACCEPTED_LINES_DELETED: &str = "Chat Accepted Lines Deleted";
    pub const SUGGESTED_LINES_ADDED: &str = "Chat Suggested Lines Added";
    pub const SUGGESTED_LINES_DELETED: &str = "Chat Suggested Lines Deleted";
    pub const TABS_ACCEPTED: &str = "Tabs Accepted";
    pub const TABS_SHOWN: &str = "Chat Tabs Shown";
    pub const EXTENSION: &str = "Most Used Tab Extension";
    pub const MODEL: &str = "Most Used Model";
    pub const CLIENT_VERSION: &str = "Client Version";
    pub const EDIT_REQUESTS: &str = "Edit Requests";
    pub const ASK_REQUESTS: &str = "Ask Requests";
    pub const AGENT_REQUESTS: &str = "Agent Requests";
    pub const CMD_K_USAGES: &str = "Cmd+K Usages";
    pub const SUBSCRIPTION_REQUESTS: &str = "Subscription Included Reqs";
    pub const API_KEY_REQUESTS: &str = "API Key Reqs";
    pub const USAGE_BASED_REQUESTS: &str = "Usage Based Reqs";
}

/// Expected content of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    Text,
    Bool,
    Numeric,
}

/// A named column and its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn spec(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { name, kind }
}

/// Columns every export must carry
pub const REQUIRED_COLUMNS: [ColumnSpec; 17] = [
    spec(columns::DATE, ColumnKind::Date),
    spec(columns::EMAIL, ColumnKind::Text),
    spec(columns::IS_ACTIVE, ColumnKind::Bool),
    spec(columns::ACCEPTED_LINES_ADDED, ColumnKind::Numeric),
    spec(columns::SUGGESTED_LINES_ADDED, ColumnKind::Numeric),
    spec(columns::TABS_ACCEPTED, ColumnKind::Numeric),
    spec(columns::TABS_SHOWN, ColumnKind::Numeric),
    spec(columns::EXTENSION, ColumnKind::Text),
    spec(columns::MODEL, ColumnKind::Text),
    spec(columns::CLIENT_VERSION, ColumnKind::Text),
    spec(columns::EDIT_REQUESTS, ColumnKind::Numeric),
    spec(columns::ASK_REQUESTS, ColumnKind::Numeric),
    spec(columns::AGENT_REQUESTS, ColumnKind::Numeric),
    spec(columns::CMD_K_USAGES, ColumnKind::Numeric),
    spec(columns::SUBSCRIPTION_REQUESTS, ColumnKind::Numeric),
    spec(columns::API_KEY_REQUESTS, ColumnKind::Numeric),
    spec(columns::USAGE_BASED_REQUESTS, ColumnKind::Numeric),
];

/// Columns read when present and treated as zero otherwise
pub const OPTIONAL_COLUMNS: [ColumnSpec; 2] = [
    spec(columns::ACCEPTED_LINES_DELETED, ColumnKind::Numeric),
    spec(columns::SUGGESTED_LINES_DELETED, ColumnKind::Numeric),
];

/// Exports with fewer rows than this draw a warning
pub const MIN_RECOMMENDED_ROWS: usize = 10;

/// Number of malformed identifiers echoed to the log
const INVALID_EMAIL_SAMPLE: usize = 5;

/// Outcome of validating a table against the schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Required columns absent from the header, in schema order
    pub missing_columns: Vec<String>,
    /// Fatal problems
    pub errors: Vec<String>,
    /// Advisory problems
    pub warnings: Vec<String>,
}

impl SchemaReport {
    /// Whether validation found a fatal problem
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Emit every warning through `tracing`
    pub fn log(&self) {
        for warning in &self.warnings {
            warn!("CSV warning: {warning}");
        }
    }
}

/// Validate a raw table against [`REQUIRED_COLUMNS`]
pub fn validate_table(table: &RawTable) -> SchemaReport {
    let mut report = SchemaReport::default();

    for column in &REQUIRED_COLUMNS {
        if !table.has_column(column.name) {
            report.missing_columns.push(column.name.to_string());
            report
                .errors
                .push(format!("Missing required column: '{}'", column.name));
        }
    }

    for column in &OPTIONAL_COLUMNS {
        if !table.has_column(column.name) {
            debug!("Optional column '{}' absent, treating as 0", column.name);
        }
    }

    for column in &REQUIRED_COLUMNS {
        let Some(cells) = table.column(column.name) else {
            continue;
        };
        let cells: Vec<&str> = cells.collect();
        if let Some(warning) = check_column(column, &cells) {
            report.warnings.push(warning);
        }
    }

    if let Some(emails) = table.column(columns::EMAIL) {
        let invalid: BTreeSet<&str> = emails
            .map(str::trim)
            .filter(|email| !email.is_empty() && !is_valid_email(email))
            .collect();
        if !invalid.is_empty() {
            let sample: Vec<&str> = invalid.iter().take(INVALID_EMAIL_SAMPLE).copied().collect();
            warn!("Malformed emails (first {}): {:?}", sample.len(), sample);
            report.warnings.push(format!(
                "Malformed email identifiers: {} found",
                invalid.len()
            ));
        }
    }

    if table.len() < MIN_RECOMMENDED_ROWS {
        report
            .warnings
            .push(format!("Very small dataset: only {} records", table.len()));
    }

    report
}

fn check_column(column: &ColumnSpec, cells: &[&str]) -> Option<String> {
    match column.kind {
        ColumnKind::Date => {
            let any_valid = cells.iter().any(|cell| DailyDate::parse(cell).is_some());
            (!cells.is_empty() && !any_valid)
                .then(|| format!("Column '{}': no value could be parsed as a date", column.name))
        }
        ColumnKind::Numeric => {
            let invalid = cells
                .iter()
                .filter(|cell| parse_numeric(cell).is_none())
                .count();
            (invalid * 2 > cells.len()).then(|| {
                format!(
                    "Column '{}': {} non-numeric values out of {}",
                    column.name,
                    invalid,
                    cells.len()
                )
            })
        }
        ColumnKind::Bool => {
            let foreign = cells
                .iter()
                .map(|cell| cell.trim())
                .any(|cell| !cell.is_empty() && !is_bool_token(cell));
            foreign.then(|| format!("Column '{}': contains non-boolean values", column.name))
        }
        ColumnKind::Text => None,
    }
}

fn is_bool_token(cell: &str) -> bool {
    parse_active_flag(cell).is_some()
}
