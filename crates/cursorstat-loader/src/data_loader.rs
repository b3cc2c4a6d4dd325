//! Data loader for Cursor usage CSV exports
//!
//! Loading happens in two steps. The file is first read into a
//! [`RawTable`] and validated against the fixed schema; only when no
//! required column is missing are typed records built from it.
//!
//! # Examples
//!
//! ```no_run
//! use cursorstat_loader::DataLoader;
//!
//! # fn example() -> cursorstat_core::Result<()> {
//! let dataset = DataLoader::new("team-usage.csv")?.load()?;
//! println!("{} records over {} days", dataset.len(), dataset.distinct_dates().len());
//! # Ok(())
//! # }
//! ```

use chrono::NaiveDate;
use cursorstat_core::schema::{self, columns};
use cursorstat_core::types::{parse_active_flag, parse_count};
use cursorstat_core::{
    CursorstatError, DailyDate, LineCounts, RawTable, RequestCounts, Result, TabCounts,
    UsageRecord, UserEmail,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Validated, typed content of an export
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Rows with a parseable date, in file order
    pub records: Vec<UsageRecord>,
    /// Rows discarded because their date could not be parsed
    pub dropped_rows: usize,
}

impl Dataset {
    /// Number of usable records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record survived loading
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted set of the calendar dates present in the data
    pub fn distinct_dates(&self) -> BTreeSet<NaiveDate> {
        self.records.iter().map(|r| *r.date.inner()).collect()
    }
}

/// Reader for a single CSV export
pub struct DataLoader {
    path: PathBuf,
    show_progress: bool,
}

impl DataLoader {
    /// Create a loader for the given file
    ///
    /// # Errors
    ///
    /// Returns [`CursorstatError::InputNotFound`] if the file does not exist
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(CursorstatError::InputNotFound(path));
        }
        Ok(Self {
            path,
            show_progress: false,
        })
    }

    /// Show a spinner while the file is read
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Path of the export
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file into a raw string table
    pub fn load_table(&self) -> Result<RawTable> {
        let progress = self.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} [{elapsed_precise}] {pos} rows read")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message(format!("Reading {}", self.path.display()));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let headers = reader.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(String::from).collect());
            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let table = RawTable::new(headers, rows);
        info!(
            "Loaded {} rows from {}",
            table.len(),
            self.path.display()
        );
        Ok(table)
    }

    /// Read, validate and convert the export
    ///
    /// # Errors
    ///
    /// - [`CursorstatError::MissingColumns`] when required columns are absent
    /// - [`CursorstatError::EmptyDataset`] when no row has a valid date
    /// - [`CursorstatError::Csv`] for malformed CSV
    pub fn load(&self) -> Result<Dataset> {
        let table = self.load_table()?;
        records_from_table(&table)
    }
}

/// Validate a raw table and build typed records from it
pub fn records_from_table(table: &RawTable) -> Result<Dataset> {
    let report = schema::validate_table(table);
    if report.has_errors() {
        return Err(CursorstatError::MissingColumns(report.missing_columns));
    }
    report.log();

    let index = ColumnIndex::resolve(table);
    let mut records = Vec::with_capacity(table.len());
    let mut dropped_rows = 0usize;

    for row in 0..table.len() {
        match index.record(table, row) {
            Some(record) => records.push(record),
            None => dropped_rows += 1,
        }
    }

    if dropped_rows > 0 {
        warn!("{dropped_rows} rows with an invalid date were excluded");
    }
    if records.is_empty() {
        return Err(CursorstatError::EmptyDataset);
    }

    debug!("Built {} usage records", records.len());
    Ok(Dataset {
        records,
        dropped_rows,
    })
}

/// Column positions resolved once per table
struct ColumnIndex {
    date: Option<usize>,
    email: Option<usize>,
    is_active: Option<usize>,
    accepted_added: Option<usize>,
    accepted_deleted: Option<usize>,
    suggested_added: Option<usize>,
    suggested_deleted: Option<usize>,
    tabs_accepted: Option<usize>,
    tabs_shown: Option<usize>,
    extension: Option<usize>,
    model: Option<usize>,
    client_version: Option<usize>,
    edit: Option<usize>,
    ask: Option<usize>,
    agent: Option<usize>,
    cmd_k: Option<usize>,
    subscription_included: Option<usize>,
    api_key: Option<usize>,
    usage_based: Option<usize>,
}

impl ColumnIndex {
    fn resolve(table: &RawTable) -> Self {
        let at = |name: &str| table.column_index(name);
        Self {
            date: at(columns::DATE),
            email: at(columns::EMAIL),
            is_active: at(columns::IS_ACTIVE),
            accepted_added: at(columns::ACCEPTED_LINES_ADDED),
            accepted_deleted: at(columns::ACCEPTED_LINES_DELETED),
            suggested_added: at(columns::SUGGESTED_LINES_ADDED),
            suggested_deleted: at(columns::SUGGESTED_LINES_DELETED),
            tabs_accepted: at(columns::TABS_ACCEPTED),
            tabs_shown: at(columns::TABS_SHOWN),
            extension: at(columns::EXTENSION),
            model: at(columns::MODEL),
            client_version: at(columns::CLIENT_VERSION),
            edit: at(columns::EDIT_REQUESTS),
            ask: at(columns::ASK_REQUESTS),
            agent: at(columns::AGENT_REQUESTS),
            cmd_k: at(columns::CMD_K_USAGES),
            subscription_included: at(columns::SUBSCRIPTION_REQUESTS),
            api_key: at(columns::API_KEY_REQUESTS),
            usage_based: at(columns::USAGE_BASED_REQUESTS),
        }
    }

    /// Build the record for one row, or `None` if its date is invalid
    fn record(&self, table: &RawTable, row: usize) -> Option<UsageRecord> {
        let cell = |column: Option<usize>| column.map(|c| table.cell(row, c)).unwrap_or("");
        let count = |column: Option<usize>| parse_count(cell(column));
        let text = |column: Option<usize>| {
            let value = cell(column);
            (!value.is_empty()).then(|| value.to_string())
        };

        let date = DailyDate::parse(cell(self.date))?;

        Some(UsageRecord {
            date,
            email: UserEmail::new(cell(self.email)),
            is_active: parse_active_flag(cell(self.is_active)).unwrap_or(false),
            lines: LineCounts::new(
                count(self.accepted_added),
                count(self.accepted_deleted),
                count(self.suggested_added),
                count(self.suggested_deleted),
            ),
            tabs: TabCounts::new(count(self.tabs_accepted), count(self.tabs_shown)),
            requests: RequestCounts {
                edit: count(self.edit),
                ask: count(self.ask),
                agent: count(self.agent),
                cmd_k: count(self.cmd_k),
                subscription_included: count(self.subscription_included),
                api_key: count(self.api_key),
                usage_based: count(self.usage_based),
            },
            extension: text(self.extension),
            model: text(self.model),
            client_version: text(self.client_version),
        })
    }
}
