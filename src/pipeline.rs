//! End-to-end report generation
//!
//! Steps run in a fixed order so that every fatal input problem surfaces
//! before any analysis is done: load and validate the export, validate the
//! manual periods, read the template, then analyse, render and write.

use chrono::NaiveDate;
use cursorstat_analytics::{ManualPeriodInput, ReportPayload, build_report, period};
use cursorstat_core::{CursorstatError, Result};
use cursorstat_html::{Template, render_report, write_report};
use cursorstat_loader::DataLoader;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything a single run needs
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub input: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub periods: ManualPeriodInput,
    pub dump_json: Option<PathBuf>,
    pub show_progress: bool,
}

impl ReportOptions {
    /// Options for an automatic split without JSON dump or spinner
    pub fn new(
        input: impl Into<PathBuf>,
        template: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            template: template.into(),
            output: output.into(),
            periods: ManualPeriodInput::default(),
            dump_json: None,
            show_progress: false,
        }
    }

    pub fn with_periods(mut self, periods: ManualPeriodInput) -> Self {
        self.periods = periods;
        self
    }

    pub fn with_dump_json(mut self, path: Option<PathBuf>) -> Self {
        self.dump_json = path;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct ReportRun {
    pub payload: ReportPayload,
    pub output: PathBuf,
    /// Records kept after date parsing
    pub record_count: usize,
    /// Rows dropped for an unparseable date
    pub dropped_rows: usize,
    /// Template tokens that were substituted
    pub placeholders_replaced: usize,
    /// Template tokens left untouched for lack of a value
    pub unresolved_tokens: Vec<String>,
}

/// Generate the report described by `options`
///
/// `generated_on` is the date printed in the report header.
///
/// # Errors
///
/// Fails on a missing input or template, missing schema columns, an empty
/// dataset, rejected manual periods or an output that cannot be written.
pub fn generate_report(options: &ReportOptions, generated_on: NaiveDate) -> Result<ReportRun> {
    info!("Loading usage export from {}", options.input.display());
    let dataset = DataLoader::new(&options.input)?
        .with_progress(options.show_progress)
        .load()?;

    let manual = period::validate_manual_periods(&options.periods, &dataset.distinct_dates())?;
    match &manual {
        Some(periods) => info!(
            "Using manual periods: previous {} - {}, current {} - {}",
            periods.previous.start, periods.previous.end, periods.current.start, periods.current.end
        ),
        None => debug!("No manual periods supplied, splitting the dataset automatically"),
    }

    let template = Template::from_file(&options.template)?;

    let payload = build_report(&dataset.records, manual.as_ref());
    let outcome = render_report(&payload, &template, generated_on);
    write_report(&options.output, &outcome.html)?;

    if let Some(path) = &options.dump_json {
        dump_payload(path, &payload)?;
    }

    Ok(ReportRun {
        payload,
        output: options.output.clone(),
        record_count: dataset.len(),
        dropped_rows: dataset.dropped_rows,
        placeholders_replaced: outcome.replaced,
        unresolved_tokens: outcome.unresolved,
    })
}

/// Write the payload as pretty JSON
pub fn dump_payload(path: &Path, payload: &ReportPayload) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    fs::write(path, json).map_err(|source| CursorstatError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Report data written to {}", path.display());
    Ok(())
}
