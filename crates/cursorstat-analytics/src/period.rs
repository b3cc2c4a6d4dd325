//! Splitting a dataset into a previous and a current period
//!
//! Two modes exist. Automatic mode bisects the sorted distinct dates of the
//! dataset; manual mode uses four caller-supplied boundary dates, which are
//! validated together so that every problem is reported at once.

use chrono::NaiveDate;
use cursorstat_core::{CursorstatError, Result, UsageRecord};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Fewest distinct dates that still allow a comparative run
pub const MIN_COMPARATIVE_DAYS: usize = 4;

/// Accepted format of manual boundary dates
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closed date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls inside the range, both ends included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether two ranges share at least one day
    pub fn overlaps(&self, other: &DateRange) -> bool {
        !(self.end < other.start || other.end < self.start)
    }

    /// Smallest range covering both
    pub fn union(&self, other: &DateRange) -> DateRange {
        DateRange::new(self.start.min(other.start), self.end.max(other.end))
    }

    fn label(&self) -> String {
        format!("{} - {}", self.start.format("%d/%m"), self.end.format("%d/%m"))
    }
}

/// Boundary dates as typed by the operator, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualPeriodInput {
    pub current_start: Option<String>,
    pub current_end: Option<String>,
    pub previous_start: Option<String>,
    pub previous_end: Option<String>,
}

impl ManualPeriodInput {
    fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        fn value(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }
        [
            ("Current period start", value(&self.current_start)),
            ("Current period end", value(&self.current_end)),
            ("Previous period start", value(&self.previous_start)),
            ("Previous period end", value(&self.previous_end)),
        ]
    }

    /// Number of non-blank dates supplied
    pub fn supplied_count(&self) -> usize {
        self.fields().iter().filter(|(_, v)| v.is_some()).count()
    }

    /// Whether no date was supplied at all
    pub fn is_empty(&self) -> bool {
        self.supplied_count() == 0
    }
}

/// Validated boundary dates for manual mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManualPeriods {
    pub current: DateRange,
    pub previous: DateRange,
}

/// Validate manual boundary dates against the dates present in the data
///
/// Returns `Ok(None)` when no date was supplied, meaning automatic mode.
///
/// # Errors
///
/// Returns [`CursorstatError::InvalidPeriodDates`] listing every problem:
/// a partial set, a malformed date, a date absent from the dataset or a
/// start that is not strictly before its end.
pub fn validate_manual_periods(
    input: &ManualPeriodInput,
    available: &BTreeSet<NaiveDate>,
) -> Result<Option<ManualPeriods>> {
    let supplied = input.supplied_count();
    if supplied == 0 {
        return Ok(None);
    }

    let mut errors = Vec::new();
    let range_label = match (available.first(), available.last()) {
        (Some(first), Some(last)) => format!("{first} - {last}"),
        _ => "empty".to_string(),
    };

    let parsed: Vec<Option<NaiveDate>> = input
        .fields()
        .iter()
        .map(|(name, raw)| {
            let raw = (*raw)?;
            match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) if available.contains(&date) => Some(date),
                Ok(_) => {
                    errors.push(format!(
                        "{name}: {raw} does not exist in the dataset. Available range: {range_label}"
                    ));
                    None
                }
                Err(_) => {
                    errors.push(format!("{name}: invalid format '{raw}'. Use YYYY-MM-DD"));
                    None
                }
            }
        })
        .collect();

    if supplied < 4 {
        errors.push(
            "Custom periods need all four dates: --current-start, --current-end, \
             --previous-start, --previous-end"
                .to_string(),
        );
    }

    let periods = match parsed.as_slice() {
        [Some(cs), Some(ce), Some(ps), Some(pe)] => {
            if cs >= ce {
                errors.push("Current period start must be before current period end".to_string());
            }
            if ps >= pe {
                errors
                    .push("Previous period start must be before previous period end".to_string());
            }
            Some(ManualPeriods {
                current: DateRange::new(*cs, *ce),
                previous: DateRange::new(*ps, *pe),
            })
        }
        _ => None,
    };

    if !errors.is_empty() {
        return Err(CursorstatError::InvalidPeriodDates(errors));
    }

    if let Some(periods) = &periods
        && periods.current.overlaps(&periods.previous)
    {
        warn!("Periods overlap; cohort analysis may be affected");
    }

    Ok(periods)
}

/// One side of the comparison
#[derive(Debug, Clone, Default)]
pub struct Period<'a> {
    /// Bounds of the period; `None` for an empty automatic previous period
    pub range: Option<DateRange>,
    /// Distinct dates with at least one record
    pub days: usize,
    /// Records falling inside the period
    pub records: Vec<&'a UsageRecord>,
}

impl<'a> Period<'a> {
    fn from_records(range: Option<DateRange>, records: Vec<&'a UsageRecord>) -> Self {
        let days = records
            .iter()
            .map(|r| *r.date.inner())
            .collect::<BTreeSet<_>>()
            .len();
        Self {
            range,
            days,
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Serializable summary of a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodInfo {
    pub previous: Option<DateRange>,
    pub current: Option<DateRange>,
    pub previous_days: usize,
    pub current_days: usize,
    pub total_days: usize,
    pub comparison_valid: bool,
    pub manual: bool,
}

/// A dataset divided into previous and current periods
#[derive(Debug, Clone)]
pub struct PeriodSplit<'a> {
    pub previous: Period<'a>,
    pub current: Period<'a>,
    /// `previous.days + current.days`
    pub total_days: usize,
    /// Both periods hold records
    pub comparison_valid: bool,
    /// Boundaries came from the operator
    pub manual: bool,
}

impl<'a> PeriodSplit<'a> {
    /// Split automatically or by the given boundaries
    pub fn new(records: &'a [UsageRecord], manual: Option<&ManualPeriods>) -> Self {
        match manual {
            Some(periods) => {
                info!("Using custom period boundaries");
                split_manual(records, periods)
            }
            None => {
                info!("Using automatic period split");
                split_automatic(records)
            }
        }
    }

    /// Range covered by both periods together
    pub fn overall_range(&self) -> Option<DateRange> {
        match (self.previous.range, self.current.range) {
            (Some(previous), Some(current)) => Some(previous.union(&current)),
            (previous, current) => previous.or(current),
        }
    }

    pub fn info(&self) -> PeriodInfo {
        PeriodInfo {
            previous: self.previous.range,
            current: self.current.range,
            previous_days: self.previous.days,
            current_days: self.current.days,
            total_days: self.total_days,
            comparison_valid: self.comparison_valid,
            manual: self.manual,
        }
    }

    fn log(&self) {
        for (name, period) in [("Previous", &self.previous), ("Current", &self.current)] {
            match period.range {
                Some(range) => info!("{name} period: {} days ({})", period.days, range.label()),
                None => info!("{name} period: empty"),
            }
        }
    }
}

/// Sorted distinct dates of a record set
pub fn distinct_dates(records: &[UsageRecord]) -> BTreeSet<NaiveDate> {
    records.iter().map(|r| *r.date.inner()).collect()
}

/// Bisect the distinct dates; the earlier half becomes "previous"
///
/// With fewer than [`MIN_COMPARATIVE_DAYS`] distinct dates everything goes
/// to "current" and the split is marked non-comparative.
pub fn split_automatic(records: &[UsageRecord]) -> PeriodSplit<'_> {
    let dates: Vec<NaiveDate> = distinct_dates(records).into_iter().collect();
    let total = dates.len();
    info!("Distinct days in dataset: {total}");

    if total < MIN_COMPARATIVE_DAYS {
        warn!("Dataset too small for a comparative analysis ({total} days)");
        let range = dates
            .first()
            .zip(dates.last())
            .map(|(start, end)| DateRange::new(*start, *end));
        let split = PeriodSplit {
            previous: Period::default(),
            current: Period::from_records(range, records.iter().collect()),
            total_days: total,
            comparison_valid: false,
            manual: false,
        };
        split.log();
        return split;
    }

    let cut = total / 2;
    let previous_range = DateRange::new(dates[0], dates[cut - 1]);
    let current_range = DateRange::new(dates[cut], dates[total - 1]);

    let (previous, current): (Vec<&UsageRecord>, Vec<&UsageRecord>) = records
        .iter()
        .partition(|r| previous_range.contains(*r.date.inner()));

    let previous = Period::from_records(Some(previous_range), previous);
    let current = Period::from_records(Some(current_range), current);
    let split = PeriodSplit {
        total_days: previous.days + current.days,
        comparison_valid: !previous.is_empty() && !current.is_empty(),
        previous,
        current,
        manual: false,
    };
    split.log();
    split
}

/// Select each period by its closed window
pub fn split_manual<'a>(records: &'a [UsageRecord], periods: &ManualPeriods) -> PeriodSplit<'a> {
    let select = |range: &DateRange| {
        records
            .iter()
            .filter(|r| range.contains(*r.date.inner()))
            .collect::<Vec<_>>()
    };

    let previous = Period::from_records(Some(periods.previous), select(&periods.previous));
    let current = Period::from_records(Some(periods.current), select(&periods.current));
    let split = PeriodSplit {
        total_days: previous.days + current.days,
        comparison_valid: previous.days > 0 && current.days > 0,
        previous,
        current,
        manual: true,
    };
    split.log();
    split
}
