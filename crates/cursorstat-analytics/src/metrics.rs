//! Per-period metrics and period-over-period comparison
//!
//! Only records flagged active contribute. Every ratio is guarded against a
//! zero denominator, so an empty period yields all-zero metrics.

use cursorstat_core::format::format_number;
use cursorstat_core::{LineCounts, RequestCounts, TabCounts, UsageRecord, UserEmail};
use serde::Serialize;
use std::collections::HashSet;

/// Relative change (in percent) beyond which a metric counts as moved
pub const SIGNIFICANT_CHANGE: f64 = 5.0;

/// Aggregated metrics of one period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodMetrics {
    pub active_users: usize,
    /// Accepted lines, added plus deleted
    pub accepted_lines: u64,
    /// Suggested lines, added plus deleted
    pub suggested_lines: u64,
    /// accepted / suggested × 100, one decimal
    pub acceptance_rate: f64,
    pub tabs_accepted: u64,
    pub tabs_shown: u64,
    /// tabs accepted / tabs shown × 100, one decimal
    pub tab_acceptance_rate: f64,
    pub total_requests: u64,
    /// accepted lines / active users, rounded to an integer
    pub avg_lines_per_user: f64,
}

impl PeriodMetrics {
    /// Aggregate the active records of a period
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a UsageRecord>) -> Self {
        let mut acc = MetricsAccumulator::default();
        for record in records {
            acc.add_record(record);
        }
        acc.into_metrics()
    }
}

/// Running totals for [`PeriodMetrics`]
#[derive(Debug, Default)]
struct MetricsAccumulator<'a> {
    users: HashSet<&'a UserEmail>,
    lines: LineCounts,
    tabs: TabCounts,
    requests: RequestCounts,
}

impl<'a> MetricsAccumulator<'a> {
    fn add_record(&mut self, record: &'a UsageRecord) {
        if !record.is_active {
            return;
        }
        if !record.email.is_empty() {
            self.users.insert(&record.email);
        }
        self.lines += record.lines;
        self.tabs += record.tabs;
        self.requests += record.requests;
    }

    fn into_metrics(self) -> PeriodMetrics {
        let active_users = self.users.len();
        let accepted_lines = self.lines.accepted();
        let suggested_lines = self.lines.suggested();

        PeriodMetrics {
            active_users,
            accepted_lines,
            suggested_lines,
            acceptance_rate: round1(percentage(accepted_lines as f64, suggested_lines as f64)),
            tabs_accepted: self.tabs.accepted,
            tabs_shown: self.tabs.shown,
            tab_acceptance_rate: round1(percentage(
                self.tabs.accepted as f64,
                self.tabs.shown as f64,
            )),
            total_requests: self.requests.total(),
            avg_lines_per_user: if active_users > 0 {
                (accepted_lines as f64 / active_users as f64).round_ties_even()
            } else {
                0.0
            },
        }
    }
}

/// `part / whole × 100`, or 0 when `whole` is 0
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

/// Round to one decimal, ties to even
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Direction of a metric between two periods
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "change", rename_all = "snake_case")]
pub enum ComparisonIndicator {
    /// Previous value was zero, current is positive
    New,
    /// Both values zero (or current not positive with a zero previous)
    Unchanged,
    /// Grew by more than [`SIGNIFICANT_CHANGE`] percent
    Up(f64),
    /// Shrank by more than [`SIGNIFICANT_CHANGE`] percent
    Down(f64),
    /// Moved within ±[`SIGNIFICANT_CHANGE`] percent
    Flat(f64),
}

/// Visual tone of an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Positive => "positive",
            Tone::Negative => "negative",
            Tone::Neutral => "neutral",
        }
    }
}

impl ComparisonIndicator {
    /// Classify the change from `previous` to `current`
    pub fn between(current: f64, previous: f64) -> Self {
        if previous == 0.0 {
            return if current > 0.0 { Self::New } else { Self::Unchanged };
        }

        let change = (current - previous) / previous * 100.0;
        if change > SIGNIFICANT_CHANGE {
            Self::Up(change)
        } else if change < -SIGNIFICANT_CHANGE {
            Self::Down(change)
        } else {
            Self::Flat(change)
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::New | Self::Up(_) => Tone::Positive,
            Self::Down(_) => Tone::Negative,
            Self::Unchanged | Self::Flat(_) => Tone::Neutral,
        }
    }

    /// Short report text, e.g. `📈 +12,5%`
    pub fn label(&self) -> String {
        match self {
            Self::New => "🆕 Nuevo".to_string(),
            Self::Unchanged => "➖ Sin cambios".to_string(),
            Self::Up(change) => format!("📈 +{}%", format_number(*change)),
            Self::Down(change) => format!("📉 {}%", format_number(*change)),
            Self::Flat(change) => format!("➖ {}%", format_number(*change)),
        }
    }
}

/// A metric value in both periods with its indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricComparison {
    pub current: f64,
    pub previous: f64,
    pub indicator: ComparisonIndicator,
}

impl MetricComparison {
    pub fn new(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            indicator: ComparisonIndicator::between(current, previous),
        }
    }
}

/// Indicators for every compared KPI
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricComparisons {
    pub accepted_lines: MetricComparison,
    pub active_users: MetricComparison,
    pub acceptance_rate: MetricComparison,
    pub total_requests: MetricComparison,
    pub tabs_accepted: MetricComparison,
    pub tab_acceptance_rate: MetricComparison,
    pub avg_lines_per_user: MetricComparison,
}

impl MetricComparisons {
    pub fn new(current: &PeriodMetrics, previous: &PeriodMetrics) -> Self {
        Self {
            accepted_lines: MetricComparison::new(
                current.accepted_lines as f64,
                previous.accepted_lines as f64,
            ),
            active_users: MetricComparison::new(
                current.active_users as f64,
                previous.active_users as f64,
            ),
            acceptance_rate: MetricComparison::new(
                current.acceptance_rate,
                previous.acceptance_rate,
            ),
            total_requests: MetricComparison::new(
                current.total_requests as f64,
                previous.total_requests as f64,
            ),
            tabs_accepted: MetricComparison::new(
                current.tabs_accepted as f64,
                previous.tabs_accepted as f64,
            ),
            tab_acceptance_rate: MetricComparison::new(
                current.tab_acceptance_rate,
                previous.tab_acceptance_rate,
            ),
            avg_lines_per_user: MetricComparison::new(
                current.avg_lines_per_user,
                previous.avg_lines_per_user,
            ),
        }
    }
}
