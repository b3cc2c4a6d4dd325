//! Terminal summary printed after a report is written

use crate::pipeline::ReportRun;
use colored::*;
use cursorstat_analytics::metrics::{MetricComparison, Tone};
use cursorstat_analytics::{DateRange, ReportPayload};
use cursorstat_core::format::{MISSING_DATE, format_count, format_number};
use prettytable::{Table, format, row};

/// Renders a [`ReportRun`] as a table
#[derive(Debug, Clone, Copy)]
pub struct SummaryFormatter {
    colored: bool,
}

impl SummaryFormatter {
    /// Colour is used unless `NO_COLOR` is set
    pub fn new() -> Self {
        Self {
            colored: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn range(range: Option<DateRange>) -> String {
        range.map_or_else(
            || MISSING_DATE.to_string(),
            |r| format!("{} - {}", r.start, r.end),
        )
    }

    fn change(&self, comparison: &MetricComparison) -> String {
        let label = comparison.indicator.label();
        if !self.colored {
            return label;
        }
        match comparison.indicator.tone() {
            Tone::Positive => label.green().to_string(),
            Tone::Negative => label.red().to_string(),
            Tone::Neutral => label.yellow().to_string(),
        }
    }

    fn metrics_table(&self, payload: &ReportPayload) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Metric", b -> "Previous", b -> "Current", b -> "Change"]);

        let periods = &payload.periods;
        table.add_row(row![
            "Period",
            Self::range(periods.previous),
            Self::range(periods.current),
            if periods.manual { "manual" } else { "automatic" }
        ]);

        let comparisons = &payload.comparisons;
        table.add_row(row![
            "Active users",
            r -> payload.previous.active_users,
            r -> payload.current.active_users,
            self.change(&comparisons.active_users)
        ]);
        table.add_row(row![
            "Accepted lines",
            r -> format_count(payload.previous.accepted_lines),
            r -> format_count(payload.current.accepted_lines),
            self.change(&comparisons.accepted_lines)
        ]);
        table.add_row(row![
            "Acceptance rate",
            r -> format!("{}%", format_number(payload.previous.acceptance_rate)),
            r -> format!("{}%", format_number(payload.current.acceptance_rate)),
            self.change(&comparisons.acceptance_rate)
        ]);
        table.add_row(row![
            "Requests",
            r -> format_count(payload.previous.total_requests),
            r -> format_count(payload.current.total_requests),
            self.change(&comparisons.total_requests)
        ]);
        table.add_row(row![
            b -> "Retention",
            "",
            r -> format!("{}%", format_number(payload.cohorts.retention_rate)),
            format!(
                "{} retained, {} new, {} churned",
                payload.cohorts.retained.len(),
                payload.cohorts.new_users.len(),
                payload.cohorts.churned.len()
            )
        ]);
        table
    }

    /// Full summary text including the header line
    pub fn format(&self, run: &ReportRun) -> String {
        let header = format!(
            "Report written to {} ({} records, {} placeholders)",
            run.output.display(),
            run.record_count,
            run.placeholders_replaced
        );
        let header = if self.colored {
            header.bold().to_string()
        } else {
            header
        };

        let mut out = format!("{header}\n{}", self.metrics_table(&run.payload));
        if !run.payload.comparison_valid() {
            let note = "Not enough distinct dates for a comparison; showing baseline figures.";
            out.push_str(&if self.colored {
                note.yellow().to_string()
            } else {
                note.to_string()
            });
            out.push('\n');
        }
        out
    }
}

impl Default for SummaryFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cursorstat_analytics::build_report;
    use cursorstat_core::{DailyDate, LineCounts, UsageRecord, UserEmail};
    use std::path::PathBuf;

    fn record(day: u32, email: &str, accepted: u64) -> UsageRecord {
        UsageRecord {
            date: DailyDate::new(NaiveDate::from_ymd_opt(2024, 4, day).unwrap()),
            email: UserEmail::new(email),
            is_active: true,
            lines: LineCounts::new(accepted, 0, accepted * 2, 0),
            tabs: Default::default(),
            requests: Default::default(),
            extension: None,
            model: None,
            client_version: None,
        }
    }

    fn run(records: &[UsageRecord]) -> ReportRun {
        ReportRun {
            payload: build_report(records, None),
            output: PathBuf::from("report.html"),
            record_count: records.len(),
            dropped_rows: 0,
            placeholders_replaced: 56,
            unresolved_tokens: Vec::new(),
        }
    }

    #[test]
    fn test_summary_lists_both_periods() {
        let records: Vec<_> = (1..=6)
            .map(|day| record(day, "ana@example.com", 1000 * u64::from(day)))
            .collect();
        let text = SummaryFormatter::new().with_color(false).format(&run(&records));

        assert!(text.starts_with("Report written to report.html (6 records, 56 placeholders)"));
        assert!(text.contains("2024-04-01 - 2024-04-03"));
        assert!(text.contains("2024-04-04 - 2024-04-06"));
        assert!(text.contains("15.000"));
        assert!(text.contains("📈"));
        assert!(!text.contains("Not enough distinct dates"));
    }

    #[test]
    fn test_summary_without_comparison() {
        let records = vec![record(1, "ana@example.com", 10), record(2, "luis@example.com", 10)];
        let text = SummaryFormatter::new().with_color(false).format(&run(&records));

        assert!(text.contains(MISSING_DATE));
        assert!(text.contains("🆕 Nuevo"));
        assert!(text.contains("Not enough distinct dates"));
    }
}
