//! Daily time series for the evolution charts

use crate::period::DateRange;
use chrono::NaiveDate;
use cursorstat_core::{LineCounts, TabCounts, UsageRecord, UserEmail};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Activity totals of a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub accepted_lines: u64,
    pub suggested_lines: u64,
    pub tabs_accepted: u64,
    pub tabs_shown: u64,
    pub active_users: usize,
}

#[derive(Default)]
struct DayAccumulator<'a> {
    lines: LineCounts,
    tabs: TabCounts,
    users: HashSet<&'a UserEmail>,
}

impl<'a> DayAccumulator<'a> {
    fn add_record(&mut self, record: &'a UsageRecord) {
        self.lines += record.lines;
        self.tabs += record.tabs;
        if !record.email.is_empty() {
            self.users.insert(&record.email);
        }
    }

    fn into_point(self, date: NaiveDate) -> DailyPoint {
        DailyPoint {
            date,
            accepted_lines: self.lines.accepted(),
            suggested_lines: self.lines.suggested(),
            tabs_accepted: self.tabs.accepted,
            tabs_shown: self.tabs.shown,
            active_users: self.users.len(),
        }
    }
}

/// One point per date with active records inside `range`, in date order
pub fn build_timeline(records: &[UsageRecord], range: Option<DateRange>) -> Vec<DailyPoint> {
    let Some(range) = range else {
        return Vec::new();
    };

    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| r.is_active && range.contains(*r.date.inner()))
    {
        days.entry(*record.date.inner())
            .or_default()
            .add_record(record);
    }

    days.into_iter()
        .map(|(date, acc)| acc.into_point(date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursorstat_core::DailyDate;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, n).unwrap()
    }

    fn record(n: u32, email: &str, active: bool) -> UsageRecord {
        UsageRecord {
            date: DailyDate::new(day(n)),
            email: UserEmail::new(email),
            is_active: active,
            lines: LineCounts::new(10, 5, 20, 5),
            tabs: TabCounts::new(1, 4),
            requests: Default::default(),
            extension: None,
            model: None,
            client_version: None,
        }
    }

    #[test]
    fn test_groups_by_day_within_range() {
        let data = vec![
            record(3, "a@x.io", true),
            record(1, "a@x.io", true),
            record(1, "b@x.io", true),
            record(1, "c@x.io", false),
            record(2, "a@x.io", false),
            record(9, "a@x.io", true),
        ];
        let points = build_timeline(&data, Some(DateRange::new(day(1), day(5))));

        assert_eq!(points.len(), 2);
        assert_eq!(
            points[0],
            DailyPoint {
                date: day(1),
                accepted_lines: 30,
                suggested_lines: 50,
                tabs_accepted: 2,
                tabs_shown: 8,
                active_users: 2,
            }
        );
        assert_eq!(points[1].date, day(3));
    }

    #[test]
    fn test_no_range_no_points() {
        let data = vec![record(1, "a@x.io", true)];
        assert!(build_timeline(&data, None).is_empty());
    }
}
