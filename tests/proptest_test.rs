//! Property-based tests for cursorstat using proptest

mod common;

use common::{date, record};
use cursorstat_analytics::metrics::PeriodMetrics;
use cursorstat_analytics::period::{MIN_COMPARATIVE_DAYS, distinct_dates};
use cursorstat_analytics::{CohortAnalysis, PeriodSplit};
use cursorstat_core::format::format_count;
use cursorstat_core::sanitize::sanitize_html;
use cursorstat_core::{UsageRecord, UserEmail};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Strategies for generating test data

prop_compose! {
    fn arb_record()(
        day in 1u32..=28,
        user in 0usize..6,
        active in prop::bool::weighted(0.8),
        accepted in 0u64..2_000,
    ) -> UsageRecord {
        record(date(day), &format!("user{user}@example.com"), active, accepted)
    }
}

fn arb_records() -> impl Strategy<Value = Vec<UsageRecord>> {
    prop::collection::vec(arb_record(), 1..120)
}

fn active_emails(records: &[&UsageRecord]) -> BTreeSet<UserEmail> {
    records
        .iter()
        .filter(|r| r.is_active)
        .map(|r| r.email.clone())
        .collect()
}

proptest! {
    #[test]
    fn test_automatic_split_halves_distinct_dates(records in arb_records()) {
        let total = distinct_dates(&records).len();
        let split = PeriodSplit::new(&records, None);

        if total >= MIN_COMPARATIVE_DAYS {
            prop_assert_eq!(split.previous.days + split.current.days, total);
            prop_assert_eq!(split.previous.days, total / 2);
            prop_assert_eq!(
                split.previous.records.len() + split.current.records.len(),
                records.len()
            );
        } else {
            prop_assert!(!split.comparison_valid);
            prop_assert!(split.previous.records.is_empty());
        }
    }

    #[test]
    fn test_rates_are_bounded(records in arb_records()) {
        let metrics = PeriodMetrics::from_records(&records);
        prop_assert!(metrics.acceptance_rate >= 0.0);
        prop_assert!(metrics.tab_acceptance_rate >= 0.0);
        if metrics.suggested_lines == 0 {
            prop_assert_eq!(metrics.acceptance_rate, 0.0);
        }
        if metrics.tabs_shown == 0 {
            prop_assert_eq!(metrics.tab_acceptance_rate, 0.0);
        }
    }

    #[test]
    fn test_cohorts_partition_active_users(records in arb_records()) {
        let split = PeriodSplit::new(&records, None);
        let cohorts = CohortAnalysis::analyze(&split.current.records, &split.previous.records);

        let mut seen = BTreeSet::new();
        let groups = [
            &cohorts.retained,
            &cohorts.new_users,
            &cohorts.reactivated,
            &cohorts.churned,
        ];
        for group in groups {
            for email in group {
                // Disjoint: no user lands in two cohorts
                prop_assert!(seen.insert(email.clone()));
            }
        }

        let mut expected = active_emails(&split.current.records);
        expected.extend(active_emails(&split.previous.records));
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn test_retention_is_a_percentage(records in arb_records()) {
        let split = PeriodSplit::new(&records, None);
        let cohorts = CohortAnalysis::analyze(&split.current.records, &split.previous.records);

        prop_assert!((0.0..=100.0).contains(&cohorts.retention_rate));
        if cohorts.previous_active == 0 {
            prop_assert_eq!(cohorts.retention_rate, 0.0);
        }
    }

    #[test]
    fn test_sanitize_alphanumeric_is_identity(text in "[a-zA-Z0-9]{0,200}") {
        let once = sanitize_html(&text);
        prop_assert_eq!(&once, &text);
        prop_assert_eq!(sanitize_html(&once), once);
    }

    #[test]
    fn test_sanitize_never_leaves_markup(text in "\\PC{0,300}") {
        let clean = sanitize_html(&text);
        prop_assert!(!clean.contains('<'));
        prop_assert!(!clean.contains('>'));
        prop_assert!(!clean.contains('"'));
    }

    #[test]
    fn test_format_count_preserves_digits(n in any::<u64>()) {
        let formatted = format_count(n);
        prop_assert_eq!(formatted.replace('.', ""), n.to_string());
        prop_assert!(formatted.split('.').skip(1).all(|group| group.len() == 3));
    }
}
