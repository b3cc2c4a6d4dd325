//! User cohort classification between two periods
//!
//! Every user active in either period lands in exactly one cohort:
//!
//! | Cohort      | Active in previous | Active in current | Seen in previous |
//! |-------------|--------------------|-------------------|------------------|
//! | retained    | yes                | yes               | yes              |
//! | reactivated | no                 | yes               | yes              |
//! | new         | no                 | yes               | no               |
//! | churned     | yes                | no                | yes              |

use crate::metrics::percentage;
use cursorstat_core::{UsageRecord, UserEmail};
use serde::Serialize;
use std::collections::BTreeSet;

/// Cohort of a single user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    Retained,
    New,
    Reactivated,
    Churned,
}

/// Users grouped by cohort, each list sorted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CohortAnalysis {
    pub retained: Vec<UserEmail>,
    pub new_users: Vec<UserEmail>,
    pub reactivated: Vec<UserEmail>,
    pub churned: Vec<UserEmail>,
    /// Distinct active users in the current period
    pub current_active: usize,
    /// Distinct active users in the previous period
    pub previous_active: usize,
    /// retained / previous active × 100, or 0 without previous users
    pub retention_rate: f64,
}

fn active_users<'a>(records: &[&'a UsageRecord]) -> BTreeSet<&'a UserEmail> {
    records
        .iter()
        .filter(|r| r.is_active && !r.email.is_empty())
        .map(|r| &r.email)
        .collect()
}

impl CohortAnalysis {
    /// Classify the users of both periods
    pub fn analyze(current: &[&UsageRecord], previous: &[&UsageRecord]) -> Self {
        let current_active = active_users(current);
        let previous_active = active_users(previous);
        let previously_seen: BTreeSet<&UserEmail> = previous
            .iter()
            .filter(|r| !r.email.is_empty())
            .map(|r| &r.email)
            .collect();

        let owned = |set: BTreeSet<&UserEmail>| set.into_iter().cloned().collect::<Vec<_>>();

        let retained: BTreeSet<_> = current_active.intersection(&previous_active).copied().collect();
        let (reactivated, new_users): (BTreeSet<_>, BTreeSet<_>) = current_active
            .difference(&previous_active)
            .copied()
            .partition(|email| previously_seen.contains(email));
        let churned: BTreeSet<_> = previous_active.difference(&current_active).copied().collect();

        Self {
            retention_rate: percentage(retained.len() as f64, previous_active.len() as f64),
            current_active: current_active.len(),
            previous_active: previous_active.len(),
            retained: owned(retained),
            new_users: owned(new_users),
            reactivated: owned(reactivated),
            churned: owned(churned),
        }
    }

    /// Cohort of a user, or `None` if they were active in neither period
    pub fn classify(&self, email: &UserEmail) -> Option<Cohort> {
        [
            (&self.retained, Cohort::Retained),
            (&self.new_users, Cohort::New),
            (&self.reactivated, Cohort::Reactivated),
            (&self.churned, Cohort::Churned),
        ]
        .into_iter()
        .find(|(users, _)| users.binary_search(email).is_ok())
        .map(|(_, cohort)| cohort)
    }
}
