//! Leaderboards and categorical breakdowns of the current period
//!
//! All rankings consider active records only. Ties are broken by key in
//! ascending order so output is deterministic.

use crate::metrics::{percentage, round1};
use cursorstat_core::{UsageRecord, UserEmail};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const TOP_USERS: usize = 10;
pub const TOP_EXTENSIONS: usize = 8;
pub const TOP_MODELS: usize = 6;
pub const TOP_CLIENT_VERSIONS: usize = 8;

/// A user and a summed counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedUser {
    pub email: UserEmail,
    pub value: u64,
}

/// Accepted lines and distinct users per tab extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionUsage {
    pub extension: String,
    pub lines: u64,
    pub users: usize,
}

/// Occurrences of a categorical value and its share of the listed total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
    /// Percentage of the summed counts of the listed values, one decimal
    pub share: f64,
}

/// Every ranking shown in the report
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rankings {
    pub top_productivity: Vec<RankedUser>,
    pub top_requests: Vec<RankedUser>,
    pub top_extensions: Vec<ExtensionUsage>,
    pub models: Vec<ValueCount>,
    pub client_versions: Vec<ValueCount>,
}

impl Rankings {
    pub fn from_records(records: &[&UsageRecord]) -> Self {
        let active: Vec<&UsageRecord> = records.iter().copied().filter(|r| r.is_active).collect();

        Self {
            top_productivity: top_users(&active, |r| r.lines.accepted()),
            top_requests: top_users(&active, |r| r.requests.total()),
            top_extensions: top_extensions(&active),
            models: value_counts(active.iter().map(|r| r.model.as_deref()), TOP_MODELS),
            client_versions: value_counts(
                active.iter().map(|r| r.client_version.as_deref()),
                TOP_CLIENT_VERSIONS,
            ),
        }
    }

    /// The most common client version, if any was reported
    pub fn leading_version(&self) -> Option<&ValueCount> {
        self.client_versions.first()
    }

    /// Unrounded share of the leading client version among listed versions
    pub fn leading_version_share(&self) -> Option<f64> {
        let leading = self.leading_version()?;
        let listed: usize = self.client_versions.iter().map(|v| v.count).sum();
        Some(percentage(leading.count as f64, listed as f64))
    }
}

fn top_users(records: &[&UsageRecord], value: impl Fn(&UsageRecord) -> u64) -> Vec<RankedUser> {
    let mut totals: HashMap<&UserEmail, u64> = HashMap::new();
    for record in records.iter().filter(|r| !r.email.is_empty()) {
        let total = totals.entry(&record.email).or_default();
        *total = total.saturating_add(value(*record));
    }

    let mut ranked: Vec<RankedUser> = totals
        .into_iter()
        .map(|(email, value)| RankedUser {
            email: email.clone(),
            value,
        })
        .collect();
    ranked.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.email.cmp(&b.email)));
    ranked.truncate(TOP_USERS);
    ranked
}

fn top_extensions(records: &[&UsageRecord]) -> Vec<ExtensionUsage> {
    let mut by_extension: BTreeMap<&str, (u64, BTreeSet<&UserEmail>)> = BTreeMap::new();
    for record in records.iter().filter(|r| r.lines.accepted() > 0) {
        let Some(extension) = record.extension.as_deref() else {
            continue;
        };
        let entry = by_extension.entry(extension).or_default();
        entry.0 = entry.0.saturating_add(record.lines.accepted());
        if !record.email.is_empty() {
            entry.1.insert(&record.email);
        }
    }

    let mut usage: Vec<ExtensionUsage> = by_extension
        .into_iter()
        .map(|(extension, (lines, users))| ExtensionUsage {
            extension: extension.to_string(),
            lines,
            users: users.len(),
        })
        .collect();
    usage.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.extension.cmp(&b.extension)));
    usage.truncate(TOP_EXTENSIONS);
    usage
}

fn value_counts<'a>(values: impl Iterator<Item = Option<&'a str>>, limit: usize) -> Vec<ValueCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.flatten() {
        *counts.entry(value).or_default() += 1;
    }

    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted.truncate(limit);

    let listed: usize = sorted.iter().map(|(_, count)| count).sum();
    sorted
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
            share: round1(percentage(count as f64, listed as f64)),
        })
        .collect()
}
