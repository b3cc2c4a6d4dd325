//! Core domain types for cursorstat
//!
//! This module contains the fundamental types used throughout the workspace.
//! These types provide strong typing for user identifiers, calendar dates and
//! the counter groups carried by every row of a usage export.

use crate::sanitize::NUMERIC_LIMIT;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use tracing::warn;

/// Strongly-typed user identifier (the `Email` column)
///
/// # Examples
/// ```
/// use cursorstat_core::types::UserEmail;
///
/// let user = UserEmail::new("  ana@example.com ");
/// assert_eq!(user.as_str(), "ana@example.com");
/// assert!(!user.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserEmail(String);

impl UserEmail {
    /// Create a new UserEmail, trimming surrounding whitespace
    pub fn new(email: impl Into<String>) -> Self {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.len() == email.len() {
            Self(email)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rows without an identifier never count as a user
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Calendar date of a usage row
///
/// Exports carry either plain dates or midnight timestamps; only the date
/// part is kept.
///
/// # Examples
/// ```
/// use cursorstat_core::types::DailyDate;
///
/// let date = DailyDate::parse("2024-01-15T00:00:00.000Z").unwrap();
/// assert_eq!(date.format("%Y-%m-%d"), "2024-01-15");
/// assert!(DailyDate::parse("not a date").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DailyDate(NaiveDate);

impl DailyDate {
    /// Create a new DailyDate
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Get the inner NaiveDate
    pub fn inner(&self) -> &NaiveDate {
        &self.0
    }

    /// Parse the date column of an export
    ///
    /// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS`
    /// (with optional fraction) and US-style `MM/DD/YYYY`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(Self(date));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.date_naive()));
        }
        for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(Self(dt.date()));
            }
        }
        NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok().map(Self)
    }

    /// Format with a chrono format string
    pub fn format(&self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }
}

impl fmt::Display for DailyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for DailyDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Parse a value of the `Is Active` column
///
/// The vocabulary is `true`, `True`, `1`, `false`, `False` and `0`.
/// Anything else, including an empty cell, is `None`.
pub fn parse_active_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "True" | "1" => Some(true),
        "false" | "False" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a numeric counter cell
///
/// Returns `None` for empty or non-numeric cells. Fractional, negative or
/// non-finite values are still `Some` here; [`parse_count`] decides how
/// they are folded into a counter.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok()
}

/// Parse a counter cell into a non-negative integer (missing → 0)
///
/// Values above [`NUMERIC_LIMIT`] are clamped to it.
pub fn parse_count(raw: &str) -> u64 {
    match parse_numeric(raw) {
        Some(value) if value.is_finite() && value > 0.0 => {
            if value > NUMERIC_LIMIT {
                warn!("Counter value {value} clamped to {NUMERIC_LIMIT}");
            }
            value.min(NUMERIC_LIMIT).round() as u64
        }
        _ => 0,
    }
}

/// Chat line counters
///
/// # Examples
/// ```
/// use cursorstat_core::types::LineCounts;
///
/// let lines = LineCounts::new(80, 20, 150, 50);
/// assert_eq!(lines.accepted(), 100);
/// assert_eq!(lines.suggested(), 200);
/// ```
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineCounts {
    /// `Chat Accepted Lines Added`
    pub accepted_added: u64,
    /// `Chat Accepted Lines Deleted`
    pub accepted_deleted: u64,
    /// `Chat Suggested Lines Added`
    pub suggested_added: u64,
    /// `Chat Suggested Lines Deleted`
    pub suggested_deleted: u64,
}

impl LineCounts {
    /// Create new LineCounts
    pub fn new(
        accepted_added: u64,
        accepted_deleted: u64,
        suggested_added: u64,
        suggested_deleted: u64,
    ) -> Self {
        Self {
            accepted_added,
            accepted_deleted,
            suggested_added,
            suggested_deleted,
        }
    }

    /// Accepted lines, added plus deleted
    pub fn accepted(&self) -> u64 {
        self.accepted_added.saturating_add(self.accepted_deleted)
    }

    /// Suggested lines, added plus deleted
    pub fn suggested(&self) -> u64 {
        self.suggested_added.saturating_add(self.suggested_deleted)
    }
}

impl Add for LineCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            accepted_added: self.accepted_added.saturating_add(other.accepted_added),
            accepted_deleted: self.accepted_deleted.saturating_add(other.accepted_deleted),
            suggested_added: self.suggested_added.saturating_add(other.suggested_added),
            suggested_deleted: self.suggested_deleted.saturating_add(other.suggested_deleted),
        }
    }
}

impl AddAssign for LineCounts {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Tab completion counters
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabCounts {
    /// `Tabs Accepted`
    pub accepted: u64,
    /// `Chat Tabs Shown`
    pub shown: u64,
}

impl TabCounts {
    /// Create new TabCounts
    pub fn new(accepted: u64, shown: u64) -> Self {
        Self { accepted, shown }
    }
}

impl Add for TabCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            accepted: self.accepted.saturating_add(other.accepted),
            shown: self.shown.saturating_add(other.shown),
        }
    }
}

impl AddAssign for TabCounts {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Request counters for the seven request categories
///
/// # Examples
/// ```
/// use cursorstat_core::types::RequestCounts;
///
/// let requests = RequestCounts {
///     edit: 3,
///     ask: 2,
///     agent: 5,
///     ..Default::default()
/// };
/// assert_eq!(requests.total(), 10);
/// ```
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestCounts {
    /// `Edit Requests`
    pub edit: u64,
    /// `Ask Requests`
    pub ask: u64,
    /// `Agent Requests`
    pub agent: u64,
    /// `Cmd+K Usages`
    pub cmd_k: u64,
    /// `Subscription Included Reqs`
    pub subscription_included: u64,
    /// `API Key Reqs`
    pub api_key: u64,
    /// `Usage Based Reqs`
    pub usage_based: u64,
}

impl RequestCounts {
    /// Sum over every category
    pub fn total(&self) -> u64 {
        [
            self.ask,
            self.agent,
            self.cmd_k,
            self.subscription_included,
            self.api_key,
            self.usage_based,
        ]
        .into_iter()
        .fold(self.edit, u64::saturating_add)
    }
}

impl Add for RequestCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            edit: self.edit.saturating_add(other.edit),
            ask: self.ask.saturating_add(other.ask),
            agent: self.agent.saturating_add(other.agent),
            cmd_k: self.cmd_k.saturating_add(other.cmd_k),
            subscription_included: self
                .subscription_included
                .saturating_add(other.subscription_included),
            api_key: self.api_key.saturating_add(other.api_key),
            usage_based: self.usage_based.saturating_add(other.usage_based),
        }
    }
}

impl AddAssign for RequestCounts {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// One row of the usage export: a single user on a single day
///
/// # Examples
/// ```
/// use cursorstat_core::types::{DailyDate, LineCounts, UsageRecord, UserEmail};
///
/// let record = UsageRecord {
///     date: DailyDate::parse("2024-03-01").unwrap(),
///     email: UserEmail::new("dev@example.com"),
///     is_active: true,
///     lines: LineCounts::new(100, 0, 100, 0),
///     tabs: Default::default(),
///     requests: Default::default(),
///     extension: Some("rs".to_string()),
///     model: None,
///     client_version: None,
/// };
/// assert_eq!(record.lines.accepted(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Day of the activity
    pub date: DailyDate,
    /// User identifier
    pub email: UserEmail,
    /// Whether the user performed qualifying activity that day
    pub is_active: bool,
    /// Chat line counters
    #[serde(flatten)]
    pub lines: LineCounts,
    /// Tab completion counters
    pub tabs: TabCounts,
    /// Request counters
    pub requests: RequestCounts,
    /// `Most Used Tab Extension`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// `Most Used Model`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// `Client Version`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_version: Option<String>,
}
