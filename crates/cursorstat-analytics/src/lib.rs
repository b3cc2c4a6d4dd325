//! Comparative usage analytics for cursorstat
//!
//! This crate splits a loaded dataset into a previous and a current period,
//! aggregates metrics for each, classifies users into cohorts and derives
//! the narrative texts of the report.
//!
//! # Example
//!
//! ```
//! use cursorstat_analytics::build_report;
//! use cursorstat_core::{DailyDate, UsageRecord, UserEmail};
//!
//! let record = UsageRecord {
//!     date: DailyDate::parse("2024-03-01").unwrap(),
//!     email: UserEmail::new("dev@example.com"),
//!     is_active: true,
//!     lines: Default::default(),
//!     tabs: Default::default(),
//!     requests: Default::default(),
//!     extension: None,
//!     model: None,
//!     client_version: None,
//! };
//! let report = build_report(&[record], None);
//! assert!(!report.comparison_valid());
//! assert_eq!(report.adoption.active_users, 1);
//! ```

pub mod cohort;
pub mod insights;
pub mod metrics;
pub mod period;
pub mod rankings;
pub mod report;
pub mod timeline;

pub use cohort::{Cohort, CohortAnalysis};
pub use metrics::{ComparisonIndicator, MetricComparison, PeriodMetrics};
pub use period::{DateRange, ManualPeriodInput, ManualPeriods, PeriodSplit};
pub use report::{ReportPayload, build_report};
