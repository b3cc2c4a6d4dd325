//! Assembly of the complete report payload
//!
//! [`build_report`] runs every analysis step in order and gathers the
//! results into a [`ReportPayload`], which the renderer consumes once.

use crate::cohort::CohortAnalysis;
use crate::insights::{KpiInputs, comparative_insights, kpi_captions, recommendations};
use crate::metrics::{MetricComparisons, PeriodMetrics, percentage, round1};
use crate::period::{ManualPeriods, PeriodInfo, PeriodSplit};
use crate::rankings::Rankings;
use crate::timeline::{DailyPoint, build_timeline};
use cursorstat_core::{UsageRecord, UserEmail};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// User coverage of the current period
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Adoption {
    /// Distinct users with any record in the current period
    pub total_users: usize,
    /// Distinct users with an active record in the current period
    pub active_users: usize,
    /// active / total × 100, one decimal
    pub adoption_rate: f64,
    /// Users present but never active, sorted
    pub inactive_users: Vec<UserEmail>,
}

impl Adoption {
    pub fn from_records(records: &[&UsageRecord]) -> Self {
        let known = |r: &&&UsageRecord| !r.email.is_empty();
        let all: BTreeSet<&UserEmail> = records.iter().filter(known).map(|r| &r.email).collect();
        let active: BTreeSet<&UserEmail> = records
            .iter()
            .filter(known)
            .filter(|r| r.is_active)
            .map(|r| &r.email)
            .collect();

        Self {
            total_users: all.len(),
            active_users: active.len(),
            adoption_rate: round1(percentage(active.len() as f64, all.len() as f64)),
            inactive_users: all.difference(&active).map(|e| (*e).clone()).collect(),
        }
    }

    pub fn inactive_count(&self) -> usize {
        self.inactive_users.len()
    }
}

/// Everything the renderer needs
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub periods: PeriodInfo,
    pub current: PeriodMetrics,
    pub previous: PeriodMetrics,
    pub comparisons: MetricComparisons,
    pub adoption: Adoption,
    pub cohorts: CohortAnalysis,
    pub rankings: Rankings,
    pub timeline: Vec<DailyPoint>,
    /// Comparative observations, HTML-bearing
    pub insights: Vec<String>,
    /// Strategic recommendations, HTML-bearing
    pub recommendations: Vec<String>,
    /// KPI placeholder name and caption
    pub kpi_captions: Vec<(&'static str, &'static str)>,
}

impl ReportPayload {
    pub fn comparison_valid(&self) -> bool {
        self.periods.comparison_valid
    }
}

/// Run the full analysis over a loaded dataset
///
/// `manual` must already be validated; `None` selects the automatic split.
pub fn build_report(records: &[UsageRecord], manual: Option<&ManualPeriods>) -> ReportPayload {
    let split = PeriodSplit::new(records, manual);

    let current = PeriodMetrics::from_records(split.current.records.iter().copied());
    let previous = PeriodMetrics::from_records(split.previous.records.iter().copied());
    debug!("Current period metrics: {current:?}");
    debug!("Previous period metrics: {previous:?}");

    let cohorts = CohortAnalysis::analyze(&split.current.records, &split.previous.records);
    let adoption = Adoption::from_records(&split.current.records);
    let rankings = Rankings::from_records(&split.current.records);
    let timeline = build_timeline(records, split.overall_range());

    let insights = comparative_insights(&current, &previous, &cohorts, split.comparison_valid);
    let recommendations = recommendations(&rankings, adoption.inactive_count());
    let kpi_captions = kpi_captions(&KpiInputs::new(
        &current,
        &cohorts,
        adoption.adoption_rate,
        adoption.inactive_count(),
    ));

    info!(
        "Analysis complete: {} active of {} users, {} accepted lines, retention {:.1}%",
        adoption.active_users, adoption.total_users, current.accepted_lines, cohorts.retention_rate
    );

    ReportPayload {
        periods: split.info(),
        comparisons: MetricComparisons::new(&current, &previous),
        current,
        previous,
        adoption,
        cohorts,
        rankings,
        timeline,
        insights,
        recommendations,
        kpi_captions,
    }
}
