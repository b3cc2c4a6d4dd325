//! Common test utilities for cursorstat integration tests
//!
//! Builders for usage rows and CSV exports written into temporary
//! directories, plus a minimal template exercising every placeholder
//! family.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use cursorstat_core::{DailyDate, LineCounts, RequestCounts, TabCounts, UsageRecord, UserEmail};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Header row of a complete export, in the order the builders write fields
pub const HEADER: &str = "Date,Email,Is Active,Chat Accepted Lines Added,Chat Accepted Lines Deleted,\
Chat Suggested Lines Added,Chat Suggested Lines Deleted,Tabs Accepted,Chat Tabs Shown,\
Most Used Tab Extension,Most Used Model,Client Version,Edit Requests,Ask Requests,\
Agent Requests,Cmd+K Usages,Subscription Included Reqs,API Key Reqs,Usage Based Reqs";

/// Template touching scalars, indicators, fragments and chart arrays
pub const TEMPLATE: &str = r#"<html><body>
<p id="period">{{PERIODO_INICIO}} / {{PERIODO_FIN}}</p>
<p id="previous">{{PERIODO_ANTERIOR_INICIO}} / {{PERIODO_ANTERIOR_FIN}}</p>
<p id="users">{{USUARIOS_ACTIVOS}} / {{TOTAL_USUARIOS}}</p>
<p id="lines">{{LINEAS_ACEPTADAS}}{{LINEAS_ACEPTADAS_INDICADOR}}</p>
<p id="rate">{{TASA_ACEPTACION}}</p>
<p id="retention">{{TASA_RETENCION}}</p>
<p id="valid">{{COMPARATIVA_VALIDA}}</p>
<table>{{TOP_PRODUCTIVIDAD}}</table>
<ul>{{USUARIOS_INACTIVOS_LISTA}}</ul>
<ul>{{INSIGHTS_ESTRATEGICOS}}</ul>
<ul>{{RECOMENDACIONES_ESTRATEGICAS}}</ul>
<script>const labels = {{CHART_EVOLUTION_LABELS}};</script>
</body></html>
"#;

/// Builder for a single export row
#[derive(Debug, Clone)]
pub struct RowBuilder {
    date: String,
    email: String,
    active: String,
    accepted: u64,
    suggested: u64,
    tabs_accepted: u64,
    tabs_shown: u64,
    extension: String,
    model: String,
    version: String,
    requests: u64,
}

impl RowBuilder {
    pub fn new(date: &str, email: &str) -> Self {
        Self {
            date: date.to_string(),
            email: email.to_string(),
            active: "true".to_string(),
            accepted: 100,
            suggested: 100,
            tabs_accepted: 5,
            tabs_shown: 10,
            extension: "ts".to_string(),
            model: "claude-3.5-sonnet".to_string(),
            version: "0.42.3".to_string(),
            requests: 4,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = "false".to_string();
        self
    }

    pub fn active_token(mut self, token: &str) -> Self {
        self.active = token.to_string();
        self
    }

    pub fn lines(mut self, accepted: u64, suggested: u64) -> Self {
        self.accepted = accepted;
        self.suggested = suggested;
        self
    }

    pub fn tabs(mut self, accepted: u64, shown: u64) -> Self {
        self.tabs_accepted = accepted;
        self.tabs_shown = shown;
        self
    }

    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn requests(mut self, requests: u64) -> Self {
        self.requests = requests;
        self
    }

    /// Requests are reported as edit requests only
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},0,{},0,{},{},{},{},{},{},0,0,0,{},0,0",
            self.date,
            self.email,
            self.active,
            self.accepted,
            self.suggested,
            self.tabs_accepted,
            self.tabs_shown,
            self.extension,
            self.model,
            self.version,
            self.requests,
            self.requests,
        )
    }
}

/// Rows for `users` active users on `days` consecutive days
pub fn uniform_rows(start: NaiveDate, days: i64, users: usize) -> Vec<RowBuilder> {
    (0..days)
        .flat_map(|offset| {
            let date = (start + Duration::days(offset)).format("%Y-%m-%d").to_string();
            (0..users).map(move |user| RowBuilder::new(&date, &format!("user{user}@example.com")))
        })
        .collect()
}

/// Temporary workspace holding an export, a template and the outputs
pub struct Workspace {
    pub dir: TempDir,
    pub input: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    /// Write `rows` under the standard header and the standard template
    pub fn new(rows: &[RowBuilder]) -> Self {
        let body: Vec<String> = rows.iter().map(RowBuilder::to_csv).collect();
        Self::with_csv(&format!("{HEADER}\n{}\n", body.join("\n")))
    }

    /// Write raw CSV content
    pub fn with_csv(csv: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let input = dir.path().join("usage.csv");
        let template = dir.path().join("template.html");
        let output = dir.path().join("report.html");
        fs::write(&input, csv).expect("Failed to write CSV");
        fs::write(&template, TEMPLATE).expect("Failed to write template");
        Self {
            dir,
            input,
            template,
            output,
        }
    }

    pub fn read_output(&self) -> String {
        fs::read_to_string(&self.output).expect("Failed to read report")
    }
}

/// An in-memory record, bypassing CSV parsing
pub fn record(date: NaiveDate, email: &str, active: bool, accepted: u64) -> UsageRecord {
    UsageRecord {
        date: DailyDate::new(date),
        email: UserEmail::new(email),
        is_active: active,
        lines: LineCounts::new(accepted, 0, accepted, 0),
        tabs: TabCounts::new(1, 2),
        requests: RequestCounts {
            edit: 1,
            ..Default::default()
        },
        extension: Some("rs".to_string()),
        model: Some("gpt-4".to_string()),
        client_version: Some("1.0.0".to_string()),
    }
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).expect("valid test date")
}
