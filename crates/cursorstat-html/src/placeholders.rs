//! Placeholder values derived from a report payload

use crate::charts::ChartData;
use crate::fragments::{
    extension_rows, indicator_html, inactive_user_items, insight_items, recommendation_items,
    user_rows, version_rows,
};
use chrono::NaiveDate;
use cursorstat_analytics::ReportPayload;
use cursorstat_analytics::period::DateRange;
use cursorstat_core::format::{format_count, format_generation_date, format_number, format_optional_date};
use cursorstat_core::sanitize::sanitize_html;

/// Ordered placeholder name → value pairs
///
/// Values are final HTML; the renderer inserts them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    entries: Vec<(String, String)>,
}

impl Placeholders {
    /// Add or replace a value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn period_bounds(range: Option<DateRange>) -> (String, String) {
    (
        sanitize_html(&format_optional_date(range.map(|r| r.start))),
        sanitize_html(&format_optional_date(range.map(|r| r.end))),
    )
}

/// Every placeholder of the report
pub fn build_placeholders(payload: &ReportPayload, generated_on: NaiveDate) -> Placeholders {
    let mut values = Placeholders::default();
    let current = &payload.current;
    let adoption = &payload.adoption;
    let cohorts = &payload.cohorts;
    let comparisons = &payload.comparisons;

    let (start, end) = period_bounds(payload.periods.current);
    let (previous_start, previous_end) = period_bounds(payload.periods.previous);
    values.insert("PERIODO_INICIO", start);
    values.insert("PERIODO_FIN", end);
    values.insert("PERIODO_ANTERIOR_INICIO", previous_start);
    values.insert("PERIODO_ANTERIOR_FIN", previous_end);
    values.insert(
        "COMPARATIVA_VALIDA",
        if payload.comparison_valid() { "true" } else { "false" },
    );

    values.insert("TASA_ADOPCION", format_number(adoption.adoption_rate));
    values.insert("USUARIOS_ACTIVOS", adoption.active_users.to_string());
    values.insert("TOTAL_USUARIOS", adoption.total_users.to_string());
    values.insert("LINEAS_ACEPTADAS", format_count(current.accepted_lines));
    values.insert("TASA_ACEPTACION", format_number(current.acceptance_rate));
    values.insert("TABS_ACEPTADOS", format_count(current.tabs_accepted));
    values.insert("TASA_ACEPTACION_TABS", format_number(current.tab_acceptance_rate));
    values.insert("PROMEDIO_LINEAS", format_number(current.avg_lines_per_user));
    values.insert("PETICIONES_TOTALES", format_count(current.total_requests));
    values.insert("USUARIOS_INACTIVOS", adoption.inactive_count().to_string());
    values.insert(
        "FECHA_GENERACION",
        sanitize_html(&format_generation_date(generated_on)),
    );

    for (name, comparison) in [
        ("LINEAS_ACEPTADAS_INDICADOR", &comparisons.accepted_lines),
        ("USUARIOS_ACTIVOS_INDICADOR", &comparisons.active_users),
        ("TASA_ACEPTACION_INDICADOR", &comparisons.acceptance_rate),
        ("PETICIONES_INDICADOR", &comparisons.total_requests),
        ("TABS_INDICADOR", &comparisons.tabs_accepted),
        ("TASA_ACEPTACION_TABS_INDICADOR", &comparisons.tab_acceptance_rate),
        ("PROMEDIO_LINEAS_INDICADOR", &comparisons.avg_lines_per_user),
    ] {
        values.insert(name, indicator_html(&comparison.indicator));
    }

    values.insert("USUARIOS_CONSISTENTES", cohorts.retained.len().to_string());
    values.insert("USUARIOS_NUEVOS", cohorts.new_users.len().to_string());
    values.insert("USUARIOS_PERDIDOS", cohorts.churned.len().to_string());
    values.insert("USUARIOS_REACTIVADOS", cohorts.reactivated.len().to_string());
    values.insert("TASA_RETENCION", format_number(cohorts.retention_rate));

    let rankings = &payload.rankings;
    values.insert("TOP_PRODUCTIVIDAD", user_rows(&rankings.top_productivity));
    values.insert("TOP_PETICIONES", user_rows(&rankings.top_requests));
    values.insert("TECNOLOGIAS_UTILIZADAS", extension_rows(&rankings.top_extensions));
    values.insert("VERSIONES_CLIENTE", version_rows(&rankings.client_versions));
    values.insert(
        "USUARIOS_INACTIVOS_LISTA",
        inactive_user_items(&adoption.inactive_users),
    );
    values.insert(
        "RECOMENDACIONES_ESTRATEGICAS",
        recommendation_items(&payload.recommendations),
    );
    values.insert("INSIGHTS_ESTRATEGICOS", insight_items(&payload.insights));

    let charts = ChartData::from_payload(payload);
    values.insert("CHART_MODELS_LABELS", charts.model_labels);
    values.insert("CHART_MODELS_DATA", charts.model_shares);
    values.insert("CHART_EVOLUTION_LABELS", charts.evolution_labels);
    values.insert("CHART_EVOLUTION_ACCEPTED", charts.evolution_accepted);
    values.insert("CHART_EVOLUTION_SUGGESTED", charts.evolution_suggested);
    values.insert("CHART_EVOLUTION_USERS", charts.evolution_users);
    values.insert("CHART_TABS_ACCEPTED", charts.tabs_accepted);
    values.insert("CHART_TABS_SHOWN", charts.tabs_shown);

    for (name, caption) in &payload.kpi_captions {
        values.insert(*name, *caption);
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursorstat_analytics::build_report;
    use cursorstat_core::{DailyDate, LineCounts, UsageRecord, UserEmail};

    fn record(day: u32, email: &str) -> UsageRecord {
        UsageRecord {
            date: DailyDate::new(NaiveDate::from_ymd_opt(2024, 3, day).unwrap()),
            email: UserEmail::new(email),
            is_active: true,
            lines: LineCounts::new(1200, 0, 2400, 0),
            tabs: Default::default(),
            requests: Default::default(),
            extension: Some("rs".to_string()),
            model: Some("gpt-4".to_string()),
            client_version: Some("1.0".to_string()),
        }
    }

    #[test]
    fn test_placeholder_values() {
        let data = vec![record(1, "a@x.io"), record(2, "b@x.io")];
        let payload = build_report(&data, None);
        let values = build_placeholders(&payload, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());

        assert_eq!(values.get("PERIODO_INICIO"), Some("01 marzo 2024"));
        assert_eq!(values.get("PERIODO_FIN"), Some("02 marzo 2024"));
        assert_eq!(values.get("PERIODO_ANTERIOR_INICIO"), Some("N/A"));
        assert_eq!(values.get("COMPARATIVA_VALIDA"), Some("false"));
        assert_eq!(values.get("LINEAS_ACEPTADAS"), Some("2.400"));
        assert_eq!(values.get("TASA_ACEPTACION"), Some("50"));
        assert_eq!(values.get("TOTAL_USUARIOS"), Some("2"));
        assert_eq!(values.get("FECHA_GENERACION"), Some("9 de marzo de 2024"));
        assert_eq!(values.get("CHART_EVOLUTION_LABELS"), Some(r#"["01 mar","02 mar"]"#));
        assert_eq!(values.get("CHART_MODELS_DATA"), Some("[100.0]"));
        assert_eq!(values.get("LINEAS_TEXTO"), Some("Fase inicial de adopción"));
        assert!(
            values
                .get("USUARIOS_ACTIVOS_INDICADOR")
                .is_some_and(|v| v.contains("🆕 Nuevo"))
        );
    }

    #[test]
    fn test_every_name_is_upper_snake_case() {
        let payload = build_report(&[record(1, "a@x.io")], None);
        let values = build_placeholders(&payload, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(values.len(), 56);
        assert!(values.iter().all(|(name, _)| {
            name.chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        }));
    }

    #[test]
    fn test_insert_replaces() {
        let mut values = Placeholders::default();
        values.insert("A", "1");
        values.insert("A", "2");
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("A"), Some("2"));
    }
}
