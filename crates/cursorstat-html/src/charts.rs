//! JSON arrays consumed by the report's charts
//!
//! Each array is sanitized (strings escaped, numbers clamped) and then
//! serialized compactly, without ASCII escaping.

use cursorstat_analytics::ReportPayload;
use cursorstat_core::format::format_date_short;
use cursorstat_core::sanitize::sanitize_json;
use serde_json::Value;

/// Serialized chart arrays, one field per placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartData {
    pub model_labels: String,
    pub model_shares: String,
    pub evolution_labels: String,
    pub evolution_accepted: String,
    pub evolution_suggested: String,
    pub evolution_users: String,
    pub tabs_accepted: String,
    pub tabs_shown: String,
}

fn json_array<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> String {
    let array = Value::Array(items.into_iter().map(Into::into).collect());
    sanitize_json(array).to_string()
}

impl ChartData {
    pub fn from_payload(payload: &ReportPayload) -> Self {
        let models = &payload.rankings.models;
        let timeline = &payload.timeline;

        Self {
            model_labels: json_array(models.iter().map(|m| m.value.clone())),
            model_shares: json_array(models.iter().map(|m| m.share)),
            evolution_labels: json_array(timeline.iter().map(|p| format_date_short(p.date))),
            evolution_accepted: json_array(timeline.iter().map(|p| p.accepted_lines)),
            evolution_suggested: json_array(timeline.iter().map(|p| p.suggested_lines)),
            evolution_users: json_array(timeline.iter().map(|p| p.active_users as u64)),
            tabs_accepted: json_array(timeline.iter().map(|p| p.tabs_accepted)),
            tabs_shown: json_array(timeline.iter().map(|p| p.tabs_shown)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_array_strings_are_sanitized() {
        assert_eq!(
            json_array(vec!["<script>".to_string(), "año".to_string()]),
            r#"["&lt;script&gt;","año"]"#
        );
    }

    #[test]
    fn test_json_array_numbers() {
        assert_eq!(json_array(vec![1u64, 2, 3]), "[1,2,3]");
        assert_eq!(json_array(vec![66.7f64, 2e16]), "[66.7,1e15]");
        assert_eq!(json_array(Vec::<u64>::new()), "[]");
    }
}
