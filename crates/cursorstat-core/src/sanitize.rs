//! Sanitization of data-derived text and numbers
//!
//! Every string that originates in the export passes through
//! [`sanitize_html`] before it reaches the report, and every number bound
//! for a chart passes through [`clamp_number`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// Longest sanitized text kept verbatim
pub const MAX_TEXT_LEN: usize = 1000;

/// Magnitude beyond which chart numbers are clamped
pub const NUMERIC_LIMIT: f64 = 1e15;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid")
});

static CSS_UNSAFE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("css pattern is valid"));

fn is_stripped_control(c: char) -> bool {
    matches!(c,
        '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}'..='\u{9F}')
}

/// Escape HTML, strip control characters and cap the length
///
/// # Examples
/// ```
/// use cursorstat_core::sanitize::sanitize_html;
///
/// assert_eq!(
///     sanitize_html("<script>alert('x')</script>"),
///     "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
/// );
/// assert_eq!(sanitize_html("tab\u{0}less"), "tabless");
/// ```
pub fn sanitize_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c if is_stripped_control(c) => {}
            c => out.push(c),
        }
    }

    if out.chars().count() > MAX_TEXT_LEN {
        warn!(
            "Text truncated for safety: original length {}",
            text.chars().count()
        );
        let mut truncated: String = out.chars().take(MAX_TEXT_LEN - 3).collect();
        truncated.push_str("...");
        return truncated;
    }

    out
}

/// Reduce a label to characters safe inside a CSS class attribute
pub fn css_class(label: &str) -> String {
    CSS_UNSAFE_RE.replace_all(label, "").into_owned()
}

/// Basic e-mail shape check, applied after trimming
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Replace non-finite numbers with 0 and clamp extreme magnitudes
pub fn clamp_number(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if value.abs() > NUMERIC_LIMIT {
        warn!("Extreme numeric value clamped: {value}");
        return NUMERIC_LIMIT.copysign(value);
    }
    value
}

/// Recursively sanitize a JSON value bound for a chart
///
/// Strings are HTML-sanitized, numbers are clamped and nulls become empty
/// strings.
pub fn sanitize_json(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_json).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, sanitize_json(value)))
                .collect(),
        ),
        Value::String(text) => Value::String(sanitize_html(&text)),
        Value::Number(number) => match number.as_f64() {
            Some(f) if f.abs() > NUMERIC_LIMIT => serde_json::Number::from_f64(clamp_number(f))
                .map(Value::Number)
                .unwrap_or_else(|| Value::from(0)),
            _ => Value::Number(number),
        },
        Value::Null => Value::String(String::new()),
        other => other,
    }
}
