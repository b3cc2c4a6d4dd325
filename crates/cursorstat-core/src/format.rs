//! Spanish-locale number and date formatting
//!
//! Reports use `.` as the thousands separator and `,` as the decimal
//! separator, and Spanish month names.
//!
//! # Example
//!
//! ```
//! use cursorstat_core::format::{format_count, format_number};
//!
//! assert_eq!(format_count(1234567), "1.234.567");
//! assert_eq!(format_number(1234.56), "1.234,6");
//! assert_eq!(format_number(85.0), "85");
//! ```

use chrono::{Datelike, NaiveDate};

/// Full month names, January first
pub const MONTHS_LONG: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Abbreviated month names, January first
pub const MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Placeholder shown for an absent date
pub const MISSING_DATE: &str = "N/A";

/// Group the digits of an unsigned integer with `.` separators
pub fn format_count(n: u64) -> String {
    group_digits(&n.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut result = String::new();

    for (count, ch) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }

    result.chars().rev().collect()
}

/// Format a number Spanish-style
///
/// Integral values get no decimals; anything else gets exactly one decimal
/// after rounding. Non-finite values render as `0`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    if magnitude.fract() == 0.0 {
        return format!("{sign}{}", group_digits(&format!("{magnitude:.0}")));
    }

    let fixed = format!("{magnitude:.1}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));
    let signed = if int_part == "0" && frac_part == "0" { "" } else { sign };
    format!("{signed}{},{frac_part}", group_digits(int_part))
}

/// `dd <month> yyyy`, e.g. `05 marzo 2024`
pub fn format_date_long(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS_LONG[date.month0() as usize],
        date.year()
    )
}

/// `dd <mon>`, e.g. `05 mar`
pub fn format_date_short(date: NaiveDate) -> String {
    format!("{:02} {}", date.day(), MONTHS_SHORT[date.month0() as usize])
}

/// Long form, or `N/A` when there is no date
pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date_long)
        .unwrap_or_else(|| MISSING_DATE.to_string())
}

/// `<day> de <month> de <year>`, e.g. `5 de marzo de 2024`
pub fn format_generation_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS_LONG[date.month0() as usize],
        date.year()
    )
}
