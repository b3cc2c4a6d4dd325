//! HTML fragments inserted into the template
//!
//! Every data-derived string is passed through
//! [`sanitize_html`](cursorstat_core::sanitize::sanitize_html) before it is
//! embedded. The trailing whitespace after each row matches the indentation
//! of the shipped template.

use cursorstat_analytics::metrics::ComparisonIndicator;
use cursorstat_analytics::rankings::{ExtensionUsage, RankedUser, ValueCount};
use cursorstat_core::UserEmail;
use cursorstat_core::format::{format_count, format_number};
use cursorstat_core::sanitize::{css_class, sanitize_html};
use std::fmt::Write;

/// Separator after each table row
pub const ROW_SEPARATOR: &str = "\n                            ";

/// Separator after each list item
pub const ITEM_SEPARATOR: &str = "\n                ";

/// `<tr>` rows of email and value, for the productivity and request tables
pub fn user_rows(users: &[RankedUser]) -> String {
    let mut html = String::new();
    for user in users {
        let _ = write!(
            html,
            "<tr><td>{}</td><td class=\"text-right\">{}</td></tr>{ROW_SEPARATOR}",
            sanitize_html(user.email.as_str()),
            format_count(user.value)
        );
    }
    html
}

/// `<tr>` rows with an extension badge, accepted lines and distinct users
pub fn extension_rows(extensions: &[ExtensionUsage]) -> String {
    let mut html = String::new();
    for usage in extensions {
        let _ = write!(
            html,
            "<tr><td><span class=\"badge {}\">{}</span></td>\
             <td class=\"text-right\">{}</td><td class=\"text-right\">{}</td></tr>{ROW_SEPARATOR}",
            css_class(&usage.extension),
            sanitize_html(&usage.extension),
            format_count(usage.lines),
            usage.users
        );
    }
    html
}

/// `<tr>` rows of client version, occurrences and share
pub fn version_rows(versions: &[ValueCount]) -> String {
    let mut html = String::new();
    for version in versions {
        let _ = write!(
            html,
            "<tr><td>{}</td><td class=\"text-right\">{}</td>\
             <td class=\"text-right\">{}%</td></tr>{ROW_SEPARATOR}",
            sanitize_html(&version.value),
            version.count,
            format_number(version.share)
        );
    }
    html
}

/// `<li>` items of users without activity
pub fn inactive_user_items(users: &[UserEmail]) -> String {
    let mut html = String::new();
    for user in users {
        let _ = write!(html, "<li>{}</li>{ITEM_SEPARATOR}", sanitize_html(user.as_str()));
    }
    html
}

/// `<li>` items of insights; the texts already carry trusted markup
pub fn insight_items(insights: &[String]) -> String {
    let mut html = String::new();
    for insight in insights {
        let _ = write!(html, "<li>{insight}</li>{ITEM_SEPARATOR}");
    }
    html
}

/// `<li>` items of recommendations, separated but without a trailing separator
pub fn recommendation_items(recommendations: &[String]) -> String {
    recommendations
        .iter()
        .map(|item| format!("<li>{item}</li>"))
        .collect::<Vec<_>>()
        .join(ITEM_SEPARATOR)
}

/// Inline badge shown next to a KPI, with a leading space
pub fn indicator_html(indicator: &ComparisonIndicator) -> String {
    format!(
        " <span class=\"comparison-indicator {}\">{}</span>",
        indicator.tone().as_str(),
        indicator.label()
    )
}
