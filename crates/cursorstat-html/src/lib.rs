//! HTML report rendering for cursorstat
//!
//! The renderer fills a caller-supplied HTML template. Tokens of the form
//! `{{NAME}}` are replaced in a single pass with values derived from a
//! [`ReportPayload`]; there is no template language beyond that.
//!
//! # Example
//!
//! ```
//! use cursorstat_html::{Placeholders, Template};
//!
//! let mut values = Placeholders::default();
//! values.insert("TOTAL_USUARIOS", "12");
//! let outcome = Template::from_string("<p>{{TOTAL_USUARIOS}} users</p>").render(&values);
//! assert_eq!(outcome.html, "<p>12 users</p>");
//! ```

pub mod charts;
pub mod fragments;
pub mod placeholders;
pub mod template;

pub use placeholders::{Placeholders, build_placeholders};
pub use template::{RenderOutcome, Template, write_report};

use chrono::NaiveDate;
use cursorstat_analytics::ReportPayload;

/// Build every placeholder from the payload and fill the template
pub fn render_report(
    payload: &ReportPayload,
    template: &Template,
    generated_on: NaiveDate,
) -> RenderOutcome {
    template.render(&build_placeholders(payload, generated_on))
}
