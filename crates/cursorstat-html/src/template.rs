//! Single-pass `{{NAME}}` substitution and report output
//!
//! Tokens are located once in the template source. A recognized token is
//! replaced by its value, an unknown one is left untouched, and inserted
//! values are never scanned again.

use crate::placeholders::Placeholders;
use cursorstat_core::{CursorstatError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Z0-9_]+)\}\}").expect("token pattern is valid"));

/// An HTML template loaded into memory
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    origin: Option<PathBuf>,
}

/// Result of filling a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    pub html: String,
    /// Distinct placeholder names that were substituted
    pub replaced: usize,
    /// Placeholder names with a value but no token in the template
    pub unused: Vec<String>,
    /// Template tokens without a value, left literally in the output
    pub unresolved: Vec<String>,
}

impl Template {
    /// Read a template from disk
    ///
    /// # Errors
    ///
    /// Returns [`CursorstatError::TemplateNotFound`] when the file is
    /// missing and [`CursorstatError::Io`] for any other read failure
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CursorstatError::TemplateNotFound(path.to_path_buf()),
            _ => CursorstatError::Io(e),
        })?;
        debug!("Template loaded: {} characters", source.chars().count());
        Ok(Self {
            source,
            origin: Some(path.to_path_buf()),
        })
    }

    pub fn from_string(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            origin: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Distinct token names present in the template
    pub fn tokens(&self) -> BTreeSet<&str> {
        TOKEN_RE
            .captures_iter(&self.source)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Substitute every known token in one pass over the source
    pub fn render(&self, placeholders: &Placeholders) -> RenderOutcome {
        let values: HashMap<&str, &str> = placeholders.iter().collect();
        let mut replaced = BTreeSet::new();
        let mut unresolved = BTreeSet::new();

        let html = TOKEN_RE
            .replace_all(&self.source, |caps: &Captures| {
                let name = caps.get(1).map_or("", |m| m.as_str());
                match values.get(name) {
                    Some(value) => {
                        replaced.insert(name.to_string());
                        (*value).to_string()
                    }
                    None => {
                        unresolved.insert(name.to_string());
                        caps[0].to_string()
                    }
                }
            })
            .into_owned();

        let unused: Vec<String> = placeholders
            .iter()
            .map(|(name, _)| name)
            .filter(|name| !replaced.contains(*name))
            .map(String::from)
            .collect();

        for name in &unused {
            warn!("Placeholder not found in template: {name}");
        }
        for name in &unresolved {
            warn!("Template token has no value and was left as is: {{{{{name}}}}}");
        }
        debug!(
            "Placeholders replaced: {}/{}",
            replaced.len(),
            placeholders.len()
        );

        RenderOutcome {
            html,
            replaced: replaced.len(),
            unused,
            unresolved: unresolved.into_iter().collect(),
        }
    }
}

/// Write the rendered report, creating parent directories as needed
///
/// # Errors
///
/// Returns [`CursorstatError::OutputWrite`] if the directory or file cannot
/// be written
pub fn write_report(path: impl AsRef<Path>, html: &str) -> Result<()> {
    let path = path.as_ref();
    let output_error = |source| CursorstatError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_error)?;
    }
    fs::write(path, html).map_err(output_error)?;

    info!("Report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn values(pairs: &[(&str, &str)]) -> Placeholders {
        let mut placeholders = Placeholders::default();
        for (name, value) in pairs {
            placeholders.insert(*name, *value);
        }
        placeholders
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let template = Template::from_string("{{A}} and {{A}} then {{B}}");
        let outcome = template.render(&values(&[("A", "1"), ("B", "2")]));
        assert_eq!(outcome.html, "1 and 1 then 2");
        assert_eq!(outcome.replaced, 2);
        assert!(outcome.unused.is_empty());
        assert!(outcome.unresolved.is_empty());
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let template = Template::from_string("<p>{{NAME}}</p><p>{{OTHER}}</p>");
        let outcome = template.render(&values(&[("NAME", "{{OTHER}}"), ("OTHER", "x")]));
        assert_eq!(outcome.html, "<p>{{OTHER}}</p><p>x</p>");
    }

    #[test]
    fn test_unknown_tokens_left_literally() {
        let template = Template::from_string("{{KNOWN}} {{MISSING_1}} {{lower}}");
        let outcome = template.render(&values(&[("KNOWN", "ok"), ("EXTRA", "x")]));
        assert_eq!(outcome.html, "ok {{MISSING_1}} {{lower}}");
        assert_eq!(outcome.unresolved, vec!["MISSING_1".to_string()]);
        assert_eq!(outcome.unused, vec!["EXTRA".to_string()]);
    }

    #[test]
    fn test_tokens() {
        let template = Template::from_string("{{B}} {{A}} {{B}} {{ not }}");
        assert_eq!(template.tokens().into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_missing_template_file() {
        let result = Template::from_file("/no/such/template.html");
        assert!(matches!(result, Err(CursorstatError::TemplateNotFound(_))));
    }

    #[test]
    fn test_from_file_and_write_report() {
        let dir = TempDir::new().unwrap();
        let template_path = dir.path().join("t.html");
        fs::write(&template_path, "<h1>{{TITLE}}</h1>").unwrap();

        let template = Template::from_file(&template_path).unwrap();
        assert_eq!(template.origin(), Some(template_path.as_path()));
        let outcome = template.render(&values(&[("TITLE", "Informe")]));

        let output = dir.path().join("nested/out/report.html");
        write_report(&output, &outcome.html).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "<h1>Informe</h1>");
    }

    #[test]
    fn test_write_report_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let result = write_report(blocker.join("report.html"), "x");
        assert!(matches!(result, Err(CursorstatError::OutputWrite { .. })));
    }
}
