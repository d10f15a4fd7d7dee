//! Prompt template parsing and rendering
//!
//! Supports variable syntax: `${var:variable-name:default-value}`
//! - `${var:name}` - Required variable, error if not provided
//! - `${var:name:default}` - Optional variable with default value
//!
//! Literal braces elsewhere in a template (JSON examples) are left alone.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Regex to match variable patterns: ${var:name} or ${var:name:default}
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:([a-zA-Z0-9][-_a-zA-Z0-9]*)(?::([^}]*))?\}")
        .expect("variable pattern is a valid regex")
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    content: String,
    /// Names of variables without a default, in order of first use
    required: Vec<String>,
}

impl PromptTemplate {
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let mut seen = HashSet::new();
        let mut required = Vec::new();

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let name = &cap[1];

            if cap.get(2).is_none() && seen.insert(name.to_string()) {
                required.push(name.to_string());
            }
        }

        Self { content, required }
    }

    pub fn required_variables(&self) -> &[String] {
        &self.required
    }

    /// Render in a single pass, so substituted values are never re-scanned
    /// for placeholders.
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String, TemplateError> {
        if let Some(missing) = self.required.iter().find(|n| !values.contains_key(n.as_str())) {
            return Err(TemplateError::MissingVariable {
                name: missing.clone(),
            });
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |cap: &Captures| {
            values
                .get(&cap[1])
                .cloned()
                .or_else(|| cap.get(2).map(|d| d.as_str().to_string()))
                .unwrap_or_default()
        });

        Ok(rendered.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_render_required_variable() {
        let template = PromptTemplate::parse("Audit ${var:main_protein} now");
        let result = template.render(&values(&[("main_protein", "ATXN3")])).unwrap();
        assert_eq!(result, "Audit ATXN3 now");
    }

    #[test]
    fn test_missing_required_variable() {
        let template = PromptTemplate::parse("Chain: ${var:main} -> ${var:target}");

        match template.render(&values(&[("main", "A")])) {
            Err(TemplateError::MissingVariable { name }) => assert_eq!(name, "target"),
            other => panic!("Expected MissingVariable error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_value_and_override() {
        let template = PromptTemplate::parse("Batch size: ${var:size:1}");

        assert_eq!(template.render(&HashMap::new()).unwrap(), "Batch size: 1");
        assert_eq!(
            template.render(&values(&[("size", "2")])).unwrap(),
            "Batch size: 2"
        );
    }

    #[test]
    fn test_json_braces_are_untouched() {
        let template = PromptTemplate::parse(r#"Return {"function": "${var:name}"}"#);
        let result = template.render(&values(&[("name", "X")])).unwrap();
        assert_eq!(result, r#"Return {"function": "X"}"#);
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let template = PromptTemplate::parse("${var:a} and ${var:b}");
        let result = template
            .render(&values(&[("a", "${var:b}"), ("b", "B")]))
            .unwrap();
        assert_eq!(result, "${var:b} and B");
    }

    #[test]
    fn test_repeated_variable_listed_once() {
        let template = PromptTemplate::parse("${var:x} ${var:x} ${var:y:d}");
        assert_eq!(template.required_variables(), &["x".to_string()]);
    }
}
