//! Resolution and plan result types

use std::collections::BTreeMap;

use serde::Serialize;

use crate::workflow::{ExpressionContext, ParameterValue};

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Caller,
    Default,
}

/// A resolved parameter value and its origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedValue {
    pub value: ParameterValue,
    pub source: ValueSource,
}

/// The effective parameters of one template invocation
///
/// Covers every parameter the template declares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfiguration {
    pub template: String,
    pub values: BTreeMap<String, ResolvedValue>,
}

impl ResolvedConfiguration {
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name).map(|v| &v.value)
    }

    pub fn source(&self, name: &str) -> Option<ValueSource> {
        self.values.get(name).map(|v| v.source)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParameterValue::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParameterValue::as_str)
    }

    /// True when a boolean parameter resolved to `true`
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get_bool(name).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), &v.value))
    }

    /// Plain name-to-value mapping, dropping sources
    pub fn to_map(&self) -> BTreeMap<String, ParameterValue> {
        self.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.to_map()).unwrap_or(serde_json::Value::Null)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.to_map())
    }

    /// `name=value` lines, the format CI platforms read step outputs from
    ///
    /// Values spanning several lines use the `name<<DELIMITER` block form,
    /// with a delimiter that does not occur in the value.
    pub fn to_output_lines(&self) -> String {
        let mut output = String::new();

        for (name, value) in self.iter() {
            let text = value.to_string();
            if text.contains('\n') || text.contains('\r') {
                let delimiter = output_delimiter(&text);
                output.push_str(&format!("{}<<{}\n{}\n{}\n", name, delimiter, text, delimiter));
            } else {
                output.push_str(&format!("{}={}\n", name, text));
            }
        }

        output
    }

    /// Build the context `${{ }}` expressions are evaluated in
    pub fn expression_context(&self, env: &BTreeMap<String, String>) -> ExpressionContext {
        let mut ctx = ExpressionContext::new();
        for (name, value) in self.iter() {
            ctx.set_input(name, value.clone());
        }
        for (key, value) in env {
            ctx.set_env(key, value.clone());
        }
        ctx
    }
}

fn output_delimiter(value: &str) -> String {
    let mut delimiter = "EOF".to_string();
    let mut suffix = 0;
    while value.contains(&delimiter) {
        suffix += 1;
        delimiter = format!("EOF_{}", suffix);
    }
    delimiter
}

/// One step after planning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStep {
    pub index: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    pub enabled: bool,
    /// The condition depends on a runtime context and was not decided
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub indeterminate: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub with: BTreeMap<String, String>,
}

/// The steps of a template and whether each one runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionPlan {
    pub template: String,
    pub steps: Vec<PlannedStep>,
}

impl ExecutionPlan {
    pub fn enabled_steps(&self) -> impl Iterator<Item = &PlannedStep> {
        self.steps.iter().filter(|s| s.enabled)
    }

    pub fn skipped_steps(&self) -> impl Iterator<Item = &PlannedStep> {
        self.steps.iter().filter(|s| !s.enabled)
    }

    /// Look up a step by its display name
    pub fn step(&self, name: &str) -> Option<&PlannedStep> {
        self.steps.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResolvedConfiguration {
        let mut values = BTreeMap::new();
        values.insert(
            "package-name".to_string(),
            ResolvedValue {
                value: "foo".into(),
                source: ValueSource::Caller,
            },
        );
        values.insert(
            "run-lint".to_string(),
            ResolvedValue {
                value: true.into(),
                source: ValueSource::Default,
            },
        );
        ResolvedConfiguration {
            template: "python-ci".to_string(),
            values,
        }
    }

    #[test]
    fn test_accessors() {
        let config = sample();
        assert_eq!(config.get_str("package-name"), Some("foo"));
        assert_eq!(config.get_bool("run-lint"), Some(true));
        assert!(config.is_enabled("run-lint"));
        assert!(!config.is_enabled("package-name"));
        assert_eq!(config.source("run-lint"), Some(ValueSource::Default));
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json();
        assert_eq!(json["package-name"], "foo");
        assert_eq!(json["run-lint"], true);
    }

    #[test]
    fn test_to_output_lines() {
        assert_eq!(sample().to_output_lines(), "package-name=foo\nrun-lint=true\n");
    }

    #[test]
    fn test_to_output_lines_multiline_value() {
        let mut config = sample();
        config.values.insert(
            "pytest-args".to_string(),
            ResolvedValue {
                value: "-q\nrun-lint=false".into(),
                source: ValueSource::Caller,
            },
        );

        // The caller's second line stays inside the block
        assert_eq!(
            config.to_output_lines(),
            "package-name=foo\npytest-args<<EOF\n-q\nrun-lint=false\nEOF\nrun-lint=true\n"
        );
    }

    #[test]
    fn test_output_delimiter_avoids_value() {
        assert_eq!(output_delimiter("a\nb"), "EOF");
        assert_eq!(output_delimiter("a\nEOF\nb"), "EOF_1");
        assert_eq!(output_delimiter("EOF\nEOF_1"), "EOF_2");
    }

    #[test]
    fn test_expression_context() {
        let mut env = BTreeMap::new();
        env.insert("CI".to_string(), "true".to_string());
        let ctx = sample().expression_context(&env);
        assert_eq!(ctx.get_input("package-name"), Some(&ParameterValue::from("foo")));
        assert_eq!(ctx.get_env("CI"), Some(&"true".to_string()));
    }
}
