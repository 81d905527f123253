//! Workflow template definitions
//!
//! A template is a named, reusable CI pipeline with declared inputs. Two
//! document layouts are accepted:
//!
//! ```yaml
//! # Catalog form
//! name: python-ci
//! inputs:
//!   package-name:
//!     type: string
//!     required: true
//!   run-lint:
//!     type: boolean
//!     default: true
//! steps:
//!   - name: Lint
//!     if: ${{ inputs.run-lint }}
//!     run: ruff check .
//! ```
//!
//! ```yaml
//! # Reusable-workflow form
//! name: python-ci
//! on:
//!   workflow_call:
//!     inputs:
//!       package-name:
//!         type: string
//!         required: true
//! jobs:
//!   lint:
//!     runs-on: ubuntu-latest
//!     steps:
//!       - run: ruff check .
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;

use super::parameter::{InputDefinition, ParameterKind, ParameterSpec, ParameterValue};
use super::step::TemplateStep;

/// Errors in a template definition
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Template has no name")]
    MissingName,

    #[error("Template '{template}' declares a parameter with an empty name")]
    EmptyParameterName { template: String },

    #[error("Template '{template}' declares parameter '{name}' more than once")]
    DuplicateParameter { template: String, name: String },

    #[error("Template '{template}' parameter '{name}': {reason}")]
    InvalidParameter {
        template: String,
        name: String,
        reason: String,
    },

    #[error("Template '{template}' parameter '{name}' has a {found} default, expected {expected}")]
    InvalidDefault {
        template: String,
        name: String,
        expected: String,
        found: String,
    },

    #[error("Template '{template}' choice parameter '{name}' declares no options")]
    EmptyChoice { template: String, name: String },

    #[error("Template '{template}' step '{step}' references undeclared input '{name}'")]
    UndeclaredInput {
        template: String,
        step: String,
        name: String,
    },

    #[error("Template '{template}' has no parameter '{name}' to override")]
    UnknownOverride { template: String, name: String },
}

/// A named, reusable workflow definition with declared parameters
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowTemplate {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<ParameterSpec>,
    pub env: BTreeMap<String, String>,
    pub steps: Vec<TemplateStep>,
}

#[derive(Debug, Deserialize)]
struct TemplateDocument {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    inputs: InputMap,

    #[serde(default)]
    env: BTreeMap<String, ParameterValue>,

    #[serde(default)]
    steps: Vec<TemplateStep>,

    /// Triggers; only `workflow_call.inputs` is read
    #[serde(default, rename = "on")]
    on: serde_yaml::Value,

    #[serde(default)]
    jobs: BTreeMap<String, JobDocument>,
}

#[derive(Debug, Deserialize)]
struct JobDocument {
    #[serde(default)]
    steps: Vec<TemplateStep>,
}

/// Input definitions keyed by name; `name:` with an empty body is allowed
type InputMap = BTreeMap<String, Option<InputDefinition>>;

impl WorkflowTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: Vec::new(),
            env: BTreeMap::new(),
            steps: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameter(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    pub fn with_step(mut self, step: TemplateStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Look up a declared parameter
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Declared parameter names, sorted
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Declared defaults of every parameter that has one
    pub fn defaults(&self) -> BTreeMap<String, ParameterValue> {
        self.parameters
            .iter()
            .filter_map(|p| p.default.clone().map(|d| (p.name.clone(), d)))
            .collect()
    }

    /// Parse a template document, falling back to `fallback_name` when the
    /// document has no `name`.
    pub fn from_yaml_str(content: &str, fallback_name: Option<&str>) -> Result<Self, TemplateError> {
        let doc: TemplateDocument = serde_yaml::from_str(content)?;

        let name = doc
            .name
            .or_else(|| fallback_name.map(str::to_string))
            .filter(|n| !n.trim().is_empty())
            .ok_or(TemplateError::MissingName)?;

        let mut inputs: Vec<(String, Option<InputDefinition>)> = doc.inputs.into_iter().collect();

        if let Some(call_inputs) = doc.on.get("workflow_call").and_then(|wc| wc.get("inputs")) {
            if !call_inputs.is_null() {
                let call_inputs: InputMap = serde_yaml::from_value(call_inputs.clone())?;
                inputs.extend(call_inputs);
            }
        }

        let mut parameters = Vec::with_capacity(inputs.len());
        for (input_name, definition) in inputs {
            let spec = definition
                .unwrap_or_default()
                .into_spec(&input_name)
                .map_err(|reason| TemplateError::InvalidParameter {
                    template: name.clone(),
                    name: input_name.clone(),
                    reason,
                })?;
            parameters.push(spec);
        }

        let mut steps = doc.steps;
        for job in doc.jobs.into_values() {
            steps.extend(job.steps);
        }

        let template = Self {
            name,
            description: doc.description,
            parameters,
            env: doc
                .env
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect(),
            steps,
        };

        template.validate()?;
        Ok(template)
    }

    /// Check the template's own invariants
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.name.trim().is_empty() {
            return Err(TemplateError::MissingName);
        }

        let mut seen = HashSet::new();
        for spec in &self.parameters {
            if spec.name.trim().is_empty() {
                return Err(TemplateError::EmptyParameterName {
                    template: self.name.clone(),
                });
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(TemplateError::DuplicateParameter {
                    template: self.name.clone(),
                    name: spec.name.clone(),
                });
            }
            if let ParameterKind::Choice(options) = &spec.kind {
                if options.is_empty() {
                    return Err(TemplateError::EmptyChoice {
                        template: self.name.clone(),
                        name: spec.name.clone(),
                    });
                }
            }
            if let Some(default) = &spec.default {
                self.check_default(spec, default)?;
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            for name in step.referenced_inputs() {
                if !seen.contains(name.as_str()) {
                    return Err(TemplateError::UndeclaredInput {
                        template: self.name.clone(),
                        step: step.display_name(index),
                        name,
                    });
                }
            }
        }

        Ok(())
    }

    fn check_default(&self, spec: &ParameterSpec, value: &ParameterValue) -> Result<(), TemplateError> {
        if spec.kind.accepts(value) {
            return Ok(());
        }
        Err(TemplateError::InvalidDefault {
            template: self.name.clone(),
            name: spec.name.clone(),
            expected: spec.kind.expected(),
            found: match &spec.kind {
                ParameterKind::Choice(_) if value.as_str().is_some() => format!("'{}'", value),
                _ => value.type_name().to_string(),
            },
        })
    }

    /// Replace declared defaults, e.g. with organization-wide settings.
    ///
    /// Every override must name a declared parameter and conform to its type.
    pub fn apply_default_overrides(
        &mut self,
        overrides: &HashMap<String, ParameterValue>,
    ) -> Result<(), TemplateError> {
        for (name, value) in overrides {
            let spec = self
                .parameters
                .iter()
                .find(|p| &p.name == name)
                .ok_or_else(|| TemplateError::UnknownOverride {
                    template: self.name.clone(),
                    name: name.clone(),
                })?;
            self.check_default(spec, value)?;
        }

        for spec in &mut self.parameters {
            if let Some(value) = overrides.get(&spec.name) {
                tracing::debug!(
                    template = %self.name,
                    parameter = %spec.name,
                    value = %value,
                    "Overriding declared default"
                );
                spec.default = Some(value.clone());
            }
        }

        Ok(())
    }
}
