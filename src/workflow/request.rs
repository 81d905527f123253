//! Invocation requests
//!
//! The caller side of a template invocation: a mapping from parameter name to
//! supplied value, as written under `with:` in a calling workflow.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::loader::LoadError;
use super::parameter::ParameterValue;
use super::template::WorkflowTemplate;

/// Caller-supplied overrides for one template invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationRequest {
    pub values: BTreeMap<String, ParameterValue>,
}

impl InvocationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Parse `key=value` pairs; values are read as YAML scalars.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut request = Self::new();
        for pair in pairs {
            let (key, value) = split_pair(pair.as_ref())?;
            request.set(key, ParameterValue::from_cli(value));
        }
        Ok(request)
    }

    /// Parse `key=value` pairs against the parameters `template` declares.
    ///
    /// Each value is read as its parameter's kind (see
    /// [`ParameterKind::parse_text`](super::ParameterKind::parse_text)).
    /// Names the template does not declare fall back to YAML scalars and are
    /// left for the resolver to reject.
    pub fn from_pairs_for<I, S>(template: &WorkflowTemplate, pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut request = Self::new();
        for pair in pairs {
            let (key, value) = split_pair(pair.as_ref())?;
            let value = match template.parameter(key) {
                Some(spec) => spec.kind.parse_text(value),
                None => ParameterValue::from_cli(value),
            };
            request.set(key, value);
        }
        Ok(request)
    }

    /// Load a request from a YAML (or JSON) mapping file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml {
            file: path.display().to_string(),
            error: e,
        })
    }

    /// Overlay `other` on top of this request; `other` wins on conflicts
    pub fn merge(mut self, other: InvocationRequest) -> Self {
        self.values.extend(other.values);
        self
    }
}

fn split_pair(pair: &str) -> Result<(&str, &str), String> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("Expected key=value, got '{}'", pair))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Empty parameter name in '{}'", pair));
    }
    Ok((key, value))
}
