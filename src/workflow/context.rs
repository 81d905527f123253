//! Expression context
//!
//! Values visible to `${{ }}` expressions while planning a template's steps.

use std::collections::HashMap;

use super::parameter::ParameterValue;

/// Context for expression evaluation
#[derive(Debug, Clone, Default)]
pub struct ExpressionContext {
    /// Resolved template inputs (`inputs.NAME`)
    pub inputs: HashMap<String, ParameterValue>,

    /// Template-level environment variables (`env.NAME`)
    pub env: HashMap<String, String>,
}

impl ExpressionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an input value
    pub fn set_input(&mut self, key: &str, value: ParameterValue) {
        self.inputs.insert(key.to_string(), value);
    }

    /// Get an input value
    pub fn get_input(&self, key: &str) -> Option<&ParameterValue> {
        self.inputs.get(key)
    }

    /// Set an environment variable
    pub fn set_env(&mut self, key: &str, value: String) {
        self.env.insert(key.to_string(), value);
    }

    /// Get an environment variable
    pub fn get_env(&self, key: &str) -> Option<&String> {
        self.env.get(key)
    }
}
