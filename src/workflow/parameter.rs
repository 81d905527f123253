//! Parameter types
//!
//! A template declares its configurable inputs as `ParameterSpec`s. Callers
//! and defaults both supply `ParameterValue`s, which are checked against the
//! declared `ParameterKind` during resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A concrete value for a parameter
///
/// Deserialized untagged, so YAML `true` is a boolean while `"true"` stays a
/// string. No coercion is ever performed between variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl ParameterValue {
    /// Name of the value's type as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "boolean",
            ParameterValue::Number(_) => "number",
            ParameterValue::String(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Parse a command-line value as a YAML scalar.
    ///
    /// `true` becomes a boolean, `3` a number, `'true'` a string. Anything
    /// that is not a scalar (e.g. `["3.11", "3.12"]`) is kept verbatim as a
    /// string, since list-valued inputs are opaque strings.
    pub fn from_cli(raw: &str) -> Self {
        match serde_yaml::from_str::<serde_yaml::Value>(raw) {
            Ok(serde_yaml::Value::Bool(b)) => ParameterValue::Bool(b),
            Ok(serde_yaml::Value::Number(n)) => match n.as_f64() {
                Some(f) => ParameterValue::Number(f),
                None => ParameterValue::String(raw.to_string()),
            },
            Ok(serde_yaml::Value::String(s)) => ParameterValue::String(s),
            _ => ParameterValue::String(raw.to_string()),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(b) => write!(f, "{}", b),
            ParameterValue::Number(n) => write!(f, "{}", n),
            ParameterValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Number(value)
    }
}

/// Declared type of a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    Boolean,
    String,
    Number,
    /// Enumerated string restricted to the listed options
    Choice(Vec<String>),
}

impl ParameterKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterKind::Boolean => "boolean",
            ParameterKind::String => "string",
            ParameterKind::Number => "number",
            ParameterKind::Choice(_) => "choice",
        }
    }

    /// Check whether a value conforms to this kind
    pub fn accepts(&self, value: &ParameterValue) -> bool {
        match (self, value) {
            (ParameterKind::Boolean, ParameterValue::Bool(_)) => true,
            (ParameterKind::String, ParameterValue::String(_)) => true,
            (ParameterKind::Number, ParameterValue::Number(_)) => true,
            (ParameterKind::Choice(options), ParameterValue::String(s)) => {
                options.iter().any(|o| o == s)
            }
            _ => false,
        }
    }

    /// Read command-line text as a value of this kind
    ///
    /// String and choice parameters keep the text exactly as typed, so
    /// `3.10` stays `"3.10"`. Boolean and number parameters parse it; text
    /// that does not parse is kept as a string for the resolver to reject.
    pub fn parse_text(&self, raw: &str) -> ParameterValue {
        match self {
            ParameterKind::Boolean => match raw.trim() {
                "true" => ParameterValue::Bool(true),
                "false" => ParameterValue::Bool(false),
                _ => ParameterValue::String(raw.to_string()),
            },
            ParameterKind::Number => match raw.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => ParameterValue::Number(n),
                _ => ParameterValue::String(raw.to_string()),
            },
            ParameterKind::String | ParameterKind::Choice(_) => {
                ParameterValue::String(raw.to_string())
            }
        }
    }

    /// Value of an optional parameter that was neither supplied nor defaulted
    pub fn zero_value(&self) -> ParameterValue {
        match self {
            ParameterKind::Boolean => ParameterValue::Bool(false),
            ParameterKind::String => ParameterValue::String(String::new()),
            ParameterKind::Number => ParameterValue::Number(0.0),
            ParameterKind::Choice(options) => {
                ParameterValue::String(options.first().cloned().unwrap_or_default())
            }
        }
    }

    /// Human-readable description of what this kind accepts
    pub fn expected(&self) -> String {
        match self {
            ParameterKind::Choice(options) => format!("one of [{}]", options.join(", ")),
            other => other.name().to_string(),
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expected())
    }
}

/// One configurable input of a workflow template
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    pub default: Option<ParameterValue>,
    pub required: bool,
    pub description: Option<String>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            required: false,
            description: None,
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Boolean)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Number)
    }

    pub fn choice<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ParameterKind::Choice(options.into_iter().map(Into::into).collect()),
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<ParameterValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Raw input definition as written in a template document
///
/// Mirrors the reusable-workflow `inputs:` schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputDefinition {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub default: Option<ParameterValue>,

    /// Allowed values for `type: choice`
    #[serde(default)]
    pub options: Vec<String>,
}

impl InputDefinition {
    /// Convert into a `ParameterSpec`, failing on an unknown type name
    pub fn into_spec(self, name: &str) -> Result<ParameterSpec, String> {
        let kind = match self.kind.as_deref().unwrap_or("string") {
            "boolean" => ParameterKind::Boolean,
            "string" => ParameterKind::String,
            "number" => ParameterKind::Number,
            "choice" => ParameterKind::Choice(self.options),
            other => return Err(format!("unknown parameter type '{}'", other)),
        };

        Ok(ParameterSpec {
            name: name.to_string(),
            kind,
            default: self.default,
            required: self.required,
            description: self.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_deserialize_untagged() {
        let v: ParameterValue = serde_yaml::from_str("true").unwrap();
        assert_eq!(v, ParameterValue::Bool(true));

        let v: ParameterValue = serde_yaml::from_str("\"true\"").unwrap();
        assert_eq!(v, ParameterValue::String("true".to_string()));

        let v: ParameterValue = serde_yaml::from_str("3").unwrap();
        assert_eq!(v, ParameterValue::Number(3.0));

        let v: ParameterValue = serde_yaml::from_str("'[\"3.11\", \"3.12\"]'").unwrap();
        assert_eq!(v.as_str(), Some("[\"3.11\", \"3.12\"]"));
    }

    #[test]
    fn test_value_from_cli() {
        assert_eq!(ParameterValue::from_cli("false"), ParameterValue::Bool(false));
        assert_eq!(ParameterValue::from_cli("12"), ParameterValue::Number(12.0));
        assert_eq!(ParameterValue::from_cli("foo"), ParameterValue::from("foo"));
        assert_eq!(ParameterValue::from_cli("'true'"), ParameterValue::from("true"));
        assert_eq!(
            ParameterValue::from_cli("[\"3.11\", \"3.12\"]"),
            ParameterValue::from("[\"3.11\", \"3.12\"]")
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(ParameterValue::Bool(true).to_string(), "true");
        assert_eq!(ParameterValue::Number(3.0).to_string(), "3");
        assert_eq!(ParameterValue::Number(0.5).to_string(), "0.5");
        assert_eq!(ParameterValue::from("x").to_string(), "x");
    }

    #[test]
    fn test_kind_accepts() {
        assert!(ParameterKind::Boolean.accepts(&true.into()));
        assert!(!ParameterKind::Boolean.accepts(&"true".into()));
        assert!(ParameterKind::String.accepts(&"true".into()));
        assert!(!ParameterKind::String.accepts(&ParameterValue::Number(1.0)));
        assert!(ParameterKind::Number.accepts(&ParameterValue::Number(1.0)));

        let choice = ParameterKind::Choice(vec!["pypi".into(), "testpypi".into()]);
        assert!(choice.accepts(&"pypi".into()));
        assert!(!choice.accepts(&"npm".into()));
        assert!(!choice.accepts(&true.into()));
    }

    #[test]
    fn test_kind_parse_text() {
        assert_eq!(ParameterKind::String.parse_text("3.10"), ParameterValue::from("3.10"));
        assert_eq!(ParameterKind::String.parse_text("'x'"), ParameterValue::from("'x'"));
        assert_eq!(ParameterKind::Boolean.parse_text("false"), ParameterValue::Bool(false));
        assert_eq!(ParameterKind::Boolean.parse_text("no"), ParameterValue::from("no"));
        assert_eq!(ParameterKind::Number.parse_text("80"), ParameterValue::Number(80.0));
        assert_eq!(ParameterKind::Number.parse_text("eighty"), ParameterValue::from("eighty"));

        let choice = ParameterKind::Choice(vec!["3.10".into(), "3.12".into()]);
        assert!(choice.accepts(&choice.parse_text("3.10")));
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(ParameterKind::Boolean.zero_value(), ParameterValue::Bool(false));
        assert_eq!(ParameterKind::Number.zero_value(), ParameterValue::Number(0.0));
        assert_eq!(ParameterKind::String.zero_value(), ParameterValue::from(""));

        let choice = ParameterKind::Choice(vec!["mkdocs".into(), "sphinx".into()]);
        assert_eq!(choice.zero_value(), ParameterValue::from("mkdocs"));
        assert!(choice.accepts(&choice.zero_value()));
    }

    #[test]
    fn test_input_definition_into_spec() {
        let yaml = r#"
type: choice
description: Target index
default: pypi
options: [pypi, testpypi]
"#;
        let def: InputDefinition = serde_yaml::from_str(yaml).unwrap();
        let spec = def.into_spec("repository").unwrap();
        assert_eq!(spec.name, "repository");
        assert_eq!(
            spec.kind,
            ParameterKind::Choice(vec!["pypi".into(), "testpypi".into()])
        );
        assert_eq!(spec.default, Some("pypi".into()));
        assert!(!spec.required);
    }

    #[test]
    fn test_input_definition_defaults_to_string() {
        let def: InputDefinition = serde_yaml::from_str("required: true").unwrap();
        let spec = def.into_spec("package-name").unwrap();
        assert_eq!(spec.kind, ParameterKind::String);
        assert!(spec.required);
        assert!(spec.default.is_none());
    }

    #[test]
    fn test_input_definition_unknown_type() {
        let def: InputDefinition = serde_yaml::from_str("type: list").unwrap();
        assert!(def.into_spec("x").is_err());
    }
}
