//! Template step definitions

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use super::expressions::{condition_input_references, input_references};
use super::parameter::ParameterValue;

/// One step of a workflow template
///
/// Only the fields that matter for planning are kept; anything else a CI
/// platform accepts on a step (`shell`, `timeout-minutes`, ...) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,

    /// Condition deciding whether the step runs
    #[serde(
        default,
        rename = "if",
        deserialize_with = "deserialize_condition",
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub with: BTreeMap<String, serde_yaml::Value>,
}

/// `if:` may be written as a bare boolean or number
fn deserialize_condition<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ParameterValue>::deserialize(deserializer)?;
    Ok(value.map(|v| v.to_string()))
}

impl TemplateStep {
    /// Name used when reporting on this step
    pub fn display_name(&self, index: usize) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if let Some(id) = &self.id {
            return id.clone();
        }
        if let Some(uses) = &self.uses {
            return uses.clone();
        }
        if let Some(line) = self.run.as_deref().and_then(|r| r.lines().next()) {
            return line.trim().to_string();
        }
        format!("step {}", index + 1)
    }

    /// Every input this step references from its condition, `with` or `run`
    pub fn referenced_inputs(&self) -> BTreeSet<String> {
        let mut refs = BTreeSet::new();

        if let Some(condition) = &self.condition {
            refs.extend(condition_input_references(condition));
        }
        if let Some(run) = &self.run {
            refs.extend(input_references(run));
        }
        for value in self.with.values() {
            collect_value_references(value, &mut refs);
        }

        refs
    }
}

fn collect_value_references(value: &serde_yaml::Value, refs: &mut BTreeSet<String>) {
    match value {
        serde_yaml::Value::String(s) => refs.extend(input_references(s)),
        serde_yaml::Value::Sequence(seq) => {
            for v in seq {
                collect_value_references(v, refs);
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for v in map.values() {
                collect_value_references(v, refs);
            }
        }
        serde_yaml::Value::Tagged(tagged) => collect_value_references(&tagged.value, refs),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_step() {
        let yaml = r#"
name: Lint
if: ${{ inputs.run-lint }}
uses: astral-sh/ruff-action@v3
with:
  args: check ${{ inputs.source-dir }}
"#;
        let step: TemplateStep = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(step.name.as_deref(), Some("Lint"));
        assert_eq!(step.condition.as_deref(), Some("${{ inputs.run-lint }}"));
        assert_eq!(step.uses.as_deref(), Some("astral-sh/ruff-action@v3"));
        assert_eq!(step.with.len(), 1);
    }

    #[test]
    fn test_parse_boolean_condition() {
        let step: TemplateStep = serde_yaml::from_str("if: false\nrun: echo hi").unwrap();
        assert_eq!(step.condition.as_deref(), Some("false"));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let step = TemplateStep {
            run: Some("pytest -q\npytest --cov".to_string()),
            ..Default::default()
        };
        assert_eq!(step.display_name(0), "pytest -q");

        let step = TemplateStep {
            uses: Some("actions/checkout@v4".to_string()),
            ..Default::default()
        };
        assert_eq!(step.display_name(0), "actions/checkout@v4");

        assert_eq!(TemplateStep::default().display_name(2), "step 3");
    }

    #[test]
    fn test_referenced_inputs() {
        let yaml = r#"
if: inputs.run-tests && inputs.coverage
run: pytest ${{ inputs.pytest-args }}
with:
  matrix:
    - ${{ inputs.python-versions }}
"#;
        let step: TemplateStep = serde_yaml::from_str(yaml).unwrap();
        let refs: Vec<_> = step.referenced_inputs().into_iter().collect();
        assert_eq!(refs, vec!["coverage", "pytest-args", "python-versions", "run-tests"]);
    }

    #[test]
    fn test_referenced_inputs_ignore_event_payload() {
        let yaml = r#"
if: github.event.inputs.deploy == 'true' && inputs.strict != 'inputs.loose'
run: echo ${{ github.event.inputs.version }}
"#;
        let step: TemplateStep = serde_yaml::from_str(yaml).unwrap();
        let refs: Vec<_> = step.referenced_inputs().into_iter().collect();
        assert_eq!(refs, vec!["strict"]);
    }
}
