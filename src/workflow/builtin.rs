//! Built-in templates
//!
//! The curated templates shipped with the crate, embedded at compile time.

use super::template::{TemplateError, WorkflowTemplate};

/// (name, document) pairs for every built-in template
pub const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    ("python-ci", include_str!("../../templates/python-ci.yml")),
    (
        "publish-package",
        include_str!("../../templates/publish-package.yml"),
    ),
    ("docs-site", include_str!("../../templates/docs-site.yml")),
];

/// Parse every built-in template
pub fn builtin_templates() -> Result<Vec<WorkflowTemplate>, TemplateError> {
    BUILTIN_TEMPLATES
        .iter()
        .map(|(name, content)| WorkflowTemplate::from_yaml_str(content, Some(*name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::ParameterKind;

    #[test]
    fn test_builtin_templates_parse() {
        let templates = builtin_templates().unwrap();
        assert_eq!(templates.len(), BUILTIN_TEMPLATES.len());

        for (template, (name, _)) in templates.iter().zip(BUILTIN_TEMPLATES.iter()) {
            assert_eq!(&template.name, name);
            assert!(template.description.is_some());
            assert!(!template.steps.is_empty());
        }
    }

    #[test]
    fn test_python_ci_inputs() {
        let templates = builtin_templates().unwrap();
        let python = templates.iter().find(|t| t.name == "python-ci").unwrap();

        let package = python.parameter("package-name").unwrap();
        assert!(package.required);
        assert!(package.default.is_none());

        let versions = python.parameter("python-versions").unwrap();
        assert_eq!(versions.kind, ParameterKind::String);

        assert_eq!(
            python.parameter("coverage-threshold").unwrap().kind,
            ParameterKind::Number
        );
    }

    #[test]
    fn test_publish_repository_is_choice() {
        let templates = builtin_templates().unwrap();
        let publish = templates
            .iter()
            .find(|t| t.name == "publish-package")
            .unwrap();
        assert_eq!(
            publish.parameter("repository").unwrap().kind,
            ParameterKind::Choice(vec!["pypi".to_string(), "testpypi".to_string()])
        );
    }
}
