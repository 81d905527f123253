//! Configuration resolver
//!
//! Merges an invocation's caller-supplied values with a template's declared
//! defaults. Resolution is a pure function of its two inputs:
//!
//! 1. Every requested name must be declared, checked in sorted order so the
//!    first unknown name reported is deterministic.
//! 2. Each declared parameter takes the caller's value when present,
//!    otherwise its default. A required parameter with neither fails.
//! 3. Caller values must match the declared type exactly. Strings holding
//!    booleans or JSON lists are passed through untouched.

use std::collections::BTreeMap;

use super::error::ResolveError;
use super::result::{ResolvedConfiguration, ResolvedValue, ValueSource};
use crate::workflow::{InvocationRequest, WorkflowTemplate};

/// Resolve `request` against `template`
pub fn resolve(
    template: &WorkflowTemplate,
    request: &InvocationRequest,
) -> Result<ResolvedConfiguration, ResolveError> {
    for name in request.values.keys() {
        if template.parameter(name).is_none() {
            return Err(ResolveError::UnknownParameter {
                template: template.name.clone(),
                name: name.clone(),
            });
        }
    }

    let mut specs: Vec<_> = template.parameters.iter().collect();
    specs.sort_by(|a, b| a.name.cmp(&b.name));

    let mut values = BTreeMap::new();

    for spec in specs {
        let resolved = match request.get(&spec.name) {
            Some(value) => {
                if !spec.kind.accepts(value) {
                    return Err(ResolveError::TypeMismatch {
                        template: template.name.clone(),
                        name: spec.name.clone(),
                        expected: spec.kind.expected(),
                        found: match value.as_str() {
                            Some(s) => format!("string '{}'", s),
                            None => value.type_name().to_string(),
                        },
                    });
                }
                ResolvedValue {
                    value: value.clone(),
                    source: ValueSource::Caller,
                }
            }
            None => match &spec.default {
                Some(default) => ResolvedValue {
                    value: default.clone(),
                    source: ValueSource::Default,
                },
                None if spec.required => {
                    return Err(ResolveError::MissingRequiredParameter {
                        template: template.name.clone(),
                        name: spec.name.clone(),
                    });
                }
                // Optional without a default: an empty value of the declared type
                None => ResolvedValue {
                    value: spec.kind.zero_value(),
                    source: ValueSource::Default,
                },
            },
        };

        tracing::debug!(
            template = %template.name,
            parameter = %spec.name,
            source = ?resolved.source,
            "Resolved parameter"
        );
        values.insert(spec.name.clone(), resolved);
    }

    Ok(ResolvedConfiguration {
        template: template.name.clone(),
        values,
    })
}
