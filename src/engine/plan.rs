//! Step planner
//!
//! Decides which of a template's steps run for a resolved configuration, and
//! with what arguments. Each step's `if:` condition is evaluated against the
//! resolved inputs and the template's `env`; enabled steps get their `with:`
//! arguments and `run:` script interpolated.
//!
//! Expressions over contexts that only exist at run time (`matrix`,
//! `secrets`, `github`, ...) are left as written. A condition that depends
//! on one cannot be decided here, so its step is planned as enabled and
//! marked `indeterminate`.

use super::error::PlanError;
use super::result::{ExecutionPlan, PlannedStep, ResolvedConfiguration};
use crate::workflow::expressions::{evaluate, evaluate_condition, evaluate_params};
use crate::workflow::ExpressionError;
use crate::workflow::WorkflowTemplate;

pub fn plan(
    template: &WorkflowTemplate,
    resolved: &ResolvedConfiguration,
) -> Result<ExecutionPlan, PlanError> {
    if resolved.template != template.name {
        return Err(PlanError::TemplateMismatch {
            expected: template.name.clone(),
            found: resolved.template.clone(),
        });
    }

    let ctx = resolved.expression_context(&template.env);
    let mut steps = Vec::with_capacity(template.steps.len());

    for (index, step) in template.steps.iter().enumerate() {
        let name = step.display_name(index);
        let wrap = |source| PlanError::Expression {
            step: name.clone(),
            source,
        };

        let (enabled, indeterminate) = match &step.condition {
            Some(condition) => match evaluate_condition(condition, &ctx) {
                Ok(enabled) => (enabled, false),
                Err(ExpressionError::RuntimeContext(reference)) => {
                    tracing::debug!(step = %name, %reference, "Condition decided at run time");
                    (true, true)
                }
                Err(source) => return Err(wrap(source)),
            },
            None => (true, false),
        };

        let (with, run) = if enabled {
            let with = evaluate_params(&step.with, &ctx).map_err(wrap)?;
            let run = step
                .run
                .as_deref()
                .map(|r| evaluate(r, &ctx))
                .transpose()
                .map_err(wrap)?;
            (with, run)
        } else {
            (Default::default(), step.run.clone())
        };

        tracing::debug!(template = %template.name, step = %name, enabled, "Planned step");

        steps.push(PlannedStep {
            index,
            name,
            uses: step.uses.clone(),
            run,
            enabled,
            indeterminate,
            with,
        });
    }

    Ok(ExecutionPlan {
        template: template.name.clone(),
        steps,
    })
}
