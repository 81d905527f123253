//! # CI Templates
//!
//! A catalog of reusable CI workflow templates with typed inputs. Callers
//! invoke a template by name with a set of overrides; the resolver merges
//! them with the template's declared defaults, and the planner decides which
//! optional steps run and with what arguments.
//!
//! ## Features
//!
//! - **Typed inputs** - boolean, string, number and choice parameters
//! - **Strict resolution** - unknown names, missing required inputs and type
//!   mismatches are rejected, never silently defaulted
//! - **Step planning** - `if:` conditions and `${{ inputs.NAME }}` arguments
//! - **Catalogs** - built-in templates, template directories and
//!   organization-wide default overrides via catalog.yaml
//!
//! ## Quick Start
//!
//! ```rust
//! use ci_templates::prelude::*;
//!
//! let template = WorkflowTemplate::new("python-ci")
//!     .with_parameter(ParameterSpec::string("package-name").required())
//!     .with_parameter(ParameterSpec::boolean("run-lint").with_default(true));
//!
//! let request = InvocationRequest::new().with("package-name", "foo");
//! let resolved = resolve(&template, &request).unwrap();
//!
//! assert_eq!(resolved.get_str("package-name"), Some("foo"));
//! assert!(resolved.is_enabled("run-lint"));
//! ```

pub mod engine;
pub mod workflow;

// Re-export main types
pub use engine::{
    plan, resolve, CatalogError, ExecutionPlan, PlanError, PlannedStep, ResolveError,
    ResolvedConfiguration, ResolvedValue, TemplateCatalog, TemplateOrigin, ValueSource,
};
pub use workflow::{
    CatalogConfig, ExpressionContext, ExpressionError, InvocationRequest, LoadError,
    ParameterKind, ParameterSpec, ParameterValue, TemplateError, TemplateLoader, TemplateStep,
    WorkflowTemplate,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::engine::{
        plan, resolve, CatalogError, ExecutionPlan, ResolveError, ResolvedConfiguration,
        TemplateCatalog, ValueSource,
    };
    pub use crate::workflow::{
        CatalogConfig, InvocationRequest, LoadError, ParameterKind, ParameterSpec,
        ParameterValue, TemplateLoader, TemplateStep, WorkflowTemplate,
    };
}
