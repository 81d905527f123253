//! Resolution, planning and catalog error types

use crate::workflow::expressions::ExpressionError;
use crate::workflow::{LoadError, TemplateError};

/// Errors that can occur while resolving an invocation against a template
///
/// All are fatal to the single resolution call; no partial result is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Unknown parameter '{name}' for template '{template}'")]
    UnknownParameter { template: String, name: String },

    #[error("Missing required parameter '{name}' for template '{template}'")]
    MissingRequiredParameter { template: String, name: String },

    #[error("Type mismatch for parameter '{name}' of template '{template}': expected {expected}, got {found}")]
    TypeMismatch {
        template: String,
        name: String,
        expected: String,
        found: String,
    },
}

impl ResolveError {
    /// Name of the offending parameter
    pub fn parameter(&self) -> &str {
        match self {
            ResolveError::UnknownParameter { name, .. }
            | ResolveError::MissingRequiredParameter { name, .. }
            | ResolveError::TypeMismatch { name, .. } => name,
        }
    }
}

/// Errors that can occur while planning a template's steps
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Configuration was resolved for '{found}', not '{expected}'")]
    TemplateMismatch { expected: String, found: String },

    #[error("Step '{step}': {source}")]
    Expression {
        step: String,
        #[source]
        source: ExpressionError,
    },
}

/// Errors from building or querying a template catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template '{0}' is defined more than once")]
    DuplicateTemplate(String),

    #[error("Catalog defaults reference unknown template: {0}")]
    UnknownTemplateOverride(String),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),
}
