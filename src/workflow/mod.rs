//! Workflow template types and definitions
//!
//! This module contains all types for defining and loading templates:
//! - `parameter` - ParameterSpec, ParameterKind and ParameterValue
//! - `template` - WorkflowTemplate and its validation
//! - `step` - TemplateStep
//! - `request` - InvocationRequest for caller-supplied overrides
//! - `context` - ExpressionContext for step planning
//! - `expressions` - Expression evaluation for `${{ }}` syntax
//! - `loader` - Load templates from files and directories
//! - `catalog_config` - catalog.yaml configuration
//! - `builtin` - Templates embedded in the crate

pub mod builtin;
pub mod catalog_config;
pub mod context;
pub mod expressions;
pub mod loader;
pub mod parameter;
pub mod request;
pub mod step;
pub mod template;

// Re-export all public types for convenience
pub use builtin::{builtin_templates, BUILTIN_TEMPLATES};
pub use catalog_config::CatalogConfig;
pub use context::ExpressionContext;
pub use expressions::{evaluate, evaluate_condition, ExpressionError};
pub use loader::{LoadError, TemplateLoader};
pub use parameter::{InputDefinition, ParameterKind, ParameterSpec, ParameterValue};
pub use request::InvocationRequest;
pub use step::TemplateStep;
pub use template::{TemplateError, WorkflowTemplate};
