//! Resolution engine module
//!
//! This module contains:
//! - `resolver` - Merges caller values with template defaults
//! - `plan` - Decides which template steps run, and with what arguments
//! - `catalog` - Named registry of templates
//! - `error` - Resolve, plan and catalog error types
//! - `result` - ResolvedConfiguration and ExecutionPlan

pub mod catalog;
pub mod error;
pub mod plan;
pub mod resolver;
pub mod result;

pub use catalog::{TemplateCatalog, TemplateOrigin};
pub use error::{CatalogError, PlanError, ResolveError};
pub use plan::plan;
pub use resolver::resolve;
pub use result::{ExecutionPlan, PlannedStep, ResolvedConfiguration, ResolvedValue, ValueSource};
