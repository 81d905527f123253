//! Template catalog
//!
//! A named registry of workflow templates: the built-in ones, plus any loaded
//! from a directory, with catalog.yaml default overrides applied.

use std::collections::BTreeMap;
use std::path::Path;

use super::error::CatalogError;
use super::plan::plan;
use super::resolver::resolve;
use super::result::{ExecutionPlan, ResolvedConfiguration};
use crate::workflow::{
    builtin_templates, CatalogConfig, InvocationRequest, TemplateLoader, WorkflowTemplate,
};

/// Where a catalog entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateOrigin {
    /// Shipped with the crate
    Builtin,
    /// Loaded from a directory or added by the caller
    Local,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, WorkflowTemplate>,
    origins: BTreeMap<String, TemplateOrigin>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding only the built-in templates
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut catalog = Self::from_templates(builtin_templates()?)?;
        for origin in catalog.origins.values_mut() {
            *origin = TemplateOrigin::Builtin;
        }
        Ok(catalog)
    }

    /// Build a catalog, rejecting duplicate names
    pub fn from_templates(
        templates: impl IntoIterator<Item = WorkflowTemplate>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for template in templates {
            if catalog.templates.contains_key(&template.name) {
                return Err(CatalogError::DuplicateTemplate(template.name));
            }
            catalog.insert(template);
        }
        Ok(catalog)
    }

    /// Load every template in `dir` on top of the built-ins (when enabled by
    /// `config`), then apply the config's default overrides.
    ///
    /// A directory template replaces a built-in of the same name.
    pub fn from_directory(dir: &Path, config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut catalog = if config.include_builtin {
            Self::builtin()?
        } else {
            Self::new()
        };

        let local = Self::from_templates(TemplateLoader::load_directory(dir)?)?;
        for template in local.templates.into_values() {
            if let Some(replaced) = catalog.insert(template) {
                tracing::info!(template = %replaced.name, "Directory template replaces built-in");
            }
        }

        catalog.apply_config(config)?;

        tracing::debug!(dir = %dir.display(), count = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Apply the default overrides of a catalog config
    pub fn apply_config(&mut self, config: &CatalogConfig) -> Result<(), CatalogError> {
        for (name, overrides) in &config.defaults {
            let template = self
                .templates
                .get_mut(name)
                .ok_or_else(|| CatalogError::UnknownTemplateOverride(name.clone()))?;
            template.apply_default_overrides(overrides)?;
        }
        Ok(())
    }

    /// Add or replace a template, returning the one it replaced
    pub fn insert(&mut self, template: WorkflowTemplate) -> Option<WorkflowTemplate> {
        self.origins.insert(template.name.clone(), TemplateOrigin::Local);
        self.templates.insert(template.name.clone(), template)
    }

    pub fn get(&self, name: &str) -> Option<&WorkflowTemplate> {
        self.templates.get(name)
    }

    pub fn origin(&self, name: &str) -> Option<TemplateOrigin> {
        self.origins.get(name).copied()
    }

    /// Template names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkflowTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn require(&self, name: &str) -> Result<&WorkflowTemplate, CatalogError> {
        self.get(name)
            .ok_or_else(|| CatalogError::TemplateNotFound(name.to_string()))
    }

    /// Look up a template and resolve `request` against it
    pub fn resolve(
        &self,
        name: &str,
        request: &InvocationRequest,
    ) -> Result<ResolvedConfiguration, CatalogError> {
        let template = self.require(name)?;
        Ok(resolve(template, request)?)
    }

    /// Resolve, then plan the template's steps
    pub fn plan(
        &self,
        name: &str,
        request: &InvocationRequest,
    ) -> Result<(ResolvedConfiguration, ExecutionPlan), CatalogError> {
        let template = self.require(name)?;
        let resolved = resolve(template, request)?;
        let plan = plan(template, &resolved)?;
        Ok((resolved, plan))
    }
}
