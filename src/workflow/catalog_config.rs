//! Catalog configuration
//!
//! Configuration for a template catalog, loaded from catalog.yaml next to the
//! templates. Organization-wide defaults replace the defaults a template
//! declares, without touching the template files themselves:
//!
//! ```yaml
//! include_builtin: true
//!
//! defaults:
//!   python-ci:
//!     python-versions: '["3.12", "3.13"]'
//!     run-type-check: false
//!   publish-package:
//!     repository: testpypi
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::parameter::ParameterValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Include the built-in templates alongside the directory's own
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,

    /// Default overrides per template name, then per parameter name
    #[serde(default)]
    pub defaults: HashMap<String, HashMap<String, ParameterValue>>,
}

fn default_include_builtin() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            include_builtin: default_include_builtin(),
            defaults: HashMap::new(),
        }
    }
}

impl CatalogConfig {
    /// Check if this config overrides any template defaults
    pub fn has_overrides(&self) -> bool {
        self.defaults.values().any(|m| !m.is_empty())
    }

    /// Overrides for one template, if any
    pub fn overrides_for(&self, template: &str) -> Option<&HashMap<String, ParameterValue>> {
        self.defaults.get(template)
    }
}

impl CatalogConfig {
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, crate::workflow::LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: CatalogConfig =
            serde_yaml::from_str(&content).map_err(|e| crate::workflow::LoadError::Yaml {
                file: path.display().to_string(),
                error: e,
            })?;
        Ok(config)
    }

    /// Load `catalog.yaml` / `catalog.yml` from a directory, or the default
    /// config when neither exists.
    pub fn load_from_dir(
        dir: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::workflow::LoadError> {
        for filename in crate::workflow::loader::CATALOG_CONFIG_FILES {
            let path = dir.as_ref().join(filename);
            if path.is_file() {
                return Self::load(path);
            }
        }
        Ok(Self::default())
    }
}
