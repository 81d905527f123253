//! Template directory loader
//!
//! Load workflow templates from YAML files in a directory.

use std::path::Path;

use super::template::{TemplateError, WorkflowTemplate};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error in {file}: {error}")]
    Yaml {
        file: String,
        error: serde_yaml::Error,
    },

    #[error("Invalid template in {file}: {error}")]
    Template { file: String, error: TemplateError },
}

/// File names reserved for catalog configuration
pub const CATALOG_CONFIG_FILES: [&str; 2] = ["catalog.yaml", "catalog.yml"];

pub struct TemplateLoader;

impl TemplateLoader {
    pub fn load_directory(dir: &Path) -> Result<Vec<WorkflowTemplate>, LoadError> {
        let mut paths = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() {
                let ext = path.extension().and_then(|e| e.to_str());
                let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

                // Skip catalog.yaml - it's a config file, not a template
                if CATALOG_CONFIG_FILES.contains(&filename) {
                    continue;
                }

                if ext == Some("yaml") || ext == Some("yml") {
                    paths.push(path);
                }
            }
        }

        paths.sort();

        let mut templates = Vec::with_capacity(paths.len());
        for path in paths {
            templates.push(Self::load_file(&path)?);
        }

        tracing::debug!(dir = %dir.display(), count = templates.len(), "Loaded templates");
        Ok(templates)
    }

    pub fn load_file(path: &Path) -> Result<WorkflowTemplate, LoadError> {
        let content = std::fs::read_to_string(path)?;
        let stem = path.file_stem().and_then(|s| s.to_str());

        WorkflowTemplate::from_yaml_str(&content, stem).map_err(|e| match e {
            TemplateError::Parse(error) => LoadError::Yaml {
                file: path.display().to_string(),
                error,
            },
            error => LoadError::Template {
                file: path.display().to_string(),
                error,
            },
        })
    }
}
