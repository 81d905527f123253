mod common;

use common::*;
use ci_templates::prelude::*;
use ci_templates::TemplateOrigin;

#[test]
fn test_default_catalog_config() {
    let config = CatalogConfig::default();
    assert!(config.include_builtin);
    assert!(config.defaults.is_empty());
}

#[test]
fn test_load_config_file_not_found() {
    let result = CatalogConfig::load("/nonexistent/path/catalog.yaml");
    assert!(result.is_err());
}

#[test]
fn test_load_empty_config_file() {
    let dir = create_test_dir();
    write_catalog_config(dir.path(), "");

    let config = CatalogConfig::load(dir.path().join("catalog.yaml")).unwrap();
    assert!(config.include_builtin);
}

#[test]
fn test_load_config_wrong_types() {
    let dir = create_test_dir();
    write_catalog_config(dir.path(), "include_builtin: sometimes");

    let result = CatalogConfig::load(dir.path().join("catalog.yaml"));
    assert!(result.is_err());
}

#[test]
fn test_load_from_dir_without_config() {
    let dir = create_test_dir();
    let config = CatalogConfig::load_from_dir(dir.path()).unwrap();
    assert!(config.include_builtin);
}

#[test]
fn test_catalog_includes_builtin_by_default() {
    let dir = create_test_dir();
    write_template(dir.path(), "local.yaml", &simple_template("local"));

    let catalog = TemplateCatalog::from_directory(dir.path(), &CatalogConfig::default()).unwrap();
    let names = catalog.names();
    assert!(names.contains(&"local"));
    assert!(names.contains(&"python-ci"));
    assert!(names.contains(&"publish-package"));
    assert!(names.contains(&"docs-site"));
}

#[test]
fn test_catalog_without_builtin() {
    let dir = create_test_dir();
    write_template(dir.path(), "local.yaml", &simple_template("local"));
    write_catalog_config(dir.path(), "include_builtin: false");

    let config = CatalogConfig::load_from_dir(dir.path()).unwrap();
    let catalog = TemplateCatalog::from_directory(dir.path(), &config).unwrap();
    assert_eq!(catalog.names(), vec!["local"]);
}

#[test]
fn test_directory_template_replaces_builtin() {
    let dir = create_test_dir();
    write_template(dir.path(), "python-ci.yaml", &simple_template("python-ci"));

    let catalog = TemplateCatalog::from_directory(dir.path(), &CatalogConfig::default()).unwrap();
    let python = catalog.get("python-ci").unwrap();
    assert_eq!(python.parameters.len(), 2);
    assert_eq!(python.description.as_deref(), Some("Simple test template"));

    assert_eq!(catalog.origin("python-ci"), Some(TemplateOrigin::Local));
    assert_eq!(catalog.origin("docs-site"), Some(TemplateOrigin::Builtin));
}

#[test]
fn test_duplicate_directory_templates() {
    let dir = create_test_dir();
    write_template(dir.path(), "a.yaml", &simple_template("same"));
    write_template(dir.path(), "b.yaml", &simple_template("same"));

    let result = TemplateCatalog::from_directory(dir.path(), &CatalogConfig::default());
    assert!(matches!(result, Err(CatalogError::DuplicateTemplate(_))));
}

#[test]
fn test_config_overrides_builtin_defaults() {
    let dir = create_test_dir();
    write_catalog_config(
        dir.path(),
        r#"
defaults:
  python-ci:
    run-type-check: false
    python-versions: '["3.13"]'
  publish-package:
    repository: testpypi
"#,
    );

    let config = CatalogConfig::load_from_dir(dir.path()).unwrap();
    let catalog = TemplateCatalog::from_directory(dir.path(), &config).unwrap();

    let request = InvocationRequest::new().with("package-name", "foo");
    let python = catalog.resolve("python-ci", &request).unwrap();
    assert!(!python.is_enabled("run-type-check"));
    assert_eq!(python.get_str("python-versions"), Some("[\"3.13\"]"));
    assert_eq!(python.source("run-type-check"), Some(ValueSource::Default));

    let publish = catalog.resolve("publish-package", &request).unwrap();
    assert_eq!(publish.get_str("repository"), Some("testpypi"));

    // Caller values still win over organization defaults
    let request = request.with("run-type-check", true);
    let python = catalog.resolve("python-ci", &request).unwrap();
    assert!(python.is_enabled("run-type-check"));
}

#[test]
fn test_config_override_errors() {
    let dir = create_test_dir();

    write_catalog_config(dir.path(), "defaults:\n  missing-template:\n    a: 1\n");
    let config = CatalogConfig::load_from_dir(dir.path()).unwrap();
    assert!(matches!(
        TemplateCatalog::from_directory(dir.path(), &config),
        Err(CatalogError::UnknownTemplateOverride(_))
    ));

    write_catalog_config(dir.path(), "defaults:\n  python-ci:\n    typo: 1\n");
    let config = CatalogConfig::load_from_dir(dir.path()).unwrap();
    assert!(matches!(
        TemplateCatalog::from_directory(dir.path(), &config),
        Err(CatalogError::Template(_))
    ));

    write_catalog_config(dir.path(), "defaults:\n  publish-package:\n    repository: npm\n");
    let config = CatalogConfig::load_from_dir(dir.path()).unwrap();
    assert!(matches!(
        TemplateCatalog::from_directory(dir.path(), &config),
        Err(CatalogError::Template(_))
    ));
}
