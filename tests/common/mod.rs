#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn write_template(dir: &Path, filename: &str, content: &str) {
    fs::write(dir.join(filename), content).expect("Failed to write template file");
}

pub fn write_catalog_config(dir: &Path, content: &str) {
    fs::write(dir.join("catalog.yaml"), content).expect("Failed to write catalog.yaml");
}

/// Template with a required string and a defaulted boolean
pub fn simple_template(name: &str) -> String {
    format!(
        r#"
name: {}
description: Simple test template
inputs:
  package-name:
    type: string
    required: true
  run-lint:
    type: boolean
    default: true
steps:
  - name: Lint
    if: ${{{{ inputs.run-lint }}}}
    run: ruff check ${{{{ inputs.package-name }}}}
"#,
        name
    )
}

/// Template in the reusable-workflow layout, with no required inputs
pub fn workflow_call_template(name: &str) -> String {
    format!(
        r#"
name: {}
on:
  workflow_call:
    inputs:
      python-versions:
        type: string
        default: '["3.11", "3.12"]'
      run-tests:
        type: boolean
        default: true
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - name: Test
        if: inputs.run-tests
        uses: ./.github/actions/pytest-matrix
        with:
          python-versions: ${{{{ inputs.python-versions }}}}
"#,
        name
    )
}

/// Reusable workflow whose steps also read `matrix`, `secrets` and `github`
pub fn runtime_context_template(name: &str) -> String {
    format!(
        r#"
name: {}
on:
  workflow_call:
    inputs:
      package-name:
        type: string
        required: true
      publish:
        type: boolean
        default: false
jobs:
  release:
    runs-on: ubuntu-latest
    steps:
      - name: Set up Python
        uses: actions/setup-python@v5
        with:
          python-version: ${{{{ matrix.python-version }}}}
      - name: Build
        if: github.event.inputs.skip-build != 'true'
        run: uv build --package ${{{{ inputs.package-name }}}}
      - name: Publish
        if: ${{{{ inputs.publish && github.ref == 'refs/heads/main' }}}}
        run: uv publish --token ${{{{ secrets.PYPI_TOKEN }}}}
      - name: Announce
        if: inputs.package-name != 'inputs.internal'
        run: echo released
"#,
        name
    )
}

pub fn invalid_default_template(name: &str) -> String {
    format!(
        r#"
name: {}
inputs:
  run-lint:
    type: boolean
    default: "yes"
"#,
        name
    )
}
