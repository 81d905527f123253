use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ci_templates::prelude::*;
use ci_templates::engine::TemplateOrigin;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ci-templates")]
#[command(about = "Resolve inputs for reusable CI workflow templates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of template files (default: built-in templates only)
    #[arg(short, long, global = true, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Path to catalog.yaml config file (default: <DIR>/catalog.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available templates
    List,

    /// Show the parameters of a template
    Show {
        /// Template name
        name: String,
    },

    /// Resolve a template's effective configuration
    Resolve {
        #[command(flatten)]
        invocation: InvocationArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show which steps of a template run, and with what arguments
    Plan {
        #[command(flatten)]
        invocation: InvocationArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,
    },

    /// Validate template files without resolving them
    Validate {
        /// Path to template file or directory
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct InvocationArgs {
    /// Template name
    name: String,

    /// Input override as key=value (repeatable)
    #[arg(short, long = "input", value_name = "KEY=VALUE")]
    inputs: Vec<String>,

    /// YAML or JSON file with input overrides
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
    /// name=value lines
    Env,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlanFormat {
    Text,
    Json,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "ci_templates=debug"
    } else {
        "ci_templates=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let templates = cli.templates.as_deref();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::List => list_templates(&load_catalog(templates, config)?),
        Commands::Show { name } => show_template(&load_catalog(templates, config)?, &name),
        Commands::Resolve { invocation, format } => {
            resolve_template(&load_catalog(templates, config)?, &invocation, format)
        }
        Commands::Plan { invocation, format } => {
            plan_template(&load_catalog(templates, config)?, &invocation, format)
        }
        Commands::Validate { path } => validate(&path, config),
    }
}

fn load_config(dir: Option<&Path>, config: Option<&Path>) -> anyhow::Result<CatalogConfig> {
    Ok(match (config, dir) {
        (Some(path), _) => CatalogConfig::load(path)?,
        (None, Some(dir)) => CatalogConfig::load_from_dir(dir)?,
        (None, None) => CatalogConfig::default(),
    })
}

fn load_catalog(dir: Option<&Path>, config: Option<&Path>) -> anyhow::Result<TemplateCatalog> {
    let catalog_config = load_config(dir, config)?;

    match dir {
        Some(dir) => {
            if !dir.is_dir() {
                anyhow::bail!("Directory not found: {}", dir.display());
            }
            Ok(TemplateCatalog::from_directory(dir, &catalog_config)?)
        }
        None => {
            let mut catalog = TemplateCatalog::builtin()?;
            catalog.apply_config(&catalog_config)?;
            Ok(catalog)
        }
    }
}

fn build_request(
    catalog: &TemplateCatalog,
    args: &InvocationArgs,
) -> anyhow::Result<InvocationRequest> {
    let mut request = match &args.file {
        Some(path) => InvocationRequest::load(path)?,
        None => InvocationRequest::new(),
    };

    // Command-line inputs win over the request file
    let pairs = match catalog.get(&args.name) {
        Some(template) => InvocationRequest::from_pairs_for(template, &args.inputs),
        None => InvocationRequest::from_pairs(&args.inputs),
    }
    .map_err(anyhow::Error::msg)?;
    request = request.merge(pairs);

    Ok(request)
}

fn list_templates(catalog: &TemplateCatalog) -> anyhow::Result<bool> {
    if catalog.is_empty() {
        println!("No templates found");
        return Ok(true);
    }

    println!("Templates:\n");
    for template in catalog.iter() {
        let origin = match catalog.origin(&template.name) {
            Some(TemplateOrigin::Builtin) => " [built-in]",
            _ => "",
        };
        match &template.description {
            Some(description) => println!("  {}{} - {}", template.name, origin, description),
            None => println!("  {}{}", template.name, origin),
        }
    }

    Ok(true)
}

fn show_template(catalog: &TemplateCatalog, name: &str) -> anyhow::Result<bool> {
    let Some(template) = catalog.get(name) else {
        anyhow::bail!("Template not found: {}", name);
    };

    println!("{}", template.name);
    if let Some(description) = &template.description {
        println!("{}", description);
    }
    println!("\nParameters:\n");

    let mut specs: Vec<_> = template.parameters.iter().collect();
    specs.sort_by(|a, b| a.name.cmp(&b.name));

    for spec in specs {
        let default = match (&spec.default, spec.required) {
            (Some(d), _) => format!("default: {}", d),
            (None, true) => "required".to_string(),
            (None, false) => "optional".to_string(),
        };
        println!("  {} ({}, {})", spec.name, spec.kind, default);
        if let Some(description) = &spec.description {
            println!("      {}", description);
        }
    }

    println!("\nSteps: {}", template.steps.len());
    Ok(true)
}

/// Report resolution failures as a failed run rather than a CLI error
fn report_failure(err: CatalogError) -> anyhow::Result<bool> {
    match err {
        CatalogError::Resolve(e) => {
            eprintln!("✗ {}", e);
            Ok(false)
        }
        CatalogError::Plan(e) => {
            eprintln!("✗ {}", e);
            Ok(false)
        }
        other => Err(other.into()),
    }
}

fn resolve_template(
    catalog: &TemplateCatalog,
    args: &InvocationArgs,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    let request = build_request(catalog, args)?;

    let resolved = match catalog.resolve(&args.name, &request) {
        Ok(resolved) => resolved,
        Err(e) => return report_failure(e),
    };

    tracing::info!(
        template = %resolved.template,
        parameters = resolved.len(),
        overrides = request.len(),
        "Resolved configuration"
    );

    match format {
        OutputFormat::Text => print_configuration(&resolved),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved.to_json())?),
        OutputFormat::Yaml => print!("{}", resolved.to_yaml()?),
        OutputFormat::Env => print!("{}", resolved.to_output_lines()),
    }

    Ok(true)
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    configuration: serde_json::Value,
    steps: &'a [ci_templates::PlannedStep],
}

fn plan_template(
    catalog: &TemplateCatalog,
    args: &InvocationArgs,
    format: PlanFormat,
) -> anyhow::Result<bool> {
    let request = build_request(catalog, args)?;

    let (resolved, plan) = match catalog.plan(&args.name, &request) {
        Ok(result) => result,
        Err(e) => return report_failure(e),
    };

    match format {
        PlanFormat::Json => {
            let output = PlanOutput {
                configuration: resolved.to_json(),
                steps: &plan.steps,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        PlanFormat::Text => {
            print_configuration(&resolved);
            print_plan(&plan);
        }
    }

    Ok(true)
}

fn validate(path: &Path, config: Option<&Path>) -> anyhow::Result<bool> {
    if !path.exists() {
        anyhow::bail!("Path not found: {}", path.display());
    }

    if path.is_dir() {
        let catalog_config = load_config(Some(path), config)?;
        let result = TemplateLoader::load_directory(path)
            .map_err(CatalogError::from)
            .and_then(|templates| {
                let count = templates.len();
                // Directory templates alone, plus overrides against the full catalog
                TemplateCatalog::from_templates(templates)?;
                TemplateCatalog::from_directory(path, &catalog_config)?;
                Ok(count)
            });

        match result {
            Ok(0) => println!("No templates found in: {}", path.display()),
            Ok(count) => println!("✓ {} templates validated", count),
            Err(e) => {
                eprintln!("✗ {}", e);
                return Ok(false);
            }
        }
    } else {
        match TemplateLoader::load_file(path) {
            Ok(template) => println!(
                "✓ {} is valid ({} parameters, {} steps)",
                path.display(),
                template.parameters.len(),
                template.steps.len()
            ),
            Err(e) => {
                eprintln!("✗ {}", e);
                return Ok(false);
            }
        }
    }

    Ok(true)
}

fn print_configuration(resolved: &ResolvedConfiguration) {
    println!("=== {} ===\n", resolved.template);
    for (name, value) in &resolved.values {
        let source = match value.source {
            ValueSource::Caller => "",
            ValueSource::Default => " (default)",
        };
        println!("  {} = {}{}", name, value.value, source);
    }
}

fn print_plan(plan: &ExecutionPlan) {
    println!("\nSteps:\n");
    for step in &plan.steps {
        if !step.enabled {
            println!("  - {} (skipped)", step.name);
            continue;
        }
        if step.indeterminate {
            println!("  ? {} (decided at run time)", step.name);
        } else {
            println!("  ✓ {}", step.name);
        }
        if let Some(uses) = &step.uses {
            println!("      uses: {}", uses);
        }
        if let Some(run) = &step.run {
            println!("      run: {}", run);
        }
        for (key, value) in &step.with {
            println!("      {}: {}", key, value);
        }
    }
}
