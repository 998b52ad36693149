//! openapi-operator-gen CLI
//!
//! Command-line interface for classifying REST APIs described by OpenAPI 3.x
//! or Swagger 2.0 documents into Kubernetes operator building blocks.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use openapi_operator_gen_common::{FilterConfig, GlobPathFilter, ParsedSpec, ParserConfig};
use openapi_operator_gen_parser::{
    Classification, ClassificationReport, OpenApiParser, TableObserver, TracingObserver,
};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = ".openapi-operator-gen.yaml";

#[derive(Parser)]
#[command(name = "openapi-operator-gen")]
#[command(version, about = "Classify OpenAPI REST APIs for Kubernetes operator generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a spec and display its resources, queries and actions
    #[command(after_help = "EXAMPLES:\n  \
        # Parse a local spec\n  \
        openapi-operator-gen parse --spec petstore.yaml\n\n  \
        # Parse a remote spec, naming the root endpoint\n  \
        openapi-operator-gen parse --spec https://petstore3.swagger.io/api/v3/openapi.json --root-kind Petstore\n\n  \
        # Only the pet endpoints, without deletes, as JSON\n  \
        openapi-operator-gen parse --spec petstore.yaml \\\n    \
        --include-path '/pet/*' \\\n    \
        --exclude-operation 'delete*' \\\n    \
        --json")]
    Parse(ParseArgs),

    /// Write an example configuration file
    InitConfig {
        /// Output file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct ParseArgs {
    /// Path or URL of the spec (falls back to `spec` in the config file)
    #[arg(short, long)]
    spec: Option<String>,

    /// Kind for the root "/" endpoint (derived from the spec file name if omitted)
    #[arg(long)]
    root_kind: Option<String>,

    /// Configuration file (searched in the current directory if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only classify paths matching these glob patterns
    #[arg(long, value_delimiter = ',')]
    include_path: Vec<String>,

    /// Skip paths matching these glob patterns
    #[arg(long, value_delimiter = ',')]
    exclude_path: Vec<String>,

    /// Only classify paths with one of these tags
    #[arg(long, value_delimiter = ',')]
    include_tag: Vec<String>,

    /// Skip paths with any of these tags
    #[arg(long, value_delimiter = ',')]
    exclude_tag: Vec<String>,

    /// Only classify operations whose operationId matches these patterns
    #[arg(long, value_delimiter = ',')]
    include_operation: Vec<String>,

    /// Skip operations whose operationId matches these patterns
    #[arg(long, value_delimiter = ',')]
    exclude_operation: Vec<String>,

    /// Print the parsed spec as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl ParseArgs {
    fn filters(&self) -> FilterConfig {
        FilterConfig {
            include_paths: self.include_path.clone(),
            exclude_paths: self.exclude_path.clone(),
            include_tags: self.include_tag.clone(),
            exclude_tags: self.exclude_tag.clone(),
            include_operations: self.include_operation.clone(),
            exclude_operations: self.exclude_operation.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse(args) => parse_command(&args, cli.verbose)?,
        Commands::InitConfig { output } => init_config_command(&output)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config from `--config`, or the first config file in the current directory
fn load_config(explicit: Option<&Path>) -> Result<ParserConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => ParserConfig::find(&env::current_dir()?),
    };

    match path {
        Some(path) => {
            debug!("Using config file {}", path.display());
            ParserConfig::load(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => Ok(ParserConfig::default()),
    }
}

fn parse_command(args: &ParseArgs, verbose: bool) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(spec) = &args.spec {
        config.spec = Some(spec.clone());
    }
    if let Some(root_kind) = &args.root_kind {
        config.root_kind = Some(root_kind.clone());
    }

    let Some(spec) = config.spec.clone() else {
        bail!("No spec given: pass --spec or set `spec` in the config file");
    };

    let mut filters = args.filters();
    if let Some(file_filters) = &config.filters {
        filters.merge_missing(file_filters);
    }

    if !args.json {
        println!("{} Parsing spec: {}", "→".cyan(), spec);
    }

    let mut parser = OpenApiParser::new();
    if let Some(root_kind) = config.effective_root_kind() {
        if !args.json {
            println!("{} Root kind: {}", "→".cyan(), root_kind.yellow());
        }
        parser = parser.with_root_kind(root_kind);
    }
    if !filters.is_empty() {
        parser = parser.with_filter(Box::new(GlobPathFilter::new(filters)));
    }

    // stdout carries the JSON document, so the table goes to the log instead
    let result = if args.json {
        parser.parse_observed(&spec, &mut TracingObserver)
    } else {
        parser.parse_observed(&spec, &mut TableObserver::stdout())
    };
    let (parsed, report) = result.with_context(|| format!("Failed to parse spec {}", spec))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&parsed).context("Failed to serialize parsed spec")?
        );
        return Ok(());
    }

    print_summary(&parsed, &report, verbose);
    Ok(())
}

fn print_summary(parsed: &ParsedSpec, report: &ClassificationReport, verbose: bool) {
    println!("\n{}", "✓ Parse successful!".green().bold());
    println!("\n{}", "API:".bold());
    println!("  Title: {}", parsed.title.yellow());
    println!("  Version: {}", parsed.version.yellow());
    if let Some(base_url) = &parsed.base_url {
        println!("  Base URL: {}", base_url);
    }
    println!("  Resources: {}", parsed.resources.len());
    println!("  Query endpoints: {}", parsed.query_endpoints.len());
    println!("  Action endpoints: {}", parsed.action_endpoints.len());
    println!("  Schemas: {}", parsed.schemas.len());

    let skipped = report.paths_with(Classification::Skipped);
    let dropped = report.paths_with(Classification::Dropped);
    if report.filtered_count() > 0 {
        println!("  Filtered paths: {}", report.filtered_count());
    }
    if !skipped.is_empty() || !dropped.is_empty() {
        println!(
            "  {} {} skipped, {} dropped",
            "!".yellow(),
            skipped.len(),
            dropped.len()
        );
    }

    if !parsed.resources.is_empty() {
        println!("\n{}", "Resources:".bold());
        for resource in &parsed.resources {
            let methods: Vec<&str> = resource.methods().iter().map(|m| m.as_str()).collect();
            println!(
                "  • {} {} [{}]",
                resource.name.cyan(),
                resource.path,
                methods.join(", ")
            );
            if verbose {
                for op in &resource.operations {
                    println!(
                        "    {} {} {}",
                        op.method,
                        op.path,
                        op.operation_id.as_deref().unwrap_or("-").dimmed()
                    );
                }
            }
        }
    }

    if !parsed.query_endpoints.is_empty() {
        println!("\n{}", "Query endpoints:".bold());
        for query in &parsed.query_endpoints {
            println!("  • {} GET {}", query.name.cyan(), query.path);
        }
    }

    if !parsed.action_endpoints.is_empty() {
        println!("\n{}", "Action endpoints:".bold());
        for action in &parsed.action_endpoints {
            println!(
                "  • {} {} {}",
                action.name.cyan(),
                action.http_method,
                action.path
            );
            if verbose {
                if let Some(parent) = &action.parent_resource {
                    println!(
                        "    parent: {} ({})",
                        parent,
                        action.parent_id_param.as_deref().unwrap_or("-")
                    );
                }
            }
        }
    }
}

fn init_config_command(output: &Path) -> Result<()> {
    ParserConfig::write_example(output)
        .with_context(|| format!("Failed to write config {}", output.display()))?;

    println!(
        "{} Wrote example configuration to {}",
        "✓".green(),
        output.display()
    );
    println!("\n{}", "Next steps:".bold());
    println!("  1. Set `spec` to your OpenAPI document");
    println!("  2. Adjust the filters, then run `openapi-operator-gen parse`");
    Ok(())
}
