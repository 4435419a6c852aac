//! PC-012: CLI subcommands — init, breakdown, references.

use crate::core::{parser, pipeline, registry::Registry, types};
use clap::{Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default plancost.yaml
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show cost components for every supported resource in a plan
    Breakdown {
        /// Plan JSON (`terraform show -json plan.out > plan.json`)
        #[arg(short, long)]
        plan: PathBuf,

        /// Settings file
        #[arg(short, long, default_value = "plancost.yaml")]
        config: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show resolved reference edges and usage bindings
    References {
        /// Plan JSON
        #[arg(short, long)]
        plan: PathBuf,

        /// Settings file
        #[arg(short, long, default_value = "plancost.yaml")]
        config: PathBuf,
    },
}

/// Breakdown output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Breakdown {
            plan,
            config,
            format,
        } => cmd_breakdown(&plan, &config, format),
        Commands::References { plan, config } => cmd_references(&plan, &config),
    }
}

const SETTINGS_TEMPLATE: &str = r#"# plancost settings
#
# Region used when the plan's AWS provider block has no constant region.
fallback_region: us-east-1
"#;

fn cmd_init(path: &Path) -> Result<(), String> {
    let settings_path = path.join("plancost.yaml");
    if settings_path.exists() {
        return Err(format!("{} already exists", settings_path.display()));
    }
    std::fs::create_dir_all(path).map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    std::fs::write(&settings_path, SETTINGS_TEMPLATE)
        .map_err(|e| format!("cannot write {}: {}", settings_path.display(), e))?;

    println!("Created {}", settings_path.display());
    Ok(())
}

/// Parse settings and plan, then resolve references and usage.
fn load(plan: &Path, config: &Path) -> Result<types::ResolvedPlan, String> {
    let settings = parser::parse_settings_file(config).map_err(|e| e.to_string())?;
    let doc = parser::parse_plan_file(plan).map_err(|e| e.to_string())?;
    pipeline::load_plan(&doc, &settings).map_err(|e| e.to_string())
}

fn cmd_breakdown(plan: &Path, config: &Path, format: OutputFormat) -> Result<(), String> {
    let resolved = load(plan, config)?;
    let registry = Registry::with_defaults();
    let breakdown = pipeline::build_breakdown(&resolved, &registry);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&breakdown)
                .map_err(|e| format!("serialize error: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Table => print_breakdown(&breakdown),
    }
    Ok(())
}

/// Display a breakdown to stdout.
fn print_breakdown(breakdown: &types::Breakdown) {
    for resource in &breakdown.resources {
        print_resource(resource, 0);
    }
    if !breakdown.skipped.is_empty() {
        println!();
        println!("Skipped (unsupported):");
        for address in &breakdown.skipped {
            println!("  {}", address);
        }
    }
    println!();
    println!(
        "{} resource(s) priced, {} skipped, {} cost component(s).",
        breakdown.resources.len(),
        breakdown.skipped.len(),
        breakdown.component_count()
    );
}

fn print_resource(resource: &types::CostResource, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}{}", indent, resource.name);
    for component in &resource.cost_components {
        println!("{}  - {}", indent, component);
    }
    for sub in &resource.sub_resources {
        print_resource(sub, depth + 1);
    }
}

fn cmd_references(plan: &Path, config: &Path) -> Result<(), String> {
    let resolved = load(plan, config)?;

    for (address, record) in &resolved.resources {
        println!("{} [{}] ({})", address, record.resource_type, record.region);
        for (attribute, producers) in &record.references {
            println!("  {} → {}", attribute, producers.join(", "));
        }
        if let Some(usage) = resolved.usage.get(address) {
            println!("  usage ← {}", usage.carrier);
        }
    }
    Ok(())
}
