use crate::config::{resolve_config, GeneratorConfig};
use crate::framework::manifest::load_manifest;
use crate::generator::{write_collection, Generator, Summary};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command-line interface for postman-gen
#[derive(Parser)]
#[command(name = "postman-gen", version)]
#[command(about = "Generate a Postman collection from API routes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a Postman v2.1 collection from a route manifest
    Generate {
        /// Route manifest exported from the application (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Override the configured output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generator config (postman-generator.toml)
        /// If not provided, will auto-detect alongside the manifest
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Execution environment; live capture only runs in local/testing
        #[arg(long = "env", env = "APP_ENV")]
        environment: Option<String>,
    },
}

/// Parse the process arguments and run.
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            manifest,
            output,
            config,
            environment,
        } => {
            let mut settings = resolve_config(&manifest, config.as_deref())?;
            if let Some(env) = environment.filter(|e| !e.trim().is_empty()) {
                settings.environment = env;
            }
            if let Some(output) = output {
                settings.output_path = output;
            }
            generate(&manifest, &settings)
        }
    }
}

fn generate(manifest_path: &Path, config: &GeneratorConfig) -> anyhow::Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let generator = Generator::from_config(config)?;

    let Some(generation) = generator.generate(&manifest) else {
        warn!(manifest = %manifest_path.display(), "no routes matched");
        println!("⚠️  No API routes found matching your configuration.");
        return Ok(());
    };

    write_collection(&config.output_path, &generation.collection)
        .with_context(|| format!("Failed to generate collection for {}", manifest_path.display()))?;
    info!(
        path = %config.output_path.display(),
        routes = generation.summary.total_routes,
        captured = generation.summary.captured,
        "collection written"
    );

    println!(
        "✅ Postman collection successfully generated at: {}",
        config.output_path.display()
    );
    print!("{}", format_summary(&generation.summary));
    Ok(())
}

/// Two-column metric table.
pub fn format_summary(summary: &Summary) -> String {
    let rows = summary.rows();
    let label_width = rows
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0)
        .max("Metric".len());
    let count_width = rows
        .iter()
        .map(|(_, count)| count.to_string().len())
        .max()
        .unwrap_or(0)
        .max("Count".len());

    let border = format!("+-{}-+-{}-+\n", "-".repeat(label_width), "-".repeat(count_width));
    let mut out = border.clone();
    out.push_str(&format!("| {:<label_width$} | {:<count_width$} |\n", "Metric", "Count"));
    out.push_str(&border);
    for (label, count) in rows {
        out.push_str(&format!("| {:<label_width$} | {:<count_width$} |\n", label, count));
    }
    out.push_str(&border);
    out
}
