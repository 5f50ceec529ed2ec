//! flowcraft command-line interface.
//!
//! Compiles workflow graph documents into phase-ordered execution
//! plans, validates them, and estimates their credit cost.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CliConfig;

/// flowcraft - compile workflow graphs into execution plans
#[derive(Parser)]
#[command(name = "flowcraft")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a task catalog file overriding the builtin catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a graph document, reporting every error
    Validate {
        /// Path to the graph document (JSON)
        graph_file: PathBuf,
    },

    /// Compile a graph document into a plan document
    Compile {
        /// Path to the graph document (JSON)
        graph_file: PathBuf,

        /// Write the plan document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Estimate the credit cost of a graph document
    Estimate {
        /// Path to the graph document (JSON)
        graph_file: PathBuf,
    },

    /// List the tasks in the active catalog
    Tasks,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env().context("failed to load configuration")?;

    let catalog_path = cli
        .catalog
        .or_else(|| config.catalog_path.as_ref().map(PathBuf::from));
    let registry = commands::load_registry(catalog_path.as_deref())?;
    let pretty = config.output.pretty && !cli.compact;

    match cli.command {
        Commands::Validate { graph_file } => {
            let output = commands::run_validate(&graph_file, &registry, pretty)?;
            println!("{}", output.rendered);
            if !output.is_valid {
                std::process::exit(1);
            }
        }
        Commands::Compile { graph_file, output } => {
            let rendered = commands::run_compile(&graph_file, &registry, pretty)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered.as_bytes()).with_context(|| {
                        format!("failed to write plan document: {}", path.display())
                    })?;
                    tracing::info!(path = %path.display(), "wrote plan document");
                }
                None => println!("{rendered}"),
            }
        }
        Commands::Estimate { graph_file } => {
            let rendered = commands::run_estimate(&graph_file, &registry, pretty)?;
            println!("{rendered}");
        }
        Commands::Tasks => {
            let rendered = commands::run_tasks(&registry, pretty)?;
            println!("{rendered}");
        }
    }

    Ok(())
}
