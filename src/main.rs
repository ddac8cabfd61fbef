//! transitive-enrich: add transitive dependencies to a package inventory
//!
//! Resolves requirements.txt and pom.xml manifests through the deps.dev
//! dependency graph API.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transitive_enrich::{
    cli,
    config::{AppConfig, DepsDevConfig, OutputConfig},
};

#[derive(Parser)]
#[command(name = "transitive-enrich")]
#[command(version)]
#[command(about = "Add transitive dependencies to a package inventory via deps.dev", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Inventory written (enrichment problems are logged, not fatal)
    1  I/O or serialization error
    2  Invalid configuration

EXAMPLES:
    # Enrich an inventory and print it
    transitive-enrich enrich inventory.json

    # Only resolve pom.xml manifests, write to a file
    transitive-enrich enrich inventory.json --ecosystem maven -O enriched.json

    # Point at a deps.dev mirror with a short timeout
    transitive-enrich enrich inventory.json --base-url http://localhost:8080 --timeout 5")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Which ecosystems to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EcosystemArg {
    Pypi,
    Maven,
    All,
}

/// Arguments for the `enrich` subcommand
#[derive(Parser)]
struct EnrichArgs {
    /// Path to the inventory JSON
    inventory: PathBuf,

    /// Write the enriched inventory to a file instead of stdout
    #[arg(short = 'O', long = "output-file")]
    output_file: Option<PathBuf>,

    /// Ecosystems to resolve
    #[arg(long, value_enum, default_value = "all")]
    ecosystem: EcosystemArg,

    /// deps.dev API base URL
    #[arg(long, env = "DEPSDEV_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Overall deadline for enrichment in seconds
    #[arg(long)]
    deadline: Option<u64>,

    /// Skip enrichers that need network access
    #[arg(long)]
    offline: bool,

    /// Resolve manifests one at a time
    #[arg(long)]
    no_parallel: bool,

    /// Write single-line JSON
    #[arg(long)]
    compact: bool,
}

impl EnrichArgs {
    /// CLI values as a config to layer over the file config.
    fn overrides(&self) -> AppConfig {
        let defaults = DepsDevConfig::default();
        AppConfig {
            depsdev: DepsDevConfig {
                base_url: self.base_url.clone().unwrap_or(defaults.base_url),
                timeout_secs: self.timeout.unwrap_or(defaults.timeout_secs),
                deadline_secs: self.deadline,
                enable_pypi: self.ecosystem != EcosystemArg::Maven,
                enable_maven: self.ecosystem != EcosystemArg::Pypi,
                parallel: !self.no_parallel,
                offline: self.offline,
            },
            output: OutputConfig {
                file: self.output_file.clone(),
                compact: self.compact,
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve transitive dependencies and merge them into the inventory
    Enrich(EnrichArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate an example .transitive-enrich.yaml in the current directory
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match cli.command {
        Commands::Enrich(args) => {
            let (config, loaded_from) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &args.overrides());
            if let Some(path) = loaded_from {
                tracing::debug!("Using config file {}", path.display());
            }

            let exit_code = cli::run_enrich(&args.inventory, &config, cli.quiet)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "transitive-enrich", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = transitive_enrich::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(())
        }

        Commands::InitConfig => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".transitive-enrich.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            let content = transitive_enrich::config::generate_example_config();
            std::fs::write(&target, content)
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
            Ok(())
        }
    }
}
