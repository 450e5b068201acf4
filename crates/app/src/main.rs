use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spendlog_core::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "spendlog", version, about = "Read expense totals from receipt photos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: the platform config dir's spendlog.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the total read from each receipt image
    Scan {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Resolve an expense from a typed amount or a receipt image
    Expense {
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        receipt: Option<PathBuf>,
    },
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "spendlog", "Spendlog")
        .map(|dirs| dirs.config_dir().join("spendlog.toml"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.config.clone().or_else(default_config_path) {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            Config::load(&path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    }
    .with_env();

    let output = match cli.command {
        Commands::Scan { images } => commands::scan(&config, &images).await?,
        Commands::Expense { amount, receipt } => {
            commands::expense(&config, amount, receipt.as_deref()).await?
        }
    };

    println!("{}", output.render(cli.json)?);
    Ok(())
}
