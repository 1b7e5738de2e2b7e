mod commands;
mod render;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use venuecal_core::config::VenuecalConfig;

#[derive(Parser)]
#[command(name = "venuecal")]
#[command(about = "Fold scraped venue listings into a date-sharded event store")]
#[command(version)]
struct Cli {
    /// Directory holding the per-date records (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a scrape result (JSON) with the stored records
    Sync {
        /// Scrape result file, or "-" for stdin
        input: PathBuf,

        /// Accept a scrape that found no events at all
        #[arg(long)]
        allow_empty: bool,
    },
    /// List stored events grouped by date
    Events {
        /// First date to show (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last date to show (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Only show cancelled events
        #[arg(long)]
        cancelled: bool,
    },
    /// Write every stored event as JSON for the calendar emitter
    Export {
        /// Output file (defaults to export_path from config, then stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarize the stored records
    Status,
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = VenuecalConfig::load()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Sync { input, allow_empty } => commands::sync::run(&config, &input, allow_empty),
        Commands::Events {
            from,
            to,
            cancelled,
        } => commands::events::run(&config, from, to, cancelled),
        Commands::Export { output } => commands::export::run(&config, output),
        Commands::Status => commands::status::run(&config),
        Commands::Config => commands::config::run(&config),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VENUECAL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "venuecal_core=debug,venuecal=debug,info"
        } else {
            "warn"
        })
    });

    let format = env::var("VENUECAL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
