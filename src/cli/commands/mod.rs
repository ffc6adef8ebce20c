//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific
//! modules.

mod crawl;
mod probe;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::models::RunMode;

#[derive(Parser)]
#[command(name = "albumhaul")]
#[command(about = "Yearly soundtrack-album acquisition tool")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root output directory (overrides config file)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Fixed delay between requests, in milliseconds
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl year listings and write verification reports without
    /// downloading anything
    Preview {
        /// Years to crawl (defaults to the configured range)
        years: Vec<String>,
        /// First year, inclusive (overrides config)
        #[arg(long)]
        from: Option<u16>,
        /// Last year, inclusive (overrides config)
        #[arg(long)]
        to: Option<u16>,
        /// Years processed at once
        #[arg(long)]
        year_workers: Option<usize>,
    },

    /// Crawl year listings and download every discovered album
    Run {
        /// Years to crawl (defaults to the configured range)
        years: Vec<String>,
        /// First year, inclusive (overrides config)
        #[arg(long)]
        from: Option<u16>,
        /// Last year, inclusive (overrides config)
        #[arg(long)]
        to: Option<u16>,
        /// Downloads in flight within one listing page
        #[arg(short, long)]
        workers: Option<usize>,
        /// Years processed at once
        #[arg(long)]
        year_workers: Option<usize>,
        /// Extra attempts for a failed listing-page fetch
        #[arg(long)]
        listing_retries: Option<u32>,
    },

    /// Resolve a single album page and print the chosen download link
    Probe {
        /// Album page URL
        url: String,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(output) = cli.output {
        settings.output_dir = output;
    }
    if let Some(delay) = cli.delay_ms {
        settings.request_delay_ms = delay;
    }
    if let Some(timeout) = cli.timeout_secs {
        settings.timeout_secs = timeout;
    }

    match cli.command {
        Commands::Preview {
            years,
            from,
            to,
            year_workers,
        } => {
            apply_range(&mut settings, from, to);
            if let Some(n) = year_workers {
                settings.year_workers = n;
            }
            crawl::cmd_crawl(&settings, &years, RunMode::Preview).await
        }
        Commands::Run {
            years,
            from,
            to,
            workers,
            year_workers,
            listing_retries,
        } => {
            apply_range(&mut settings, from, to);
            if let Some(n) = workers {
                settings.entity_workers = n;
            }
            if let Some(n) = year_workers {
                settings.year_workers = n;
            }
            if let Some(n) = listing_retries {
                settings.listing_retries = n;
            }
            crawl::cmd_crawl(&settings, &years, RunMode::Download).await
        }
        Commands::Probe { url } => probe::cmd_probe(&settings, &url).await,
    }
}

fn apply_range(settings: &mut Settings, from: Option<u16>, to: Option<u16>) {
    if let Some(from) = from {
        settings.start_year = from;
    }
    if let Some(to) = to {
        settings.end_year = to;
    }
}
