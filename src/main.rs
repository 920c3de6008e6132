// src/main.rs
mod config;
mod extractors;
mod pipeline;
mod reports;
mod storage;
mod utils;

use std::path::PathBuf;

use clap::Parser;
use config::RunConfig;
use extractors::PageExtractor;
use reports::client::{self, ReportClient};
use storage::StorageManager;
use utils::AppError;

/// Scrapes model report pages into a single JSON document
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path of the JSON results file
    #[arg(short, long, default_value = storage::DEFAULT_RESULTS_PATH)]
    output: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = client::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// User-Agent header sent with each request
    #[arg(long, default_value = client::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Report to scrape as NAME=URL (repeatable; replaces the built-in master/wmi list)
    #[arg(short, long = "source", value_name = "NAME=URL")]
    sources: Vec<String>,

    /// Debug mode - save raw and annotated HTML next to the output file
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    utils::logging::setup_logging(if args.debug { "debug" } else { "info" });
    tracing::info!("Starting processing for args: {:?}", args);

    let sources = config::resolve_sources(&args.sources)?;
    let debug_dir = args.debug.then(|| {
        args.output
            .parent()
            .map(|p| p.join("debug"))
            .unwrap_or_else(|| PathBuf::from("debug"))
    });
    let run_config = RunConfig { sources, debug_dir };

    let fetcher = ReportClient::new(args.timeout, &args.user_agent)?;
    let storage = StorageManager::new(&args.output);

    let outcome = pipeline::run(&run_config, &fetcher, &PageExtractor::new()).await;
    pipeline::persist(&outcome, &storage)?;

    Ok(())
}
