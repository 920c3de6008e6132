// src/pipeline.rs
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

use crate::config::RunConfig;
use crate::extractors::PageExtractor;
use crate::reports::client::Fetch;
use crate::reports::models::{RawDocument, ReportSource, ResultDocument};
use crate::storage::StorageManager;
use crate::utils::error::AppError;
use crate::utils::html_debug;

#[derive(Debug)]
pub struct RunOutcome {
    pub results: ResultDocument,
    pub success_count: usize,
    pub failure_count: usize,
}

/// Fetches and extracts every configured report in order.
///
/// A failed fetch is logged and that report is left out of `results.data`;
/// it never stops the remaining reports from being processed.
pub async fn run<F: Fetch>(
    config: &RunConfig,
    fetcher: &F,
    extractor: &PageExtractor,
) -> RunOutcome {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false);
    let mut results = ResultDocument::new(timestamp);
    let mut success_count = 0;
    let mut failure_count = 0;

    for source in &config.sources {
        match fetcher.fetch(&source.url).await {
            Ok(raw) => {
                tracing::info!("Fetched '{}' ({} bytes)", source.name, raw.html.len());
                if let Some(debug_dir) = &config.debug_dir {
                    save_debug_copies(debug_dir, source, &raw);
                }

                let record = extractor.extract_report(&raw);
                results.data.insert(source.name.clone(), record);
                success_count += 1;
            }
            Err(e) => {
                tracing::error!(
                    "Error fetching report '{}' from {}: {}",
                    source.name,
                    source.url,
                    e
                );
                failure_count += 1;
            }
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);
    RunOutcome { results, success_count, failure_count }
}

/// Persists the outcome when at least one report succeeded.
pub fn persist(outcome: &RunOutcome, storage: &StorageManager) -> Result<PathBuf, AppError> {
    if outcome.success_count == 0 {
        tracing::error!(
            "No data scraped successfully; not writing {}",
            storage.results_path().display()
        );
        return Err(AppError::NoReports(outcome.failure_count));
    }
    Ok(storage.save_results(&outcome.results)?)
}

fn save_debug_copies(debug_dir: &Path, source: &ReportSource, raw: &RawDocument) {
    let report_dir = debug_dir.join(&source.name);
    let raw_path = report_dir.join("raw.html");

    let saved = fs::create_dir_all(&report_dir).and_then(|_| fs::write(&raw_path, &raw.html));
    match saved {
        Ok(()) => tracing::info!("Saved raw HTML to: {}", raw_path.display()),
        Err(e) => tracing::warn!("Failed to save raw HTML for '{}': {}", source.name, e),
    }

    let annotated_path = report_dir.join("annotated.html");
    if let Err(e) =
        html_debug::create_debug_html(&raw.html, &annotated_path, html_debug::LABEL_PATTERNS)
    {
        tracing::warn!("Failed to create debug HTML for '{}': {}", source.name, e);
    }
}
