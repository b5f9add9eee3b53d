//! Crawler module for catalog listing and artifact harvesting
//!
//! This module contains the core harvest logic, including:
//! - Cursor-following pagination over the catalog listing endpoint
//! - Per-credential rate limiting
//! - The shared work queue and the worker pool that drains it
//! - Overall run coordination and resumable-state bookkeeping

mod coordinator;
mod fetcher;
mod limiter;
mod paginator;
mod queue;
mod worker;

pub use coordinator::{CrawlCoordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_artifact, FetchOutcome};
pub use limiter::RateLimiter;
pub use paginator::{ModelRecord, Paginator};
pub use queue::WorkQueue;
pub use worker::{Credential, Worker, WorkerStats};

use crate::config::{Config, HarvesterConfig};
use crate::output::{write_metadata_snapshot, write_run_summary, RunSummary};
use crate::HarvestError;
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Runs a complete harvest: list, select, fetch, persist
///
/// This is the main entry point. It will:
/// 1. Walk the catalog listing to completeness
/// 2. Write a dated metadata snapshot of everything listed
/// 3. Apply the configured popularity filters and item cap
/// 4. Drain the selected records through the worker pool
/// 5. Persist the result store and write the run summary
///
/// # Arguments
///
/// * `config` - The harvester configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Harvest completed (possibly with per-item errors)
/// * `Err(HarvestError)` - Listing, worker-pool, or persistence failure
pub async fn run_harvest(config: Config) -> Result<RunSummary, HarvestError> {
    let started_at = Utc::now();
    let client = build_http_client(config.api.request_timeout)?;

    let paginator = Paginator::new(
        client.clone(),
        config.api.base_url.clone(),
        config.api.page_size,
        Duration::from_millis(config.api.list_interval),
    );
    let records = paginator.list_all().await?;
    let listed = records.len();
    tracing::info!("Catalog listing complete: {} records", listed);

    let snapshot_path = write_metadata_snapshot(Path::new(&config.output.metadata_dir), &records)?;
    tracing::info!("Metadata snapshot written to {}", snapshot_path.display());

    let records = select_records(records, &config.harvester);
    let selected = records.len();

    let coordinator = CrawlCoordinator::new(&config, client)?;

    // Ctrl-C requests a cooperative stop: in-flight fetches finish, the
    // store persists, and the next run resumes the remainder.
    let stop = coordinator.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Shutdown requested, letting in-flight fetches finish");
            stop.store(true, Ordering::Relaxed);
        }
    });

    let report = coordinator.run(records).await?;

    let summary = RunSummary {
        started_at,
        finished_at: Utc::now(),
        listed,
        selected,
        skipped: report.skipped,
        enqueued: report.enqueued,
        processed: report.stats.processed,
        succeeded: report.stats.succeeded,
        not_found: report.stats.not_found,
        failed: report.stats.failed,
        store_size: report.store_size,
    };

    write_run_summary(&summary, Path::new(&config.output.summary_path))?;

    tracing::info!(
        "Harvest complete: {} processed ({} ok, {} missing, {} errors) in {:?}",
        summary.processed,
        summary.succeeded,
        summary.not_found,
        summary.failed,
        (summary.finished_at - summary.started_at)
            .to_std()
            .unwrap_or_default()
    );

    Ok(summary)
}

/// Applies the configured popularity filters and item cap
///
/// Filtering drops records below the like/download floors; when a cap is
/// set, the survivors are ordered by likes (most liked first) before
/// truncation, so the cap keeps the most popular slice.
fn select_records(mut records: Vec<ModelRecord>, config: &HarvesterConfig) -> Vec<ModelRecord> {
    if let Some(min_likes) = config.min_likes {
        records.retain(|r| r.likes.unwrap_or(0) >= min_likes);
    }
    if let Some(min_downloads) = config.min_downloads {
        records.retain(|r| r.downloads.unwrap_or(0) >= min_downloads);
    }

    if let Some(max_items) = config.max_items {
        records.sort_by(|a, b| b.likes.unwrap_or(0).cmp(&a.likes.unwrap_or(0)));
        records.truncate(max_items);
    }

    records
}
