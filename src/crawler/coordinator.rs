//! Harvest coordinator
//!
//! Owns the work queue, the result store, and a fixed pool of workers (one
//! per credential). The coordinator enqueues the selected records, starts
//! every worker, waits for the queue to drain, and performs the final
//! persist that makes the run resumable.

use crate::config::Config;
use crate::crawler::limiter::RateLimiter;
use crate::crawler::paginator::ModelRecord;
use crate::crawler::queue::WorkQueue;
use crate::crawler::worker::{Credential, Worker, WorkerStats};
use crate::storage::{ArtifactStore, ResultStore};
use crate::HarvestError;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Totals from one drained run, before timestamps are attached
#[derive(Debug, Clone, Copy)]
pub struct CrawlReport {
    /// Records put on the queue this run
    pub enqueued: usize,

    /// Records skipped because a prior run already completed them
    pub skipped: usize,

    /// Aggregated worker counters
    pub stats: WorkerStats,

    /// Result store size after the final persist
    pub store_size: usize,
}

/// Coordinates a pool of workers over one shared work queue
pub struct CrawlCoordinator {
    client: Client,
    base_url: String,
    fetch_interval: Duration,
    credentials: Vec<Credential>,
    queue: Arc<WorkQueue>,
    store: Arc<ResultStore>,
    artifacts: ArtifactStore,
    stop: Arc<AtomicBool>,
}

impl CrawlCoordinator {
    /// Creates a coordinator from explicit configuration
    ///
    /// Loads the result store from disk so the run resumes against prior
    /// outcomes. Pool size is fixed at the number of credentials.
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    /// * `client` - Shared HTTP client for all workers
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlCoordinator)` - Ready to run
    /// * `Err(HarvestError)` - The result store could not be loaded
    pub fn new(config: &Config, client: Client) -> Result<Self, HarvestError> {
        let store = ResultStore::load(&config.output.results_path)?;

        let credentials = config
            .harvester
            .credentials
            .iter()
            .map(Credential::new)
            .collect();

        Ok(Self {
            client,
            base_url: config.api.base_url.clone(),
            fetch_interval: Duration::from_millis(config.harvester.fetch_interval),
            credentials,
            queue: Arc::new(WorkQueue::new()),
            store: Arc::new(store),
            artifacts: ArtifactStore::new(&config.output.artifact_dir),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Handle for requesting a cooperative shutdown
    ///
    /// Setting the flag makes every worker stop before its next dequeue;
    /// in-flight fetches finish and the store still persists, so the next
    /// run picks up the remainder.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs the pool until the queue drains, then persists the store
    ///
    /// Guarantees for a single run: no record is processed twice (one-shot
    /// dequeue), and none is skipped unless it was already complete at
    /// enqueue time. Per-item failures are recorded as outcomes; only a
    /// worker task failure or a persistence failure propagates.
    pub async fn run(&self, records: Vec<ModelRecord>) -> Result<CrawlReport, HarvestError> {
        let total = records.len();
        let enqueued = self.queue.enqueue_all(records, &self.store);
        let skipped = total - enqueued;

        tracing::info!(
            "Enqueued {} of {} records ({} already complete), {} workers",
            enqueued,
            total,
            skipped,
            self.credentials.len()
        );

        let mut handles = Vec::with_capacity(self.credentials.len());
        for (index, credential) in self.credentials.iter().enumerate() {
            let worker = Worker::new(
                index + 1,
                self.client.clone(),
                credential.clone(),
                RateLimiter::new(self.fetch_interval),
                Arc::clone(&self.queue),
                Arc::clone(&self.store),
                self.artifacts.clone(),
                self.base_url.clone(),
                Arc::clone(&self.stop),
            );
            handles.push(tokio::spawn(worker.run()));
        }

        let mut stats = WorkerStats::default();
        for handle in handles {
            let worker_stats = handle
                .await
                .map_err(|e| HarvestError::Worker(e.to_string()))?;
            stats.merge(worker_stats);
        }

        if self.stop.load(Ordering::Relaxed) && !self.queue.is_empty() {
            tracing::warn!(
                "Stopped early with {} records still pending; they remain eligible for the next run",
                self.queue.len()
            );
        }

        // The persist is what makes the run resumable; its failure must
        // reach the caller.
        self.store.persist()?;

        Ok(CrawlReport {
            enqueued,
            skipped,
            stats,
            store_size: self.store.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, HarvesterConfig, OutputConfig};
    use crate::crawler::fetcher::build_http_client;
    use tempfile::TempDir;

    fn create_test_config(dir: &TempDir) -> Config {
        let root = dir.path();
        Config {
            api: ApiConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                page_size: 10,
                list_interval: 0,
                request_timeout: 1,
            },
            harvester: HarvesterConfig {
                fetch_interval: 0,
                credentials: vec!["token-a".to_string(), "token-b".to_string()],
                max_items: None,
                min_likes: None,
                min_downloads: None,
            },
            output: OutputConfig {
                results_path: root.join("results.json").display().to_string(),
                artifact_dir: root.join("readmes").display().to_string(),
                metadata_dir: root.join("metadata").display().to_string(),
                summary_path: root.join("summary.md").display().to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_empty_run_persists_an_empty_store() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir);
        let client = build_http_client(config.api.request_timeout).unwrap();

        let coordinator = CrawlCoordinator::new(&config, client).unwrap();
        let report = coordinator.run(Vec::new()).await.unwrap();

        assert_eq!(report.enqueued, 0);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.stats.processed, 0);
        assert_eq!(report.store_size, 0);

        // Final persist ran even though there was nothing to do
        let persisted = std::fs::read_to_string(dir.path().join("results.json")).unwrap();
        assert_eq!(persisted.trim(), "{}");
    }

    #[tokio::test]
    async fn test_pool_size_matches_credentials() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir);
        let client = build_http_client(config.api.request_timeout).unwrap();

        let coordinator = CrawlCoordinator::new(&config, client).unwrap();
        assert_eq!(coordinator.credentials.len(), 2);
    }
}
