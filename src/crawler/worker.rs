//! Harvest worker
//!
//! A worker loops `dequeue → wait → fetch → classify → record` until the
//! shared queue drains. Every per-item failure is converted into a
//! [`CrawlOutcome`] and recorded; nothing an individual item does can abort
//! the pool. Each worker exclusively owns one credential and its rate
//! limiter for the lifetime of the run.

use crate::crawler::fetcher::{fetch_artifact, FetchOutcome};
use crate::crawler::limiter::RateLimiter;
use crate::crawler::paginator::ModelRecord;
use crate::crawler::queue::WorkQueue;
use crate::storage::{ArtifactStore, CrawlOutcome, ResultStore};
use reqwest::Client;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One bearer token driving one worker's fetch stream
#[derive(Clone)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Tokens must never reach logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Per-worker outcome counters, merged by the coordinator after drain
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkerStats {
    pub processed: usize,
    pub succeeded: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl WorkerStats {
    pub fn merge(&mut self, other: WorkerStats) {
        self.processed += other.processed;
        self.succeeded += other.succeeded;
        self.not_found += other.not_found;
        self.failed += other.failed;
    }
}

/// One unit of concurrent execution in the harvest pool
pub struct Worker {
    id: usize,
    client: Client,
    credential: Credential,
    limiter: RateLimiter,
    queue: Arc<WorkQueue>,
    store: Arc<ResultStore>,
    artifacts: ArtifactStore,
    base_url: String,
    stop: Arc<AtomicBool>,
}

impl Worker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        client: Client,
        credential: Credential,
        limiter: RateLimiter,
        queue: Arc<WorkQueue>,
        store: Arc<ResultStore>,
        artifacts: ArtifactStore,
        base_url: String,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            id,
            client,
            credential,
            limiter,
            queue,
            store,
            artifacts,
            base_url,
            stop,
        }
    }

    /// Runs until the queue drains or a shutdown is requested
    pub async fn run(mut self) -> WorkerStats {
        let mut stats = WorkerStats::default();

        loop {
            if self.stop.load(Ordering::Relaxed) {
                tracing::info!("Worker {} stopping on shutdown request", self.id);
                break;
            }

            let Some(record) = self.queue.dequeue() else {
                break;
            };

            self.limiter.wait().await;

            tracing::debug!("Worker {} fetching {}", self.id, record.id);
            let outcome = self.process(&record).await;

            match &outcome {
                CrawlOutcome::Success(path) => {
                    stats.succeeded += 1;
                    tracing::debug!("Worker {} saved {} to {}", self.id, record.id, path);
                }
                CrawlOutcome::NotFound => {
                    stats.not_found += 1;
                    tracing::debug!("Worker {} found no artifact for {}", self.id, record.id);
                }
                CrawlOutcome::Error(message) => {
                    stats.failed += 1;
                    tracing::warn!("Worker {} error for {}: {}", self.id, record.id, message);
                }
            }

            self.store.record(&record.id, outcome);
            stats.processed += 1;
        }

        tracing::info!(
            "Worker {} done: {} processed ({} ok, {} missing, {} errors)",
            self.id,
            stats.processed,
            stats.succeeded,
            stats.not_found,
            stats.failed
        );
        stats
    }

    /// Fetches one item's artifact and classifies the result
    async fn process(&self, record: &ModelRecord) -> CrawlOutcome {
        let url = artifact_url(&self.base_url, &record.id);

        match fetch_artifact(&self.client, &url, self.credential.token()).await {
            FetchOutcome::Success { body } => match self.artifacts.save(&record.id, &body).await {
                Ok(path) => CrawlOutcome::Success(path.to_string_lossy().into_owned()),
                // Keep the item retriable rather than losing the payload silently
                Err(e) => CrawlOutcome::Error(format!("artifact write failed: {}", e)),
            },
            FetchOutcome::NotFound => CrawlOutcome::NotFound,
            FetchOutcome::Error { message } => CrawlOutcome::Error(message),
        }
    }
}

/// Builds the artifact URL for one item identifier
pub(crate) fn artifact_url(base_url: &str, id: &str) -> String {
    format!("{}/{}/raw/main/README.md", base_url, id)
}
