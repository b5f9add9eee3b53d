//! Outcome statistics over the persisted result store
//!
//! Backs the `--stats` mode: load the result file from a previous run and
//! report how much of the catalog is done, missing, or still retriable.

use crate::storage::{CrawlOutcome, ResultStore, StorageResult};
use std::path::Path;

/// Counts of recorded outcomes by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeStats {
    pub total: usize,
    pub succeeded: usize,
    pub not_found: usize,
    pub errored: usize,
}

/// Loads outcome counts from a persisted result store
pub fn load_outcome_stats(path: &Path) -> StorageResult<OutcomeStats> {
    let store = ResultStore::load(path)?;

    let mut stats = OutcomeStats::default();
    for outcome in store.snapshot().values() {
        stats.total += 1;
        match outcome {
            CrawlOutcome::Success(_) => stats.succeeded += 1,
            CrawlOutcome::NotFound => stats.not_found += 1,
            CrawlOutcome::Error(_) => stats.errored += 1,
        }
    }

    Ok(stats)
}

/// Prints outcome statistics to stdout
pub fn print_outcome_stats(stats: &OutcomeStats) {
    println!("Recorded outcomes: {}", stats.total);
    println!("  Succeeded:  {}", stats.succeeded);
    println!("  Not found:  {}", stats.not_found);
    println!("  Retriable:  {}", stats.errored);

    if stats.errored > 0 {
        println!(
            "\n{} item(s) will be retried on the next harvest run",
            stats.errored
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stats_over_mixed_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");

        let store = ResultStore::load(&path).unwrap();
        store.record("a", CrawlOutcome::Success("readmes/a.md".into()));
        store.record("b", CrawlOutcome::Success("readmes/b.md".into()));
        store.record("c", CrawlOutcome::NotFound);
        store.record("d", CrawlOutcome::Error("HTTP 500".into()));
        store.persist().unwrap();

        let stats = load_outcome_stats(&path).unwrap();
        assert_eq!(
            stats,
            OutcomeStats {
                total: 4,
                succeeded: 2,
                not_found: 1,
                errored: 1,
            }
        );
    }

    #[test]
    fn test_stats_over_missing_store_are_zero() {
        let dir = TempDir::new().unwrap();
        let stats = load_outcome_stats(&dir.path().join("absent.json")).unwrap();
        assert_eq!(stats, OutcomeStats::default());
    }
}
