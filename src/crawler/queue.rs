//! Thread-safe pending-item queue
//!
//! The queue is filled once, before workers start, and only drains from
//! then on; there is no dynamic refill. Items that already have a terminal
//! outcome in the result store are never enqueued, which is what makes a
//! re-run resume instead of repeat.

use crate::crawler::paginator::ModelRecord;
use crate::storage::ResultStore;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One-shot work queue shared by all workers
pub struct WorkQueue {
    items: Mutex<VecDeque<ModelRecord>>,
}

impl WorkQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    /// Enqueues every record not already complete in the store
    ///
    /// Records with a `Success` or `NotFound` outcome are skipped; records
    /// with an `Error` outcome (or no entry at all) are enqueued, which is
    /// how errored items get retried on the next run.
    ///
    /// # Returns
    ///
    /// The number of records actually enqueued.
    pub fn enqueue_all(&self, records: Vec<ModelRecord>, store: &ResultStore) -> usize {
        let mut items = self.items.lock().expect("work queue lock poisoned");

        let before = items.len();
        for record in records {
            if store.contains_complete(&record.id) {
                tracing::debug!("Skipping {}: already complete", record.id);
                continue;
            }
            items.push_back(record);
        }

        items.len() - before
    }

    /// Takes the next pending record, if any
    ///
    /// Safe for concurrent callers; once the queue returns `None` it will
    /// never yield again.
    pub fn dequeue(&self) -> Option<ModelRecord> {
        self.items
            .lock()
            .expect("work queue lock poisoned")
            .pop_front()
    }

    /// Number of pending records
    pub fn len(&self) -> usize {
        self.items.lock().expect("work queue lock poisoned").len()
    }

    /// Whether the queue has drained
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CrawlOutcome;
    use tempfile::TempDir;

    fn record(id: &str) -> ModelRecord {
        ModelRecord {
            id: id.to_string(),
            downloads: None,
            likes: None,
            extra: serde_json::Map::new(),
        }
    }

    fn empty_store(dir: &TempDir) -> ResultStore {
        ResultStore::load(dir.path().join("results.json")).unwrap()
    }

    #[test]
    fn test_enqueue_and_dequeue_in_order() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir);
        let queue = WorkQueue::new();

        let enqueued = queue.enqueue_all(vec![record("a"), record("b")], &store);
        assert_eq!(enqueued, 2);

        assert_eq!(queue.dequeue().unwrap().id, "a");
        assert_eq!(queue.dequeue().unwrap().id, "b");
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_complete_items_are_skipped() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir);
        store.record("done", CrawlOutcome::Success("readmes/done.md".into()));
        store.record("missing", CrawlOutcome::NotFound);

        let queue = WorkQueue::new();
        let enqueued = queue.enqueue_all(
            vec![record("done"), record("missing"), record("fresh")],
            &store,
        );

        assert_eq!(enqueued, 1);
        assert_eq!(queue.dequeue().unwrap().id, "fresh");
    }

    #[test]
    fn test_errored_items_are_re_enqueued() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir);
        store.record("flaky", CrawlOutcome::Error("HTTP 500".into()));

        let queue = WorkQueue::new();
        let enqueued = queue.enqueue_all(vec![record("flaky")], &store);

        assert_eq!(enqueued, 1);
        assert_eq!(queue.dequeue().unwrap().id, "flaky");
    }

    #[test]
    fn test_second_enqueue_after_completion_adds_nothing() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir);
        let queue = WorkQueue::new();

        let items = vec![record("a"), record("b")];
        assert_eq!(queue.enqueue_all(items.clone(), &store), 2);

        // Simulate a full run completing everything
        while let Some(item) = queue.dequeue() {
            store.record(&item.id, CrawlOutcome::Success(format!("readmes/{}.md", item.id)));
        }

        assert_eq!(queue.enqueue_all(items, &store), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_concurrent_dequeue_hands_out_each_item_once() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir);
        let queue = Arc::new(WorkQueue::new());

        let records: Vec<ModelRecord> = (0..200).map(|i| record(&format!("m/{}", i))).collect();
        queue.enqueue_all(records, &store);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let queue = Arc::clone(&queue);
            handles.push(std::thread::spawn(move || {
                let mut seen = Vec::new();
                while let Some(item) = queue.dequeue() {
                    seen.push(item.id);
                }
                seen
            }));
        }

        let mut all: Vec<String> = Vec::new();
        for handle in handles {
            all.extend(handle.join().unwrap());
        }

        assert_eq!(all.len(), 200);
        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(unique.len(), 200);
    }
}
