//! The durable result store
//!
//! Maps item identifiers to the classified outcome of their last fetch.
//! The store is loaded wholesale at startup, mutated under an internal lock
//! by concurrent workers, and persisted wholesale at the end of a run. An
//! item with a `Success` or `NotFound` entry is complete and is skipped by
//! later runs; an `Error` entry marks the item as eligible for retry on the
//! next run.

use crate::storage::{StorageError, StorageResult};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// Marker string persisted for items whose artifact does not exist.
///
/// Kept byte-for-byte compatible with result files written by earlier
/// collection jobs so their state remains resumable.
const NOT_FOUND_MARKER: &str = "Failed to download";

/// Classified result of fetching one item's artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Artifact fetched and saved at this path
    Success(String),

    /// The catalog has no artifact for this item
    NotFound,

    /// Retriable failure; the item is re-attempted on the next run
    Error(String),
}

impl CrawlOutcome {
    /// Whether this outcome is terminal for resume purposes
    pub fn is_complete(&self) -> bool {
        matches!(self, CrawlOutcome::Success(_) | CrawlOutcome::NotFound)
    }
}

// The on-disk shape predates this crate: Success is a bare path string,
// NotFound is the marker string, Error is {"error": "..."}.
impl Serialize for CrawlOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CrawlOutcome::Success(path) => serializer.serialize_str(path),
            CrawlOutcome::NotFound => serializer.serialize_str(NOT_FOUND_MARKER),
            CrawlOutcome::Error(message) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for CrawlOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(s) if s == NOT_FOUND_MARKER => Ok(CrawlOutcome::NotFound),
            Value::String(s) => Ok(CrawlOutcome::Success(s)),
            Value::Object(map) => match map.get("error").and_then(Value::as_str) {
                Some(message) => Ok(CrawlOutcome::Error(message.to_string())),
                None => Err(de::Error::custom("outcome object has no \"error\" field")),
            },
            other => Err(de::Error::custom(format!(
                "unsupported outcome value: {}",
                other
            ))),
        }
    }
}

/// Durable, idempotent mapping from item identifier to [`CrawlOutcome`]
///
/// All map access goes through `record`/`snapshot`/`contains_complete`;
/// the internal map is never handed out, so there are no unsynchronized
/// reads. The lock guards only in-memory map operations, never I/O.
pub struct ResultStore {
    path: PathBuf,
    results: Mutex<HashMap<String, CrawlOutcome>>,
}

impl ResultStore {
    /// Opens the result store backing file, loading any prior outcomes
    ///
    /// A missing file is not an error; it yields an empty store.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON result file
    ///
    /// # Returns
    ///
    /// * `Ok(ResultStore)` - Store with all previously recorded outcomes
    /// * `Err(StorageError)` - File exists but cannot be read or parsed
    pub fn load(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        let results: HashMap<String, CrawlOutcome> = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };

        if !results.is_empty() {
            tracing::info!(
                "Loaded {} prior outcomes from {}",
                results.len(),
                path.display()
            );
        }

        Ok(Self {
            path,
            results: Mutex::new(results),
        })
    }

    /// Whether the identifier already has a terminal (non-retriable) outcome
    pub fn contains_complete(&self, id: &str) -> bool {
        self.results
            .lock()
            .expect("result store lock poisoned")
            .get(id)
            .map(CrawlOutcome::is_complete)
            .unwrap_or(false)
    }

    /// Records the outcome for one item
    ///
    /// Called by workers under concurrent access; the write is linearized
    /// by the store's lock. A later record for the same identifier
    /// overwrites the earlier one.
    pub fn record(&self, id: &str, outcome: CrawlOutcome) {
        self.results
            .lock()
            .expect("result store lock poisoned")
            .insert(id.to_string(), outcome);
    }

    /// Returns a copy of the full identifier → outcome mapping
    pub fn snapshot(&self) -> HashMap<String, CrawlOutcome> {
        self.results
            .lock()
            .expect("result store lock poisoned")
            .clone()
    }

    /// Persists the current mapping to the backing file
    ///
    /// The snapshot is written to a temp file and renamed into place so a
    /// crash mid-write never leaves a truncated store behind.
    pub fn persist(&self) -> StorageResult<()> {
        let snapshot = self.snapshot();
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::info!(
            "Persisted {} outcomes to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Number of recorded outcomes
    pub fn len(&self) -> usize {
        self.results
            .lock()
            .expect("result store lock poisoned")
            .len()
    }

    /// Whether the store has no recorded outcomes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
