//! Output module for run reports and catalog snapshots
//!
//! This module handles:
//! - The dated metadata snapshot of everything the listing returned
//! - The markdown run summary written after each harvest
//! - Outcome statistics over the persisted result store

mod snapshot;
mod stats;
mod summary;

pub use snapshot::write_metadata_snapshot;
pub use stats::{load_outcome_stats, print_outcome_stats, OutcomeStats};
pub use summary::{format_run_summary, write_run_summary, RunSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
