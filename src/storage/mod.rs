//! Storage module for durable harvest state
//!
//! This module handles everything the harvester writes to disk:
//! - The JSON result store that makes interrupted runs resumable
//! - Saved README artifacts, one file per successfully fetched item

mod artifacts;
mod results;

pub use artifacts::{safe_file_name, ArtifactStore};
pub use results::{CrawlOutcome, ResultStore};

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt result store at {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Identifier {0:?} cannot be mapped to a file name")]
    InvalidIdentifier(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
