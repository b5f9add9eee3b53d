//! Dated catalog metadata snapshots
//!
//! Every harvest writes the complete listing it saw, so downstream
//! extraction and filtering steps can work from a stable file instead of
//! re-walking the API.

use crate::crawler::ModelRecord;
use crate::output::OutputResult;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Writes the full model listing as pretty JSON under a dated name
///
/// The file name carries the capture date and record count, e.g.
/// `2026-08-06_models_41237.json`.
///
/// # Arguments
///
/// * `dir` - Snapshot directory, created on demand
/// * `records` - Everything the listing returned
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the snapshot just written
/// * `Err(OutputError)` - Directory or file could not be written
pub fn write_metadata_snapshot(dir: &Path, records: &[ModelRecord]) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let name = format!(
        "{}_models_{}.json",
        Utc::now().format("%Y-%m-%d"),
        records.len()
    );
    let path = dir.join(name);

    let bytes = serde_json::to_vec_pretty(records)?;
    std::fs::write(&path, bytes)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_round_trips_records() {
        let dir = TempDir::new().unwrap();
        let records = vec![ModelRecord {
            id: "org/model".to_string(),
            downloads: Some(12),
            likes: Some(3),
            extra: serde_json::Map::new(),
        }];

        let path = write_metadata_snapshot(dir.path(), &records).unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap().ends_with("_models_1.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<ModelRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "org/model");
    }

    #[test]
    fn test_snapshot_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = write_metadata_snapshot(&nested, &[]).unwrap();
        assert!(path.exists());
    }
}
