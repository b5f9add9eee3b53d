//! Markdown run summary
//!
//! A short human-readable report written at the end of every harvest run,
//! next to the machine-readable result store.

use crate::output::OutputResult;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Totals and timestamps for one completed harvest run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Records the catalog listing returned
    pub listed: usize,

    /// Records that survived popularity filters and the item cap
    pub selected: usize,

    /// Records skipped because a prior run already completed them
    pub skipped: usize,

    /// Records put on the queue this run
    pub enqueued: usize,

    /// Records the worker pool processed to an outcome
    pub processed: usize,

    pub succeeded: usize,
    pub not_found: usize,
    pub failed: usize,

    /// Result store size after the final persist
    pub store_size: usize,
}

/// Writes the markdown run summary
pub fn write_run_summary(summary: &RunSummary, path: &Path) -> OutputResult<()> {
    let markdown = format_run_summary(summary);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_run_summary(summary: &RunSummary) -> String {
    let duration = (summary.finished_at - summary.started_at)
        .to_std()
        .unwrap_or_default();

    let mut md = String::new();

    md.push_str("# Harvest Run Summary\n\n");

    md.push_str("## Run\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Duration**: {:.1}s\n", duration.as_secs_f64()));

    md.push_str("\n## Catalog\n\n");
    md.push_str(&format!("- **Listed**: {}\n", summary.listed));
    md.push_str(&format!("- **Selected**: {}\n", summary.selected));
    md.push_str(&format!(
        "- **Skipped (already complete)**: {}\n",
        summary.skipped
    ));
    md.push_str(&format!("- **Enqueued**: {}\n", summary.enqueued));

    md.push_str("\n## Outcomes\n\n");
    md.push_str(&format!("- **Processed**: {}\n", summary.processed));
    md.push_str(&format!("- **Succeeded**: {}\n", summary.succeeded));
    md.push_str(&format!("- **Not found**: {}\n", summary.not_found));
    md.push_str(&format!("- **Errors (retriable)**: {}\n", summary.failed));
    md.push_str(&format!(
        "\nResult store now holds {} outcomes.\n",
        summary.store_size
    ));

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_summary() -> RunSummary {
        let started_at = Utc::now();
        RunSummary {
            started_at,
            finished_at: started_at + chrono::Duration::seconds(90),
            listed: 24,
            selected: 20,
            skipped: 5,
            enqueued: 15,
            processed: 15,
            succeeded: 12,
            not_found: 2,
            failed: 1,
            store_size: 20,
        }
    }

    #[test]
    fn test_format_contains_all_counters() {
        let md = format_run_summary(&create_test_summary());

        assert!(md.contains("**Listed**: 24"));
        assert!(md.contains("**Selected**: 20"));
        assert!(md.contains("**Skipped (already complete)**: 5"));
        assert!(md.contains("**Processed**: 15"));
        assert!(md.contains("**Succeeded**: 12"));
        assert!(md.contains("**Not found**: 2"));
        assert!(md.contains("**Errors (retriable)**: 1"));
        assert!(md.contains("20 outcomes"));
    }

    #[test]
    fn test_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("summary.md");

        write_run_summary(&create_test_summary(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Harvest Run Summary"));
    }
}
