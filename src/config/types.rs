use serde::Deserialize;

/// Main configuration structure for Hub-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub harvester: HarvesterConfig,
    pub output: OutputConfig,
}

/// Catalog API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the catalog, without a trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of records requested per listing page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Politeness delay between listing page requests (milliseconds)
    #[serde(rename = "list-interval")]
    pub list_interval: u64,

    /// Per-request timeout for all outbound HTTP (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,
}

/// Artifact harvesting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvesterConfig {
    /// Minimum delay between fetches on one credential (milliseconds)
    #[serde(rename = "fetch-interval")]
    pub fetch_interval: u64,

    /// Bearer tokens; one worker is spawned per token
    pub credentials: Vec<String>,

    /// Optional cap on how many records are harvested per run
    #[serde(rename = "max-items", default)]
    pub max_items: Option<usize>,

    /// Only harvest records with at least this many likes
    #[serde(rename = "min-likes", default)]
    pub min_likes: Option<u64>,

    /// Only harvest records with at least this many downloads
    #[serde(rename = "min-downloads", default)]
    pub min_downloads: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON result store
    #[serde(rename = "results-path")]
    pub results_path: String,

    /// Directory where fetched README artifacts are written
    #[serde(rename = "artifact-dir")]
    pub artifact_dir: String,

    /// Directory where dated catalog metadata snapshots are written
    #[serde(rename = "metadata-dir")]
    pub metadata_dir: String,

    /// Path to the markdown run summary
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}
