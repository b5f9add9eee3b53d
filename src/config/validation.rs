use crate::config::types::{ApiConfig, Config, HarvesterConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_harvester_config(&config.harvester)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates catalog API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    // Pagination cursors are appended verbatim, so a trailing slash would
    // produce double-slash request paths.
    if config.base_url.ends_with('/') {
        return Err(ConfigError::Validation(
            "base-url must not end with '/'".to_string(),
        ));
    }

    if config.page_size < 1 || config.page_size > 10_000 {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 10000, got {}",
            config.page_size
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request-timeout must be >= 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates harvester configuration
fn validate_harvester_config(config: &HarvesterConfig) -> Result<(), ConfigError> {
    if config.credentials.is_empty() {
        return Err(ConfigError::Validation(
            "at least one credential is required".to_string(),
        ));
    }

    if config.credentials.iter().any(|token| token.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "credentials must not contain empty tokens".to_string(),
        ));
    }

    if let Some(0) = config.max_items {
        return Err(ConfigError::Validation(
            "max-items must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("results-path", &config.results_path),
        ("artifact-dir", &config.artifact_dir),
        ("metadata-dir", &config.metadata_dir),
        ("summary-path", &config.summary_path),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}
