//! Catalog listing pagination
//!
//! This module walks the catalog's listing endpoint to completeness by
//! following the `Link: <...>; rel="next"` header from page to page,
//! accumulating every model record the API exposes. Listing failures abort
//! the whole walk: without the complete item universe a harvest run cannot
//! know what to fetch, so retry policy belongs to the caller.

use crate::HarvestError;
use reqwest::header::LINK;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// One model record from the catalog listing
///
/// The identifier is the only field the harvester interprets; the
/// popularity counters are carried through for selection and sorting, and
/// everything else rides along opaquely in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Globally unique identifier within the catalog (e.g. `org/model`)
    #[serde(rename = "modelId")]
    pub id: String,

    /// Download count, if the listing exposes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,

    /// Like count, if the listing exposes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,

    /// Remaining listing fields, preserved verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Cursor-following paginator over the catalog listing endpoint
pub struct Paginator {
    client: Client,
    base_url: String,
    page_size: u32,
    interval: Duration,
}

impl Paginator {
    /// Creates a paginator against the given catalog
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to issue listing requests with
    /// * `base_url` - Catalog base URL without a trailing slash
    /// * `page_size` - Records requested per page
    /// * `interval` - Politeness delay between page requests
    pub fn new(client: Client, base_url: impl Into<String>, page_size: u32, interval: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            page_size,
            interval,
        }
    }

    /// Lists every model record the catalog exposes
    ///
    /// Follows the server-supplied next cursor until it is absent. The
    /// returned sequence is complete or the call fails; there is no
    /// partial-success mode at this level.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ModelRecord>)` - All records, in listing order
    /// * `Err(HarvestError::Listing)` - Non-2xx status or malformed body
    pub async fn list_all(&self) -> Result<Vec<ModelRecord>, HarvestError> {
        let mut records = Vec::new();
        let mut cursor = Some(format!("/api/models?limit={}", self.page_size));
        let mut pages = 0u32;

        while let Some(path) = cursor.take() {
            let url = format!("{}{}", self.base_url, path);
            tracing::debug!("Listing page {}: {}", pages + 1, url);

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| listing_error(&url, e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(listing_error(&url, format!("HTTP {}", status)));
            }

            // The Link header must be read before the body consumes the response.
            let next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_next_link)
                .map(|link| strip_base(&link, &self.base_url));

            let body = response
                .text()
                .await
                .map_err(|e| listing_error(&url, e.to_string()))?;

            let page: Vec<ModelRecord> = serde_json::from_str(&body)
                .map_err(|e| listing_error(&url, format!("malformed listing body: {}", e)))?;

            pages += 1;
            if page.is_empty() {
                break;
            }

            records.extend(page);
            tracing::info!("Retrieved {} records after {} pages", records.len(), pages);

            cursor = next;
            if cursor.is_some() {
                tokio::time::sleep(self.interval).await;
            }
        }

        Ok(records)
    }
}

fn listing_error(url: &str, message: String) -> HarvestError {
    HarvestError::Listing {
        url: url.to_string(),
        message,
    }
}

/// Extracts the `rel="next"` target from a Link header value
pub(crate) fn parse_next_link(header: &str) -> Option<String> {
    for part in header.split(',') {
        let mut pieces = part.split(';');
        let target = pieces.next().unwrap_or("").trim();

        if !(target.starts_with('<') && target.ends_with('>')) {
            continue;
        }

        let is_next = pieces.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });

        if is_next {
            return Some(target[1..target.len() - 1].to_string());
        }
    }
    None
}

/// Reduces an absolute next-page link to a cursor relative to the base URL
pub(crate) fn strip_base(link: &str, base_url: &str) -> String {
    if let Some(rest) = link.strip_prefix(base_url) {
        return rest.to_string();
    }

    match Url::parse(link) {
        Ok(url) => {
            let mut cursor = url.path().to_string();
            if let Some(query) = url.query() {
                cursor.push('?');
                cursor.push_str(query);
            }
            cursor
        }
        // Already relative
        Err(_) => link.to_string(),
    }
}
