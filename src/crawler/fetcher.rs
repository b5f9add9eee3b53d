//! HTTP fetching for per-item artifacts
//!
//! This module builds the shared HTTP client and classifies the transport
//! result of one artifact fetch. Classification is total: a worker never
//! sees an error from here, only a [`FetchOutcome`] it can record, so one
//! bad item cannot take down the pool.

use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of one artifact fetch, before the payload is saved
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx response with the artifact body
    Success {
        /// Artifact payload, treated as opaque text
        body: String,
    },

    /// The catalog answered 404 for this item
    NotFound,

    /// Any other status, timeout, or transport failure
    Error {
        /// Diagnostic text recorded with the item
        message: String,
    },
}

/// Builds the HTTP client shared by the paginator and all workers
///
/// Both timeouts are load-bearing: a fetch with no deadline can stall a
/// worker indefinitely and hold up pool drain.
///
/// # Arguments
///
/// * `request_timeout` - Whole-request deadline in seconds
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(request_timeout: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("hub-harvest/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one artifact with bearer-token authentication
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - Fully resolved artifact URL
/// * `token` - Bearer token for this worker's credential
pub async fn fetch_artifact(client: &Client, url: &str, token: &str) -> FetchOutcome {
    match client.get(url).bearer_auth(token).send().await {
        Ok(response) => {
            let status = response.status();

            if status == StatusCode::NOT_FOUND {
                return FetchOutcome::NotFound;
            }

            if !status.is_success() {
                return FetchOutcome::Error {
                    message: format!("HTTP {} from {}", status, url),
                };
            }

            match response.text().await {
                Ok(body) => FetchOutcome::Success { body },
                Err(e) => FetchOutcome::Error {
                    message: format!("failed to read body from {}: {}", url, e),
                },
            }
        }
        Err(e) => {
            // Classify error
            if e.is_timeout() {
                FetchOutcome::Error {
                    message: format!("request timeout for {}", url),
                }
            } else if e.is_connect() {
                FetchOutcome::Error {
                    message: format!("connection failed for {}", url),
                }
            } else {
                FetchOutcome::Error {
                    message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(30);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_success_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/org/model/raw/main/README.md"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# hello"))
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let url = format!("{}/org/model/raw/main/README.md", server.uri());
        let outcome = fetch_artifact(&client, &url, "secret-token").await;

        match outcome {
            FetchOutcome::Success { body } => assert_eq!(body, "# hello"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_artifact_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let url = format!("{}/gone/model/raw/main/README.md", server.uri());
        assert!(matches!(
            fetch_artifact(&client, &url, "t").await,
            FetchOutcome::NotFound
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_classified_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let url = format!("{}/x/y/raw/main/README.md", server.uri());
        match fetch_artifact(&client, &url, "t").await {
            FetchOutcome::Error { message } => assert!(message.contains("503")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_yields_error_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = build_http_client(1).unwrap();
        let url = format!("{}/slow/model/raw/main/README.md", server.uri());
        match fetch_artifact(&client, &url, "t").await {
            FetchOutcome::Error { message } => assert!(!message.is_empty()),
            other => panic!("expected error, got {:?}", other),
        }
    }
}
