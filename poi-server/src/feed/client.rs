//! HTTP client for the restaurant, station, bus stop and timetable feeds.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::error::FeedError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source of JSON documents, addressed by path and query parameters.
///
/// This abstraction allows the engine to be tested without a server.
pub trait JsonSource {
    /// Fetch the document at `path` (e.g. `/stations`).
    ///
    /// Fails when the transport reports a non-success status, carrying the
    /// status and response body.
    fn fetch_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> impl Future<Output = Result<Value, FeedError>> + Send;
}

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL the feed paths are appended to
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Feed client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFeedClient {
    /// Create a new feed client.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| FeedError::Http {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl JsonSource for HttpFeedClient {
    async fn fetch_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, FeedError> {
        let url = self.url(path);
        debug!(%url, ?query, "fetching feed");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| FeedError::Http {
                url: url.clone(),
                source,
            })?;

        // Report the full URL including the encoded query.
        let url = response.url().to_string();
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|source| FeedError::Http {
            url: url.clone(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|e| FeedError::Json {
            url,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = FeedConfig::new("http://localhost:8000");
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn config_builder() {
        let config = FeedConfig::new("http://a")
            .with_base_url("http://b")
            .with_timeout(5);
        assert_eq!(config.base_url, "http://b");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn joins_paths_without_double_slash() {
        let client = HttpFeedClient::new(FeedConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(client.url("/stations"), "http://localhost:8000/stations");
        assert_eq!(client.url("bus_stops"), "http://localhost:8000/bus_stops");
    }
}
