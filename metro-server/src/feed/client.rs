//! Metro API HTTP client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, info};

use crate::schedule::FeedSnapshot;

use super::FeedProvider;
use super::convert::convert_response;
use super::error::FeedError;
use super::types::MetroResponse;

/// Default URL of the metro API's combined endpoint.
pub const DEFAULT_FEED_URL: &str = "http://metro.witharts.kz/metro/api/0/all";

/// Header value the upstream mobile app identifies itself with.
const APP_REQUESTED_WITH: &str = "com.witharts.metro";

/// Configuration for the metro API client.
#[derive(Debug, Clone)]
pub struct MetroClientConfig {
    /// URL of the combined stations/holidays endpoint
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MetroClientConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom URL (for testing).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for MetroClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the metro API.
#[derive(Debug, Clone)]
pub struct MetroClient {
    http: reqwest::Client,
    url: String,
}

impl MetroClient {
    /// Create a new metro API client.
    pub fn new(config: MetroClientConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// The endpoint this client fetches.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and convert the current feed.
    pub async fn fetch(&self) -> Result<FeedSnapshot, FeedError> {
        let body = self.get_body(HeaderMap::new()).await?;

        let response: MetroResponse =
            serde_json::from_str(&body).map_err(|e| FeedError::Json {
                message: e.to_string(),
            })?;

        info!(
            stations = response.stations.len(),
            holidays = response.holidays.len(),
            "fetched metro feed"
        );

        convert_response(&response)
    }

    /// Fetch the feed as the upstream app sees it, without conversion.
    pub async fn fetch_raw(&self) -> Result<serde_json::Value, FeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static(APP_REQUESTED_WITH),
        );

        let body = self.get_body(headers).await?;

        serde_json::from_str(&body).map_err(|e| FeedError::Json {
            message: e.to_string(),
        })
    }

    async fn get_body(&self, headers: HeaderMap) -> Result<String, FeedError> {
        debug!(url = %self.url, "requesting metro feed");

        let response = self.http.get(&self.url).headers(headers).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FeedError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FeedError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

impl FeedProvider for MetroClient {
    fn name(&self) -> &str {
        "metro-api"
    }

    async fn fetch(&self) -> Result<FeedSnapshot, FeedError> {
        MetroClient::fetch(self).await
    }
}
