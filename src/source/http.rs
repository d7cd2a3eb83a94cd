//! HTTP source for the dashboard's `/update_data` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{MetricsSnapshot, SnapshotSource};
use crate::error::PollFailure;

/// Default dashboard address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Path of the metrics endpoint.
pub const DEFAULT_ENDPOINT: &str = "/update_data";

/// Fetches snapshots with `GET {base_url}{endpoint}`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
    description: String,
}

impl HttpSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    /// Full URL being polled.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<MetricsSnapshot, PollFailure> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(PollFailure::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        debug!(url = %self.url, bytes = body.len(), "received snapshot");
        MetricsSnapshot::from_slice(&body)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpSource`].
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    base_url: Option<String>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpSourceBuilder {
    /// Set the dashboard address (e.g., "http://127.0.0.1:5000").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the endpoint path (default: "/update_data").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a request timeout. Without one, reqwest's default applies.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the source.
    pub fn build(self) -> Result<HttpSource, PollFailure> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let url = join_url(&base_url, &endpoint);
        let description = format!("http: {}", url);

        Ok(HttpSource {
            client,
            url,
            description,
        })
    }
}

// Join base and path with exactly one slash between them
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
