//! Rate-limited HTTP client for the trade archive.

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::url::BASE_URL;

/// Configuration for the archive client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL of the trade archive.
    pub base_url: String,
    /// Delay applied before every request.
    ///
    /// The archive blocks clients that request too quickly, so this should
    /// stay at one second or more against the public endpoint.
    pub request_delay: Duration,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            request_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("tickfill/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur during downloads.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status other than 404.
    #[error("Server returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
}

/// HTTP client that throttles every request by a fixed delay.
///
/// Requests are issued one at a time; there are no retries.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
    config: ClientConfig,
}

impl ArchiveClient {
    /// Creates a new archive client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Checks whether a URL exists without downloading its body.
    ///
    /// Returns true only for a 200 response. Network failures, timeouts,
    /// and every other status resolve to false.
    pub async fn exists(&self, url: &str) -> bool {
        self.throttle().await;

        match self.client.head(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                debug!(url, status = response.status().as_u16(), "resource not found");
                false
            }
            Err(e) => {
                debug!(url, error = %e, "probe failed");
                false
            }
        }
    }

    /// Downloads a resource body.
    ///
    /// Returns `Ok(None)` if the resource does not exist (404).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server responds with
    /// any other non-success status.
    pub async fn download(&self, url: &str) -> Result<Option<Bytes>, DownloadError> {
        self.throttle().await;

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DownloadError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(Some(response.bytes().await?))
    }

    async fn throttle(&self) {
        if !self.config.request_delay.is_zero() {
            tokio::time::sleep(self.config.request_delay).await;
        }
    }
}
