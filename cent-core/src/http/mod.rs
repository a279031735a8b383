// HTTP transport for the server API
// All commands go through a single POST endpoint with apikey authorization.

use crate::error::{CentError, CentResult};
use async_trait::async_trait;
use tracing::debug;

pub use self::config::{HttpConfig, HttpConfigBuilder};

mod config;

/// Raw response handed back by a transport
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8 text, lossy on invalid bytes (diagnostics only)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport seam between the dispatcher and the network.
///
/// The production implementation is [`HttpTransport`]; tests substitute a
/// canned implementation to exercise the protocol layer without a socket.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit one serialized request body and return the raw response.
    ///
    /// Implementations fail with [`CentError::Transport`] when no response was
    /// received (connection refused, timeout); an HTTP-level error status is
    /// returned as a normal response for the caller to interpret.
    async fn send(&self, body: Vec<u8>) -> CentResult<TransportResponse>;
}

/// reqwest-backed transport POSTing to the configured API endpoint
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: HttpConfig, api_key: impl Into<String>) -> CentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|e| CentError::transport_with_source("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: Vec<u8>) -> CentResult<TransportResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("apikey {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CentError::transport_with_source("request timed out", e)
                } else if e.is_connect() {
                    CentError::transport_with_source("connection failed", e)
                } else {
                    CentError::transport_with_source("request failed", e)
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| CentError::transport_with_source("failed to read response body", e))?
            .to_vec();

        debug!(status, bytes = body.len(), "API response received");

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_status_range() {
        let ok = TransportResponse {
            status: 200,
            body: vec![],
        };
        assert!(ok.is_success());
        let not_found = TransportResponse {
            status: 404,
            body: b"not found".to_vec(),
        };
        assert!(!not_found.is_success());
        assert_eq!(not_found.text(), "not found");
    }
}
