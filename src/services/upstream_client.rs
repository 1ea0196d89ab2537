//! Hardened HTTP client for upstream provider calls.
//!
//! This module provides a configurable HTTP client that implements:
//! - Bounded per-call timeouts so no upstream call can block a request forever
//! - Capped exponential backoff with jitter for transient upstream failures
//! - Structured logging of every upstream call
//!
//! Retries are a hardening layer only; callers still inspect the returned
//! status code and apply their own success/failure policy.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::{error, info, warn};

/// Configuration for the upstream HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamClientConfig {
    /// Timeout for a single request attempt (in seconds)
    pub timeout_seconds: u64,

    /// Connection timeout (in seconds)
    pub connect_timeout_seconds: u64,

    /// Retry configuration
    pub retry: RetryConfig,

    /// Enable detailed logging
    pub enable_detailed_logging: bool,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_attempts: usize,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,

    /// Retry on these HTTP status codes
    pub retry_on_status: Vec<u16>,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            connect_timeout_seconds: 3,
            retry: RetryConfig::default(),
            enable_detailed_logging: true,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay_ms: 100,
            max_delay_ms: 2000,
            retry_on_status: vec![408, 429, 502, 503, 504],
        }
    }
}

/// Upstream HTTP client with timeouts and capped retry
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    config: UpstreamClientConfig,
}

impl UpstreamClient {
    /// Create a new upstream HTTP client
    pub fn new(config: UpstreamClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    /// Execute an HTTP GET request with timeout and retry
    ///
    /// A response with a non-retryable status is returned to the caller
    /// untouched; only transient statuses and transport errors are retried.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, UpstreamClientError> {
        let destination = extract_destination(url);
        let timeout = Duration::from_secs(self.config.timeout_seconds);

        // Retry strategy with exponential backoff and jitter
        let retry_strategy = ExponentialBackoff::from_millis(self.config.retry.initial_delay_ms)
            .max_delay(Duration::from_millis(self.config.retry.max_delay_ms))
            .map(tokio_retry::strategy::jitter)
            .take(self.config.retry.max_attempts);

        let client = self.client.clone();
        let config = self.config.clone();
        let url = url.to_string();

        Retry::spawn(retry_strategy, || {
            let client = client.clone();
            let url = url.clone();
            let destination = destination.clone();
            let config = config.clone();

            async move {
                let start = std::time::Instant::now();
                let result = tokio::time::timeout(timeout, client.get(&url).send()).await;

                match result {
                    Ok(Ok(response)) => {
                        let duration = start.elapsed();
                        let status = response.status().as_u16();

                        if is_retry_status(status, &config.retry.retry_on_status) {
                            if config.enable_detailed_logging {
                                warn!(
                                    destination = %destination,
                                    status = status,
                                    duration_ms = duration.as_millis(),
                                    "Upstream request failed with retryable status"
                                );
                            }
                            Err(UpstreamClientError::RetryableStatus(status))
                        } else {
                            if config.enable_detailed_logging {
                                info!(
                                    destination = %destination,
                                    status = status,
                                    duration_ms = duration.as_millis(),
                                    "Upstream request completed"
                                );
                            }
                            Ok(response)
                        }
                    }
                    Ok(Err(e)) => {
                        if config.enable_detailed_logging {
                            error!(
                                destination = %destination,
                                error = %e,
                                duration_ms = start.elapsed().as_millis(),
                                "Upstream request failed with network error"
                            );
                        }
                        Err(UpstreamClientError::NetworkError(e))
                    }
                    Err(_) => {
                        if config.enable_detailed_logging {
                            warn!(
                                destination = %destination,
                                timeout_seconds = timeout.as_secs(),
                                "Upstream request timed out"
                            );
                        }
                        Err(UpstreamClientError::Timeout)
                    }
                }
            }
        })
        .await
    }
}

/// Extract destination (host) from URL for log labeling
fn extract_destination(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "invalid_url".to_string())
}

/// Check if status code should trigger a retry
fn is_retry_status(status: u16, retry_statuses: &[u16]) -> bool {
    retry_statuses.contains(&status)
}

/// Errors that can occur in the upstream client
#[derive(Debug, thiserror::Error)]
pub enum UpstreamClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Retryable status code: {0}")]
    RetryableStatus(u16),
}

impl UpstreamClientError {
    /// Get a user-friendly error message for API responses
    pub fn user_message(&self) -> String {
        match self {
            UpstreamClientError::NetworkError(_) => {
                "provider temporarily unavailable due to network issues".to_string()
            }
            UpstreamClientError::Timeout => {
                "provider temporarily unavailable due to timeout".to_string()
            }
            UpstreamClientError::RetryableStatus(status) => {
                format!("provider returned error status {status}, please try again")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = UpstreamClientConfig::default();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.connect_timeout_seconds, 3);
        assert_eq!(config.retry.max_attempts, 2);
        assert!(config.enable_detailed_logging);
    }

    #[test]
    fn test_extract_destination() {
        assert_eq!(
            extract_destination("https://api.openweathermap.org/geo/1.0/direct?q=Paris"),
            "api.openweathermap.org"
        );
        assert_eq!(extract_destination("invalid_url"), "invalid_url");
    }

    #[test]
    fn test_retry_status() {
        let retry_statuses = vec![408, 429, 502, 503, 504];
        assert!(is_retry_status(429, &retry_statuses));
        assert!(is_retry_status(503, &retry_statuses));
        assert!(!is_retry_status(401, &retry_statuses));
        assert!(!is_retry_status(404, &retry_statuses));
        assert!(!is_retry_status(200, &retry_statuses));
    }

    #[test]
    fn test_error_user_messages() {
        let timeout_error = UpstreamClientError::Timeout;
        assert!(timeout_error.user_message().contains("timeout"));

        let status_error = UpstreamClientError::RetryableStatus(503);
        assert!(status_error.user_message().contains("503"));
    }
}
