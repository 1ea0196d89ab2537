//! Configuration for the upstream HTTP client
//!
//! Provides environment-based configuration for the hardened upstream HTTP
//! client with sensible defaults for production use.

use crate::services::upstream_client::{RetryConfig, UpstreamClientConfig};
use std::env;

impl UpstreamClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let timeout_seconds = env::var("UPSTREAM_CLIENT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let connect_timeout_seconds = env::var("UPSTREAM_CLIENT_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let enable_detailed_logging = env::var("UPSTREAM_CLIENT_DETAILED_LOGGING")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        Self {
            timeout_seconds,
            connect_timeout_seconds,
            retry: RetryConfig::from_env(),
            enable_detailed_logging,
        }
    }
}

impl RetryConfig {
    /// Load retry configuration from environment variables
    pub fn from_env() -> Self {
        let max_attempts = env::var("UPSTREAM_CLIENT_RETRY_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2);

        let initial_delay_ms = env::var("UPSTREAM_CLIENT_RETRY_INITIAL_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let max_delay_ms = env::var("UPSTREAM_CLIENT_RETRY_MAX_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2000);

        // Parse retry status codes from comma-separated values
        let retry_on_status = env::var("UPSTREAM_CLIENT_RETRY_ON_STATUS")
            .ok()
            .map(|v| {
                v.split(',')
                    .filter_map(|s| s.trim().parse::<u16>().ok())
                    .collect()
            })
            .unwrap_or_else(|| vec![408, 429, 502, 503, 504]);

        Self {
            max_attempts,
            initial_delay_ms,
            max_delay_ms,
            retry_on_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to synchronize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_upstream_client_config_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::remove_var("UPSTREAM_CLIENT_TIMEOUT");
            env::remove_var("UPSTREAM_CLIENT_CONNECT_TIMEOUT");
            env::remove_var("UPSTREAM_CLIENT_DETAILED_LOGGING");
            env::remove_var("UPSTREAM_CLIENT_RETRY_MAX_ATTEMPTS");
            env::remove_var("UPSTREAM_CLIENT_RETRY_INITIAL_DELAY_MS");
            env::remove_var("UPSTREAM_CLIENT_RETRY_MAX_DELAY_MS");
            env::remove_var("UPSTREAM_CLIENT_RETRY_ON_STATUS");
        }

        let config = UpstreamClientConfig::from_env();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.connect_timeout_seconds, 3);
        assert!(config.enable_detailed_logging);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.retry_on_status, vec![408, 429, 502, 503, 504]);
    }

    #[test]
    fn test_upstream_client_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var("UPSTREAM_CLIENT_TIMEOUT", "5");
            env::set_var("UPSTREAM_CLIENT_CONNECT_TIMEOUT", "1");
            env::set_var("UPSTREAM_CLIENT_DETAILED_LOGGING", "false");
            env::set_var("UPSTREAM_CLIENT_RETRY_MAX_ATTEMPTS", "4");
        }

        let config = UpstreamClientConfig::from_env();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.connect_timeout_seconds, 1);
        assert!(!config.enable_detailed_logging);
        assert_eq!(config.retry.max_attempts, 4);

        unsafe {
            env::remove_var("UPSTREAM_CLIENT_TIMEOUT");
            env::remove_var("UPSTREAM_CLIENT_CONNECT_TIMEOUT");
            env::remove_var("UPSTREAM_CLIENT_DETAILED_LOGGING");
            env::remove_var("UPSTREAM_CLIENT_RETRY_MAX_ATTEMPTS");
        }
    }

    #[test]
    fn test_retry_status_codes_parsing() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var("UPSTREAM_CLIENT_RETRY_ON_STATUS", "502,503");
        }

        let config = RetryConfig::from_env();
        assert_eq!(config.retry_on_status, vec![502, 503]);

        unsafe {
            env::remove_var("UPSTREAM_CLIENT_RETRY_ON_STATUS");
        }
    }
}
