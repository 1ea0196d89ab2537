//! Upstream provider configuration.
//!
//! The OpenWeatherMap credential and endpoint URLs are read from the
//! environment once and passed explicitly into the services that need them,
//! so a missing key surfaces as a configuration error instead of being
//! discovered mid-pipeline.

use std::env;

const DEFAULT_GEOCODE_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
const DEFAULT_GEOCODE_ZIP_URL: &str = "https://api.openweathermap.org/geo/1.0/zip";
const DEFAULT_ONE_CALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";
const DEFAULT_AIR_POLLUTION_URL: &str = "https://api.openweathermap.org/data/2.5/air_pollution";

/// Configuration for the OpenWeatherMap upstream provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key credential, `None` when unset; validated at service creation
    pub api_key: Option<String>,
    /// Geocode-by-name endpoint
    pub geocode_url: String,
    /// Geocode-by-postal-code endpoint
    pub geocode_zip_url: String,
    /// Current/forecast weather bundle endpoint (One Call 3.0)
    pub one_call_url: String,
    /// Air pollution endpoint
    pub air_pollution_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            geocode_zip_url: DEFAULT_GEOCODE_ZIP_URL.to_string(),
            one_call_url: DEFAULT_ONE_CALL_URL.to_string(),
            air_pollution_url: DEFAULT_AIR_POLLUTION_URL.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let api_key = env::var("OWM_API_KEY").ok().filter(|k| !k.is_empty());

        let geocode_url =
            env::var("OWM_GEOCODE_URL").unwrap_or_else(|_| DEFAULT_GEOCODE_URL.to_string());

        let geocode_zip_url = env::var("OWM_GEOCODE_ZIP_URL")
            .unwrap_or_else(|_| DEFAULT_GEOCODE_ZIP_URL.to_string());

        let one_call_url =
            env::var("OWM_ONE_CALL_URL").unwrap_or_else(|_| DEFAULT_ONE_CALL_URL.to_string());

        let air_pollution_url = env::var("OWM_AIR_POLLUTION_URL")
            .unwrap_or_else(|_| DEFAULT_AIR_POLLUTION_URL.to_string());

        Self {
            api_key,
            geocode_url,
            geocode_zip_url,
            one_call_url,
            air_pollution_url,
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
    fn test_provider_config_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::remove_var("OWM_API_KEY");
            env::remove_var("OWM_GEOCODE_URL");
            env::remove_var("OWM_GEOCODE_ZIP_URL");
            env::remove_var("OWM_ONE_CALL_URL");
            env::remove_var("OWM_AIR_POLLUTION_URL");
        }

        let config = ProviderConfig::from_env();
        assert!(config.api_key.is_none());
        assert_eq!(config.geocode_url, DEFAULT_GEOCODE_URL);
        assert_eq!(config.geocode_zip_url, DEFAULT_GEOCODE_ZIP_URL);
        assert_eq!(config.one_call_url, DEFAULT_ONE_CALL_URL);
        assert_eq!(config.air_pollution_url, DEFAULT_AIR_POLLUTION_URL);
    }

    #[test]
    fn test_provider_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var("OWM_API_KEY", "test-key");
            env::set_var("OWM_GEOCODE_URL", "http://localhost:9000/geo/direct");
        }

        let config = ProviderConfig::from_env();
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.geocode_url, "http://localhost:9000/geo/direct");

        unsafe {
            env::remove_var("OWM_API_KEY");
            env::remove_var("OWM_GEOCODE_URL");
        }
    }

    #[test]
    fn test_empty_api_key_reads_as_missing() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var("OWM_API_KEY", "");
        }

        let config = ProviderConfig::from_env();
        assert!(config.api_key.is_none());

        unsafe {
            env::remove_var("OWM_API_KEY");
        }
    }
}
