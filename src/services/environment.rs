//! The canonical conditions pipeline: resolve, fetch, assemble.
//!
//! Every request flows through this one service; the HTTP handlers are thin
//! translators and never reimplement normalization rules. The pipeline is
//! linear and stateless: nothing is retained between requests.

use actix_web::{HttpResponse, http::StatusCode};

use crate::config::ProviderConfig;
use crate::models::{EnvironmentalSnapshot, ErrorResponse, ForecastDay, LocationQuery};
use crate::services::assembly::{assemble_forecast, assemble_snapshot};
use crate::services::conditions::ConditionsFetcher;
use crate::services::geocoding::LocationResolver;
use crate::services::upstream_client::{UpstreamClient, UpstreamClientConfig};

/// Errors surfaced by the conditions pipeline.
///
/// Air-quality failures never appear here: they are swallowed at the fetch
/// layer and degrade the snapshot to the `Unavailable` sentinel instead.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    /// The request supplied neither a city nor a postal code
    #[error("{0}")]
    Validation(String),

    /// Geocoding produced no usable coordinates
    #[error("{0}")]
    NotFound(String),

    /// Missing credential, or the provider rejected it
    #[error("{0}")]
    Configuration(String),

    /// A fatal upstream fetch failed or returned a malformed payload
    #[error("{0}")]
    Upstream(String),
}

impl actix_web::ResponseError for EnvironmentError {
    fn status_code(&self) -> StatusCode {
        match self {
            EnvironmentError::Validation(_) => StatusCode::BAD_REQUEST,
            EnvironmentError::NotFound(_) => StatusCode::NOT_FOUND,
            EnvironmentError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EnvironmentError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// The conditions pipeline facade: LocationResolver -> ConditionsFetcher ->
/// assemblers
pub struct EnvironmentService {
    resolver: LocationResolver,
    fetcher: ConditionsFetcher,
}

impl EnvironmentService {
    /// Create a new environment service.
    ///
    /// The credential is validated here, once, so a missing API key fails
    /// fast instead of surfacing mid-pipeline.
    pub fn new(
        provider: &ProviderConfig,
        client_config: UpstreamClientConfig,
    ) -> Result<Self, EnvironmentError> {
        let api_key = provider.api_key.clone().ok_or_else(|| {
            EnvironmentError::Configuration(
                "OWM_API_KEY is missing. Please configure it in the server environment variables."
                    .to_string(),
            )
        })?;

        let http = UpstreamClient::new(client_config).map_err(|e| {
            EnvironmentError::Configuration(format!("failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            resolver: LocationResolver::new(provider, api_key.clone(), http.clone()),
            fetcher: ConditionsFetcher::new(provider, api_key, http),
        })
    }

    /// Assemble the current environmental snapshot for a location query
    pub async fn current_conditions(
        &self,
        query: &LocationQuery,
    ) -> Result<EnvironmentalSnapshot, EnvironmentError> {
        let location = self.resolver.resolve(query).await?;
        tracing::debug!(
            location = %location.display_name,
            latitude = location.latitude,
            longitude = location.longitude,
            "Location resolved"
        );

        let (payload, air_quality) = self.fetcher.fetch_current(&location).await?;
        let current = payload.current.as_ref().ok_or_else(|| {
            EnvironmentError::Upstream("weather payload missing current conditions".to_string())
        })?;

        Ok(assemble_snapshot(
            location.display_name,
            current,
            &payload.alerts,
            air_quality.as_ref(),
        ))
    }

    /// Assemble the short-range daily forecast for a location query
    pub async fn forecast(
        &self,
        query: &LocationQuery,
    ) -> Result<Vec<ForecastDay>, EnvironmentError> {
        let location = self.resolver.resolve(query).await?;
        tracing::debug!(
            location = %location.display_name,
            latitude = location.latitude,
            longitude = location.longitude,
            "Location resolved"
        );

        let payload = self.fetcher.fetch_forecast(&location).await?;
        Ok(assemble_forecast(&payload.daily))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_error_status_taxonomy() {
        let validation = EnvironmentError::Validation("missing".to_string());
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let not_found = EnvironmentError::NotFound("nowhere".to_string());
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let configuration = EnvironmentError::Configuration("no key".to_string());
        assert_eq!(configuration.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let upstream = EnvironmentError::Upstream("provider down".to_string());
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_api_key_is_a_configuration_error() {
        let provider = ProviderConfig {
            api_key: None,
            ..ProviderConfig::default()
        };

        let result = EnvironmentService::new(&provider, UpstreamClientConfig::default());
        match result {
            Err(EnvironmentError::Configuration(message)) => {
                assert!(message.contains("OWM_API_KEY"));
            }
            _ => panic!("expected a configuration error"),
        }
    }

    #[test]
    fn test_service_builds_with_api_key() {
        let provider = ProviderConfig {
            api_key: Some("test-key".to_string()),
            ..ProviderConfig::default()
        };

        assert!(EnvironmentService::new(&provider, UpstreamClientConfig::default()).is_ok());
    }
}
