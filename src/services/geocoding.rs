//! Location resolution: free-form location strings to coordinates.
//!
//! City-style strings go through the geocode-by-name endpoint after a
//! three-part clean join; postal codes go through the geocode-by-postal-code
//! endpoint with a default-country suffix. Both paths produce a
//! `ResolvedLocation` with a human-readable display name.

use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::config::ProviderConfig;
use crate::models::{LocationKind, LocationQuery, ResolvedLocation};
use crate::services::environment::EnvironmentError;
use crate::services::upstream_client::UpstreamClient;

/// One candidate from the geocode-by-name endpoint
#[derive(Debug, Deserialize)]
struct GeoCandidate {
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    state: Option<String>,
    country: Option<String>,
}

/// The single object returned by the geocode-by-postal-code endpoint
#[derive(Debug, Deserialize)]
struct GeoZipResult {
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Resolves a raw location string into coordinates plus a display name
pub struct LocationResolver {
    http: UpstreamClient,
    api_key: String,
    geocode_url: String,
    geocode_zip_url: String,
}

impl LocationResolver {
    pub fn new(config: &ProviderConfig, api_key: String, http: UpstreamClient) -> Self {
        Self {
            http,
            api_key,
            geocode_url: config.geocode_url.clone(),
            geocode_zip_url: config.geocode_zip_url.clone(),
        }
    }

    /// Resolve a location query to coordinates, once per request
    pub async fn resolve(
        &self,
        query: &LocationQuery,
    ) -> Result<ResolvedLocation, EnvironmentError> {
        match query.kind {
            LocationKind::City => self.resolve_city(&query.raw).await,
            LocationKind::PostalCode => self.resolve_postal_code(&query.raw).await,
        }
    }

    async fn resolve_city(&self, raw: &str) -> Result<ResolvedLocation, EnvironmentError> {
        let cleaned = clean_city_query(raw);
        let url = Url::parse_with_params(
            &self.geocode_url,
            &[
                ("q", cleaned.as_str()),
                ("limit", "1"),
                ("appid", self.api_key.as_str()),
            ],
        )
        .map_err(|e| EnvironmentError::Upstream(format!("invalid geocoding URL: {e}")))?;

        tracing::debug!(query = %cleaned, "Geocoding city query");

        let response = self.http.get(url.as_str()).await.map_err(|e| {
            EnvironmentError::Upstream(format!("geocoding request failed: {}", e.user_message()))
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(auth_error());
        }
        if !status.is_success() {
            return Err(EnvironmentError::NotFound(not_found_message(raw)));
        }

        let candidates: Vec<GeoCandidate> = response
            .json()
            .await
            .map_err(|e| EnvironmentError::Upstream(format!("malformed geocoding response: {e}")))?;

        let candidate = candidates
            .into_iter()
            .next()
            .ok_or_else(|| EnvironmentError::NotFound(not_found_message(raw)))?;

        let (Some(latitude), Some(longitude)) = (candidate.lat, candidate.lon) else {
            return Err(EnvironmentError::NotFound(not_found_message(raw)));
        };

        let name = candidate.name.unwrap_or_else(|| cleaned.clone());
        let display_name = match (candidate.state, candidate.country) {
            (Some(state), Some(country)) => format!("{name}, {state}, {country}"),
            _ => name,
        };

        Ok(ResolvedLocation {
            latitude,
            longitude,
            display_name,
            source_kind: LocationKind::City,
        })
    }

    async fn resolve_postal_code(&self, raw: &str) -> Result<ResolvedLocation, EnvironmentError> {
        let query = postal_query(raw);
        let url = Url::parse_with_params(
            &self.geocode_zip_url,
            &[("zip", query.as_str()), ("appid", self.api_key.as_str())],
        )
        .map_err(|e| EnvironmentError::Upstream(format!("invalid geocoding URL: {e}")))?;

        tracing::debug!(query = %query, "Geocoding postal code query");

        let response = self.http.get(url.as_str()).await.map_err(|e| {
            EnvironmentError::Upstream(format!("geocoding request failed: {}", e.user_message()))
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(auth_error());
        }
        if !status.is_success() {
            return Err(EnvironmentError::NotFound(not_found_message(raw)));
        }

        let result: GeoZipResult = response
            .json()
            .await
            .map_err(|e| EnvironmentError::Upstream(format!("malformed geocoding response: {e}")))?;

        let (Some(latitude), Some(longitude)) = (result.lat, result.lon) else {
            return Err(EnvironmentError::NotFound(not_found_message(raw)));
        };

        let code = postal_code_part(raw);
        let name = result.name.unwrap_or_else(|| code.to_string());

        Ok(ResolvedLocation {
            latitude,
            longitude,
            display_name: format!("{name} ({code})"),
            source_kind: LocationKind::PostalCode,
        })
    }
}

/// Clean a city-style query for the by-name geocoder.
///
/// Splits on commas, trims each part, drops empties, and keeps only the
/// first three parts; a trailing disambiguator beyond that is silently
/// dropped before querying.
fn clean_city_query(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .take(3)
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the by-postal-code query, defaulting the country to US when the
/// caller supplied a bare code.
fn postal_query(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains(',') {
        trimmed.to_string()
    } else {
        format!("{trimmed},US")
    }
}

/// The caller-supplied postal code without any country suffix
fn postal_code_part(raw: &str) -> &str {
    raw.split(',').next().unwrap_or(raw).trim()
}

fn not_found_message(raw: &str) -> String {
    format!(
        "Location not found for the search term: {raw}. Try adding State/Country (e.g., 'Paris, FR')."
    )
}

fn auth_error() -> EnvironmentError {
    EnvironmentError::Configuration(
        "Geocoding API key error: the configured key may be invalid or inactive.".to_string(),
    )
}
