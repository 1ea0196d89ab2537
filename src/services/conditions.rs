//! Conditions fetching: raw weather and air-quality payloads for resolved
//! coordinates.
//!
//! The weather bundle is fatal on failure; the air-quality lookup is
//! best-effort and degrades to `None` so current conditions can still be
//! served when only AQI is unavailable. The two fetches run concurrently.

use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::config::ProviderConfig;
use crate::models::ResolvedLocation;
use crate::services::environment::EnvironmentError;
use crate::services::upstream_client::UpstreamClient;

/// Weather bundle from the One Call endpoint.
///
/// `current` is absent on forecast-only fetches, `daily` on current-only
/// ones; both variants deserialize into this one shape.
#[derive(Debug, Deserialize)]
pub struct OneCallPayload {
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub alerts: Vec<ProviderAlert>,
    #[serde(default)]
    pub daily: Vec<DailyEntry>,
}

/// Raw current conditions as shaped by the provider
#[derive(Debug, Deserialize)]
pub struct CurrentConditions {
    pub temp: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    #[serde(default)]
    pub weather: Vec<ConditionText>,
}

/// Free-text condition description
#[derive(Debug, Deserialize)]
pub struct ConditionText {
    pub description: String,
}

/// A provider-issued severe weather alert
#[derive(Debug, Deserialize)]
pub struct ProviderAlert {
    pub event: String,
    pub description: String,
}

/// One raw daily forecast entry
#[derive(Debug, Deserialize)]
pub struct DailyEntry {
    /// Epoch seconds of the forecast day
    pub dt: i64,
    pub temp: DailyTemperature,
    #[serde(default)]
    pub weather: Vec<ConditionText>,
    /// Embedded per-day air-quality sub-result, when the provider has one
    pub air_pollution: Option<EmbeddedAirPollution>,
}

#[derive(Debug, Deserialize)]
pub struct DailyTemperature {
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedAirPollution {
    #[serde(default)]
    pub list: Vec<AirPollutionEntry>,
}

/// One pollutant reading from the air-pollution endpoint
#[derive(Debug, Deserialize)]
pub struct AirPollutionEntry {
    pub main: AirPollutionIndex,
    pub components: Option<PollutantComponents>,
}

#[derive(Debug, Deserialize)]
pub struct AirPollutionIndex {
    pub aqi: i64,
}

#[derive(Debug, Deserialize)]
pub struct PollutantComponents {
    pub pm2_5: Option<f64>,
    pub o3: Option<f64>,
}

/// Error body the provider attaches to non-success weather responses
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

const GENERIC_WEATHER_ERROR: &str = "failed to fetch weather data";

/// Exclusion list for the current-conditions fetch; alerts stay included
const CURRENT_EXCLUDE: &str = "minutely,hourly";
/// Exclusion list for the forecast fetch; only the daily array is needed
const FORECAST_EXCLUDE: &str = "current,minutely,hourly,alerts";

/// Retrieves raw weather and air-quality payloads for resolved coordinates
pub struct ConditionsFetcher {
    http: UpstreamClient,
    api_key: String,
    one_call_url: String,
    air_pollution_url: String,
}

impl ConditionsFetcher {
    pub fn new(config: &ProviderConfig, api_key: String, http: UpstreamClient) -> Self {
        Self {
            http,
            api_key,
            one_call_url: config.one_call_url.clone(),
            air_pollution_url: config.air_pollution_url.clone(),
        }
    }

    /// Fetch the current weather bundle and the best-effort AQI reading.
    ///
    /// Both calls are issued concurrently; the weather result is fatal,
    /// the air-quality result is not.
    pub async fn fetch_current(
        &self,
        location: &ResolvedLocation,
    ) -> Result<(OneCallPayload, Option<AirPollutionEntry>), EnvironmentError> {
        let (weather, air_quality) = tokio::join!(
            self.fetch_one_call(location, CURRENT_EXCLUDE),
            self.fetch_air_quality(location),
        );

        Ok((weather?, air_quality))
    }

    /// Fetch the multi-day forecast bundle; fatal on failure
    pub async fn fetch_forecast(
        &self,
        location: &ResolvedLocation,
    ) -> Result<OneCallPayload, EnvironmentError> {
        self.fetch_one_call(location, FORECAST_EXCLUDE).await
    }

    async fn fetch_one_call(
        &self,
        location: &ResolvedLocation,
        exclude: &str,
    ) -> Result<OneCallPayload, EnvironmentError> {
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();
        let url = Url::parse_with_params(
            &self.one_call_url,
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "imperial"),
                ("exclude", exclude),
                ("appid", self.api_key.as_str()),
            ],
        )
        .map_err(|e| EnvironmentError::Upstream(format!("invalid weather URL: {e}")))?;

        let response = self.http.get(url.as_str()).await.map_err(|e| {
            EnvironmentError::Upstream(format!("{GENERIC_WEATHER_ERROR}: {}", e.user_message()))
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(EnvironmentError::Configuration(
                "Weather API key error: the configured key may be invalid or inactive.".to_string(),
            ));
        }
        if !status.is_success() {
            // Pass the provider's own message through when it sent one
            let message = response
                .json::<ProviderErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| GENERIC_WEATHER_ERROR.to_string());
            return Err(EnvironmentError::Upstream(message));
        }

        response
            .json::<OneCallPayload>()
            .await
            .map_err(|e| EnvironmentError::Upstream(format!("malformed weather payload: {e}")))
    }

    /// Best-effort air-quality lookup: any failure yields `None`
    async fn fetch_air_quality(&self, location: &ResolvedLocation) -> Option<AirPollutionEntry> {
        #[derive(Debug, Deserialize)]
        struct AirPollutionPayload {
            #[serde(default)]
            list: Vec<AirPollutionEntry>,
        }

        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();
        let url = Url::parse_with_params(
            &self.air_pollution_url,
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
            ],
        )
        .ok()?;

        let response = match self.http.get(url.as_str()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    location = %location.display_name,
                    error = %e,
                    "Air quality fetch failed, continuing without AQI"
                );
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                location = %location.display_name,
                status = response.status().as_u16(),
                "Air quality endpoint returned non-success, continuing without AQI"
            );
            return None;
        }

        let payload: AirPollutionPayload = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(
                    location = %location.display_name,
                    error = %e,
                    "Air quality payload malformed, continuing without AQI"
                );
                return None;
            }
        };

        payload.list.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_call_payload_parses_current_bundle() {
        let body = serde_json::json!({
            "current": {
                "temp": 72.4,
                "humidity": 55,
                "wind_speed": 8.0,
                "weather": [{"description": "scattered clouds"}]
            },
            "alerts": [{"event": "Heat Advisory", "description": "Stay hydrated."}]
        });

        let payload: OneCallPayload = serde_json::from_value(body).unwrap();
        let current = payload.current.unwrap();
        assert_eq!(current.humidity, 55);
        assert_eq!(current.weather[0].description, "scattered clouds");
        assert_eq!(payload.alerts[0].event, "Heat Advisory");
        assert!(payload.daily.is_empty());
    }

    #[test]
    fn test_one_call_payload_parses_forecast_bundle() {
        let body = serde_json::json!({
            "daily": [
                {
                    "dt": 1717200000,
                    "temp": {"max": 88.2, "min": 63.7},
                    "weather": [{"description": "light rain"}]
                },
                {
                    "dt": 1717286400,
                    "temp": {"max": 90.0, "min": 65.0},
                    "weather": [{"description": "clear sky"}],
                    "air_pollution": {"list": [{"main": {"aqi": 3}}]}
                }
            ]
        });

        let payload: OneCallPayload = serde_json::from_value(body).unwrap();
        assert!(payload.current.is_none());
        assert_eq!(payload.daily.len(), 2);
        assert!(payload.daily[0].air_pollution.is_none());
        let embedded = payload.daily[1].air_pollution.as_ref().unwrap();
        assert_eq!(embedded.list[0].main.aqi, 3);
    }

    #[test]
    fn test_air_pollution_entry_tolerates_missing_components() {
        let body = serde_json::json!({"main": {"aqi": 2}});
        let entry: AirPollutionEntry = serde_json::from_value(body).unwrap();
        assert_eq!(entry.main.aqi, 2);
        assert!(entry.components.is_none());
    }
}
