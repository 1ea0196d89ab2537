//! Environmental domain model: snapshots, air quality, alerts, and forecasts.
//!
//! Every entity here is created fresh per request and discarded once the
//! response is produced; nothing persists across requests.

use chrono::{DateTime, NaiveDate, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Which request parameter produced the location query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    City,
    PostalCode,
}

/// A raw, caller-supplied location string awaiting geocoding
#[derive(Debug, Clone)]
pub struct LocationQuery {
    pub raw: String,
    pub kind: LocationKind,
}

impl LocationQuery {
    pub fn city(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind: LocationKind::City,
        }
    }

    pub fn postal_code(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind: LocationKind::PostalCode,
        }
    }
}

/// Coordinates plus display name produced by geocoding.
///
/// Resolved once per request and immutable thereafter.
#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    pub source_kind: LocationKind,
}

/// Air quality status label derived from the provider's 1-5 AQI scale.
///
/// `Unavailable` marks a failed or empty AQI lookup; `Unknown` marks an
/// index outside the documented 1-5 range. The two are never conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
pub enum AqiStatus {
    Good,
    Moderate,
    Unhealthy,
    Unsafe,
    Hazardous,
    Unknown,
    Unavailable,
}

impl AqiStatus {
    /// Map a provider AQI index to its status label.
    ///
    /// The 1-5 mapping is fixed; any other value is `Unknown`.
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => AqiStatus::Good,
            2 => AqiStatus::Moderate,
            3 => AqiStatus::Unhealthy,
            4 => AqiStatus::Unsafe,
            5 => AqiStatus::Hazardous,
            _ => AqiStatus::Unknown,
        }
    }

    /// Map an optional forecast AQI index, falling back to `Moderate`.
    ///
    /// Forecast AQI is speculative, so a missing or out-of-range index
    /// reads as `Moderate` rather than `Unknown`/`Unavailable`.
    pub fn from_forecast_index(index: Option<i64>) -> Self {
        match index.map(Self::from_index) {
            Some(AqiStatus::Unknown) | None => AqiStatus::Moderate,
            Some(status) => status,
        }
    }
}

/// Normalized current weather readings
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temperature_f: f64,
    /// Title-cased provider condition text (e.g., "Scattered Clouds")
    pub condition: String,
    pub humidity: u8,
    pub wind_speed_mph: f64,
}

/// Normalized air quality reading, or the `Unavailable` sentinel set
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityReading {
    /// Provider AQI index (1-5), absent when the lookup failed
    pub aqi: Option<i64>,
    pub status: AqiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_pollutant: Option<String>,
    pub pm25: Option<f64>,
    pub ozone: Option<f64>,
}

impl AirQualityReading {
    /// Sentinel reading used when the AQI lookup failed or returned no data
    pub fn unavailable() -> Self {
        Self {
            aqi: None,
            status: AqiStatus::Unavailable,
            main_pollutant: None,
            pm25: None,
            ozone: None,
        }
    }
}

/// Derived alert state, not a 1:1 passthrough of provider alerts
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatus {
    pub is_active: bool,
    pub level: String,
    pub description: String,
}

/// The current-conditions response: one normalized environmental snapshot
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalSnapshot {
    pub location: String,
    /// Stamped at assembly time, never copied from an upstream timestamp
    pub last_updated: DateTime<Utc>,
    pub weather: WeatherSnapshot,
    pub air_quality: AirQualityReading,
    pub alert: AlertStatus,
}

/// One normalized day of the short-range forecast
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    /// Calendar date (UTC) of the forecast entry
    pub date: NaiveDate,
    /// Short weekday name (e.g., "Mon")
    pub day_of_week: String,
    pub high_f: i32,
    pub low_f: i32,
    pub condition: String,
    pub expected_aqi_status: AqiStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aqi_status_fixed_mapping() {
        assert_eq!(AqiStatus::from_index(1), AqiStatus::Good);
        assert_eq!(AqiStatus::from_index(2), AqiStatus::Moderate);
        assert_eq!(AqiStatus::from_index(3), AqiStatus::Unhealthy);
        assert_eq!(AqiStatus::from_index(4), AqiStatus::Unsafe);
        assert_eq!(AqiStatus::from_index(5), AqiStatus::Hazardous);
    }

    #[test]
    fn test_aqi_status_out_of_range_is_unknown() {
        assert_eq!(AqiStatus::from_index(0), AqiStatus::Unknown);
        assert_eq!(AqiStatus::from_index(6), AqiStatus::Unknown);
        assert_eq!(AqiStatus::from_index(-1), AqiStatus::Unknown);
        assert_eq!(AqiStatus::from_index(42), AqiStatus::Unknown);
    }

    #[test]
    fn test_forecast_index_falls_back_to_moderate() {
        assert_eq!(AqiStatus::from_forecast_index(None), AqiStatus::Moderate);
        assert_eq!(AqiStatus::from_forecast_index(Some(9)), AqiStatus::Moderate);
        assert_eq!(AqiStatus::from_forecast_index(Some(1)), AqiStatus::Good);
        assert_eq!(
            AqiStatus::from_forecast_index(Some(5)),
            AqiStatus::Hazardous
        );
    }

    #[test]
    fn test_aqi_status_serializes_as_plain_label() {
        assert_eq!(
            serde_json::to_string(&AqiStatus::Unavailable).unwrap(),
            "\"Unavailable\""
        );
        assert_eq!(
            serde_json::to_string(&AqiStatus::Unknown).unwrap(),
            "\"Unknown\""
        );
        assert_eq!(
            serde_json::to_string(&AqiStatus::Good).unwrap(),
            "\"Good\""
        );
    }

    #[test]
    fn test_snapshot_wire_format_is_camel_case() {
        let snapshot = EnvironmentalSnapshot {
            location: "Greensboro, North Carolina, US".to_string(),
            last_updated: Utc::now(),
            weather: WeatherSnapshot {
                temperature_f: 72.4,
                condition: "Clear Sky".to_string(),
                humidity: 55,
                wind_speed_mph: 8.0,
            },
            air_quality: AirQualityReading::unavailable(),
            alert: AlertStatus {
                is_active: false,
                level: "None".to_string(),
                description: "No severe weather alerts.".to_string(),
            },
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("lastUpdated").is_some());
        assert!(json["weather"].get("temperatureF").is_some());
        assert!(json["weather"].get("windSpeedMph").is_some());
        assert!(json["airQuality"].get("status").is_some());
        assert_eq!(json["airQuality"]["status"], "Unavailable");
        assert_eq!(json["alert"]["isActive"], false);
        // The sentinel set carries no pollutant detail
        assert_eq!(json["airQuality"]["pm25"], serde_json::Value::Null);
        assert!(json["airQuality"].get("mainPollutant").is_none());
    }

    #[test]
    fn test_forecast_day_wire_format() {
        let day = ForecastDay {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            day_of_week: "Sat".to_string(),
            high_f: 88,
            low_f: 64,
            condition: "Light Rain".to_string(),
            expected_aqi_status: AqiStatus::Moderate,
        };

        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["date"], "2024-06-01");
        assert_eq!(json["dayOfWeek"], "Sat");
        assert_eq!(json["highF"], 88);
        assert_eq!(json["lowF"], 64);
        assert_eq!(json["expectedAqiStatus"], "Moderate");
    }
}
