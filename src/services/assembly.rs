//! Pure assembly of normalized snapshots and forecasts from raw payloads.
//!
//! No I/O happens here: given well-formed raw input these functions always
//! succeed, which keeps the partial-failure policy confined to the fetch
//! layer and makes the transformation rules directly testable.

use chrono::{DateTime, Utc};

use crate::models::{
    AirQualityReading, AlertStatus, AqiStatus, EnvironmentalSnapshot, ForecastDay, WeatherSnapshot,
};
use crate::services::conditions::{AirPollutionEntry, CurrentConditions, DailyEntry, ProviderAlert};

/// Wind speed above which a derived alert activates, in mph
const HIGH_WIND_THRESHOLD_MPH: f64 = 20.0;

const HIGH_WIND_DESCRIPTION: &str = "High winds expected. Secure loose outdoor items.";
const NO_ALERTS_DESCRIPTION: &str = "No severe weather alerts.";

/// Forecast responses carry at most this many days
const MAX_FORECAST_DAYS: usize = 7;

/// Merge raw weather and optional air quality into an environmental snapshot.
///
/// `last_updated` is stamped with the current instant; it is never copied
/// from an upstream timestamp.
pub fn assemble_snapshot(
    location: String,
    current: &CurrentConditions,
    alerts: &[ProviderAlert],
    air_quality: Option<&AirPollutionEntry>,
) -> EnvironmentalSnapshot {
    let weather = WeatherSnapshot {
        temperature_f: current.temp,
        condition: title_case(
            current
                .weather
                .first()
                .map(|w| w.description.as_str())
                .unwrap_or("Unknown"),
        ),
        humidity: current.humidity,
        wind_speed_mph: current.wind_speed,
    };

    let air_quality = assemble_air_quality(air_quality);
    let alert = derive_alert(alerts.first(), weather.wind_speed_mph);

    EnvironmentalSnapshot {
        location,
        last_updated: Utc::now(),
        weather,
        air_quality,
        alert,
    }
}

/// Map an optional raw AQI entry into a reading, or the sentinel set.
///
/// An entry without component data counts as no data at all.
fn assemble_air_quality(entry: Option<&AirPollutionEntry>) -> AirQualityReading {
    match entry {
        Some(entry) => match &entry.components {
            Some(components) => AirQualityReading {
                aqi: Some(entry.main.aqi),
                status: AqiStatus::from_index(entry.main.aqi),
                main_pollutant: Some("PM2.5".to_string()),
                pm25: components.pm2_5,
                ozone: components.o3,
            },
            None => AirQualityReading::unavailable(),
        },
        None => AirQualityReading::unavailable(),
    }
}

/// Derive the alert state: a provider alert wins over the wind rule.
fn derive_alert(provider_alert: Option<&ProviderAlert>, wind_speed_mph: f64) -> AlertStatus {
    match provider_alert {
        Some(alert) => AlertStatus {
            is_active: true,
            level: alert.event.clone(),
            description: alert.description.clone(),
        },
        None if wind_speed_mph > HIGH_WIND_THRESHOLD_MPH => AlertStatus {
            is_active: true,
            level: "High Wind Alert".to_string(),
            description: HIGH_WIND_DESCRIPTION.to_string(),
        },
        None => AlertStatus {
            is_active: false,
            level: "None".to_string(),
            description: NO_ALERTS_DESCRIPTION.to_string(),
        },
    }
}

/// Map the raw daily array into at most seven forecast days, source order
/// preserved, truncated and never padded.
pub fn assemble_forecast(daily: &[DailyEntry]) -> Vec<ForecastDay> {
    daily
        .iter()
        .take(MAX_FORECAST_DAYS)
        .map(assemble_forecast_day)
        .collect()
}

fn assemble_forecast_day(entry: &DailyEntry) -> ForecastDay {
    let day = DateTime::<Utc>::from_timestamp(entry.dt, 0).unwrap_or_else(Utc::now);

    let aqi_index = entry
        .air_pollution
        .as_ref()
        .and_then(|embedded| embedded.list.first())
        .map(|reading| reading.main.aqi);

    ForecastDay {
        date: day.date_naive(),
        day_of_week: day.format("%a").to_string(),
        high_f: entry.temp.max.round() as i32,
        low_f: entry.temp.min.round() as i32,
        condition: title_case(
            entry
                .weather
                .first()
                .map(|w| w.description.as_str())
                .unwrap_or("Unknown"),
        ),
        expected_aqi_status: AqiStatus::from_forecast_index(aqi_index),
    }
}

/// Capitalize the first letter of each whitespace-delimited word, leaving
/// all other characters unchanged.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
