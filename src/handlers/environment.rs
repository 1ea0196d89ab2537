//! Environment endpoint handlers: current conditions and forecast.
//!
//! These handlers are thin translators: they parse query parameters into a
//! `LocationQuery`, run the canonical pipeline, and map pipeline errors to
//! the HTTP status taxonomy. All normalization rules live in the services.

use crate::{
    config::ProviderConfig,
    models::{EnvironmentQuery, EnvironmentalSnapshot, ForecastDay, LocationQuery},
    services::{EnvironmentError, EnvironmentService, UpstreamClientConfig},
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Current environmental conditions endpoint
///
/// Returns a unified snapshot of current weather, air quality, and derived
/// alert state for a location given as a city name or postal code.
#[api_v2_operation(
    summary = "Current Environmental Conditions Endpoint",
    description = "Returns current weather, air quality, and derived alert state for a location. Accepts either a free-form city string (e.g., ?city=Paris,FR) or a postal code (e.g., ?zipCode=27401). Air quality degrades to an Unavailable sentinel when the AQI lookup fails; the snapshot is still returned.",
    tags("Environment"),
    parameters(
        ("city" = Option<String>, Query, description = "Free-form city string (e.g., 'Greensboro, NC, US')"),
        ("zipCode" = Option<String>, Query, description = "Postal code (e.g., '27401')"),
    ),
    responses(
        (status = 200, description = "Successful response", body = EnvironmentalSnapshot),
        (status = 400, description = "Bad Request - Neither city nor zipCode supplied"),
        (status = 404, description = "Not Found - Location could not be geocoded"),
        (status = 500, description = "Internal Server Error - Configuration or upstream failure")
    )
)]
pub async fn current_environment(
    req: HttpRequest,
    query: web::Query<EnvironmentQuery>,
) -> Result<web::Json<EnvironmentalSnapshot>, Error> {
    let location = parse_location(&query)?;
    let service = environment_service(&req)?;

    tracing::info!(location = %location.raw, "Fetching current environmental conditions");

    let snapshot = service.current_conditions(&location).await.map_err(|e| {
        tracing::error!(
            location = %location.raw,
            error = %e,
            "Current conditions request failed"
        );
        e
    })?;

    Ok(web::Json(snapshot))
}

/// Environmental forecast endpoint
///
/// Returns an ordered array of up to seven normalized daily forecast
/// summaries for a location given as a city name or postal code.
#[api_v2_operation(
    summary = "Environmental Forecast Endpoint",
    description = "Returns an ordered array of up to seven daily forecast summaries (high/low temperature, condition, expected AQI status) for a location. Accepts either a free-form city string or a postal code.",
    tags("Environment"),
    parameters(
        ("city" = Option<String>, Query, description = "Free-form city string (e.g., 'Greensboro, NC, US')"),
        ("zipCode" = Option<String>, Query, description = "Postal code (e.g., '27401')"),
    ),
    responses(
        (status = 200, description = "Successful response", body = Vec<ForecastDay>),
        (status = 400, description = "Bad Request - Neither city nor zipCode supplied"),
        (status = 404, description = "Not Found - Location could not be geocoded"),
        (status = 500, description = "Internal Server Error - Configuration or upstream failure")
    )
)]
pub async fn environment_forecast(
    req: HttpRequest,
    query: web::Query<EnvironmentQuery>,
) -> Result<web::Json<Vec<ForecastDay>>, Error> {
    let location = parse_location(&query)?;
    let service = environment_service(&req)?;

    tracing::info!(location = %location.raw, "Fetching environmental forecast");

    let forecast = service.forecast(&location).await.map_err(|e| {
        tracing::error!(
            location = %location.raw,
            error = %e,
            "Forecast request failed"
        );
        e
    })?;

    Ok(web::Json(forecast))
}

/// Turn raw query parameters into a location query; `city` wins when both
/// parameters are supplied.
fn parse_location(query: &EnvironmentQuery) -> Result<LocationQuery, EnvironmentError> {
    if let Some(city) = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|city| !city.is_empty())
    {
        return Ok(LocationQuery::city(city));
    }

    if let Some(zip) = query
        .zip_code
        .as_deref()
        .map(str::trim)
        .filter(|zip| !zip.is_empty())
    {
        return Ok(LocationQuery::postal_code(zip));
    }

    Err(EnvironmentError::Validation(
        "Location (city or zipCode) is required.".to_string(),
    ))
}

/// Build the pipeline service from app data, falling back to environment
/// configuration when the app factory did not register any.
fn environment_service(req: &HttpRequest) -> Result<EnvironmentService, EnvironmentError> {
    let provider = req
        .app_data::<web::Data<ProviderConfig>>()
        .map(|data| data.get_ref().clone())
        .unwrap_or_else(ProviderConfig::from_env);

    let client_config = req
        .app_data::<web::Data<UpstreamClientConfig>>()
        .map(|data| data.get_ref().clone())
        .unwrap_or_else(UpstreamClientConfig::from_env);

    EnvironmentService::new(&provider, client_config)
}
