//! OpenAPI specification generation and app factory.

use crate::{
    config::{MetricsConfig, ProviderConfig},
    handlers::{current_environment, environment_forecast, get_metrics, health, version},
    middleware::{MetricsMiddleware, RequestIdMiddleware},
    services::{AppMetrics, UpstreamClientConfig},
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "EcoWatch API".into(),
            version: "1.0.0".into(),
            description: Some(
                "Environmental conditions service built with Actix and Paperclip.\n\n\
                ## Endpoints\n\
                - `GET /environment/current?city=<s>` or `?zipCode=<s>`: unified snapshot of \
                current weather, air quality, and derived alert state\n\
                - `GET /environment/forecast?city=<s>` or `?zipCode=<s>`: up to seven normalized \
                daily forecast summaries\n\
                \n\
                ## Error Format\n\
                Failed requests return `{\"error\": \"<message>\"}` with status 400 (missing \
                location parameter), 404 (location not found), or 500 (configuration or \
                upstream failure).\n\
                \n\
                ## Partial Failure Policy\n\
                Air-quality data is best-effort: when the AQI lookup fails, the current \
                conditions response still succeeds with `airQuality.status = \"Unavailable\"`.\n\
                \n\
                ## Configuration\n\
                - Set `OWM_API_KEY` to the OpenWeatherMap credential (required at request time)\n\
                - `OWM_GEOCODE_URL`, `OWM_GEOCODE_ZIP_URL`, `OWM_ONE_CALL_URL`, \
                `OWM_AIR_POLLUTION_URL` override the upstream endpoints\n\
                - `UPSTREAM_CLIENT_TIMEOUT` and `UPSTREAM_CLIENT_RETRY_*` tune the upstream \
                client hardening"
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates a basic app with shared configuration
///
/// This factory function creates a pre-configured Actix Web application with:
/// - The environment endpoints (current conditions and forecast)
/// - Health and version endpoints
/// - OpenAPI specification
/// - Request ID propagation
/// - Metrics collection
///
/// This can be used both for testing and as a base for the main application.
pub fn create_base_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let provider_config = ProviderConfig::from_env();
    let upstream_config = UpstreamClientConfig::from_env();
    let metrics_config = MetricsConfig::from_env();
    let metrics = AppMetrics::new().expect("Failed to create metrics");

    App::new()
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(provider_config))
        .app_data(web::Data::new(upstream_config))
        .app_data(web::Data::new(metrics_config))
        .app_data(web::Data::new(metrics))
        .service(web::resource("/environment/current").route(web::get().to(current_environment)))
        .service(web::resource("/environment/forecast").route(web::get().to(environment_forecast)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}
