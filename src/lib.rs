//! EcoWatch API - environmental conditions service
//!
//! A web API built with Actix Web and Paperclip that serves a unified
//! "environmental snapshot" (current weather + air quality + derived alert)
//! and a short-range daily forecast for a user-supplied location, sourced
//! from OpenWeatherMap:
//! - Free-form location resolution (city name or postal code) via geocoding
//! - Concurrent weather and air-quality retrieval with a partial-failure policy
//! - Pure assembly of normalized snapshots and daily forecasts
//! - Prometheus metrics integration
//! - Structured request logging with request IDs
//! - OpenAPI documentation
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Data structures and request/response models
//! - `handlers/` - HTTP request handlers for each endpoint
//! - `middleware/` - Custom middleware for cross-cutting concerns
//! - `services/` - The conditions pipeline and core services
//! - `config/` - Configuration structures and environment loading
//!
//! ## Quick Start
//!
//! ```no_run
//! use ecowatch_api::create_base_app;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let app = create_base_app();
//!     // Configure and run the server
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

// Re-export commonly used types and functions for convenience
pub use config::{MetricsConfig, ProviderConfig};
pub use handlers::{
    create_base_app, create_openapi_spec, current_environment, environment_forecast, get_metrics,
    health, version,
};
pub use middleware::{MetricsMiddleware, RequestIdMiddleware};
pub use models::{
    AirQualityReading, AlertStatus, AqiStatus, EnvironmentQuery, EnvironmentalSnapshot,
    ErrorResponse, ForecastDay, HealthResponse, LocationKind, LocationQuery, ResolvedLocation,
    VersionResponse, WeatherSnapshot,
};
pub use services::{
    AppMetrics, ConditionsFetcher, EnvironmentError, EnvironmentService, LocationResolver,
    RetryConfig, UpstreamClient, UpstreamClientConfig, UpstreamClientError,
};
