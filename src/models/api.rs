//! API request/response models for standard endpoints.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// Request query parameters for the environment endpoints
///
/// Exactly one of `city` or `zipCode` is expected; `city` wins when both
/// are supplied.
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct EnvironmentQuery {
    /// Free-form city string (e.g., "Paris, FR")
    pub city: Option<String>,
    /// Postal code (e.g., "27401")
    #[serde(rename = "zipCode")]
    pub zip_code: Option<String>,
}

/// Error body returned for every failed request
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ErrorResponse {
    pub error: String,
}
