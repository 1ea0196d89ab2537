//! Custom middleware for cross-cutting concerns.
//!
//! This module contains middleware components that handle request IDs and
//! metrics collection across all endpoints.

pub mod metrics;
pub mod request_id;

pub use metrics::*;
pub use request_id::*;
