//! Configuration structures and loading utilities.
//!
//! This module contains all configuration structures used by the application,
//! including environment variable loading and default values.

pub mod metrics;
pub mod provider;
pub mod upstream_client;

pub use metrics::*;
pub use provider::*;
