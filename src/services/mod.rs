//! Business logic and service layer modules.
//!
//! This module contains the core of the application: the conditions
//! pipeline (geocoding, fetching, assembly), the hardened upstream HTTP
//! client, and metrics collection.

pub mod assembly;
pub mod conditions;
pub mod environment;
pub mod geocoding;
pub mod metrics;
pub mod upstream_client;

pub use assembly::*;
pub use conditions::*;
pub use environment::*;
pub use geocoding::*;
pub use metrics::*;
pub use upstream_client::*;
