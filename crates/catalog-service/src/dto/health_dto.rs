//! Readiness DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// State of a single dependency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DependencyStatus {
    /// Backend name, e.g. `mysql` or `redis`.
    pub backend: String,
    /// Whether the dependency answered.
    pub healthy: bool,
    /// Failure description when unhealthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DependencyStatus {
    /// Builds a status from a health check result.
    #[must_use]
    pub fn from_result<E: std::fmt::Display>(backend: &str, result: Result<(), E>) -> Self {
        Self {
            backend: backend.to_string(),
            healthy: result.is_ok(),
            error: result.err().map(|e| e.to_string()),
        }
    }
}

/// Readiness of the service's dependencies.
///
/// The store is required; the cache is optional and only degrades lookups.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadinessReport {
    pub store: DependencyStatus,
    pub cache: DependencyStatus,
}

impl ReadinessReport {
    /// Ready when the store is reachable.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.store.healthy
    }

    /// Ready but running without a working cache.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.store.healthy && !self.cache.healthy
    }
}
