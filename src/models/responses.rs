//! Response DTOs for the worker admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::worker::WorkerState;

/// Response body for the stats endpoint (GET /__worker/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Requests answered from cache
    pub hits: u64,
    /// Requests forwarded after a cache miss
    pub misses: u64,
    /// Requests passed through while uncontrolled
    pub bypassed: u64,
    /// Network failures
    pub network_errors: u64,
    /// Responses copied into the cache
    pub stored: u64,
    /// Responses not eligible for caching
    pub skipped: u64,
    /// Background writes that failed
    pub store_failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            bypassed: stats.bypassed,
            network_errors: stats.network_errors,
            stored: stats.stored,
            skipped: stats.skipped,
            store_failures: stats.store_failures,
        }
    }
}

/// One cache store as listed by GET /__worker/caches
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    /// Store name
    pub name: String,
    /// Number of stored responses
    pub entries: usize,
    /// True for the active generation
    pub current: bool,
}

/// Response body for the caches endpoint (GET /__worker/caches)
#[derive(Debug, Clone, Serialize)]
pub struct CachesResponse {
    /// Generation Identifier of the controlling worker
    pub active: Option<String>,
    /// Lifecycle state of the controlling worker
    pub state: Option<WorkerState>,
    /// Every existing store in creation order
    pub caches: Vec<CacheInfo>,
}

/// Response body for the update endpoint (POST /__worker/update)
#[derive(Debug, Clone, Serialize)]
pub struct UpdateResponse {
    /// Success message
    pub message: String,
    /// The newly active Generation Identifier
    pub cache_name: String,
    /// Lifecycle state of the new worker
    pub state: WorkerState,
}

impl UpdateResponse {
    /// Creates a new UpdateResponse
    pub fn new(cache_name: impl Into<String>, state: WorkerState) -> Self {
        let cache_name = cache_name.into();
        Self {
            message: format!("Cache '{}' is now active", cache_name),
            cache_name,
            state,
        }
    }
}

/// Response body for the health endpoint (GET /__worker/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
