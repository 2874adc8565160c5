//! Response DTOs for the restaurant API
//!
//! Defines the structure of outgoing HTTP response bodies that are not
//! plain restaurant records.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current number of cached entries
    pub cache_size: usize,
    /// Maximum number of cached entries
    pub capacity: usize,
    /// Keys currently cached
    pub cache_keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub invalidations: u64,
    pub loads: u64,
    pub load_failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            cache_size: stats.count,
            capacity: stats.capacity,
            cache_keys: stats.keys,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            invalidations: stats.invalidations,
            loads: stats.loads,
            load_failures: stats.load_failures,
            hit_rate,
        }
    }
}

/// Response body for the cache clear endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of entries dropped
    pub removed: usize,
}

impl ClearResponse {
    pub fn all(removed: usize) -> Self {
        Self {
            message: "Cleared entire cache".to_string(),
            removed,
        }
    }

    pub fn namespace(namespace: &str, removed: usize) -> Self {
        Self {
            message: format!("Cleared '{}' cache namespace", namespace),
            removed,
        }
    }
}

/// Response body for `POST /demo/sample-data`
#[derive(Debug, Clone, Serialize)]
pub struct SampleDataResponse {
    /// Names of the restaurants that were created
    pub created: Vec<String>,
}

/// Where a demo read was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lookup {
    Hit,
    Miss,
}

/// One timed read in `GET /demo/cache-test/:id`
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CacheAttempt {
    Served {
        attempt: u32,
        status: Lookup,
        time_ms: f64,
        name: String,
    },
    Failed {
        attempt: u32,
        error: String,
    },
}

/// Response body for `GET /demo/cache-test/:id`
#[derive(Debug, Clone, Serialize)]
pub struct CacheTestResponse {
    pub performance: Vec<CacheAttempt>,
}

/// Response body for the health endpoint (GET /health)
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
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
