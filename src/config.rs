//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval
    pub cleanup_interval: u64,
    /// TTL for `GET /restaurants`
    pub list_ttl: u64,
    /// TTL for `GET /restaurants/:id`
    pub detail_ttl: u64,
    /// TTL for `GET /restaurants/search`
    pub search_ttl: u64,
    /// TTL for `GET /restaurants/active`
    pub active_ttl: u64,
    /// Artificial delay added to every data source call, in milliseconds
    pub source_latency_ms: u64,
}

fn var_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency (default: 1)
    /// - `LIST_TTL`, `DETAIL_TTL`, `SEARCH_TTL`, `ACTIVE_TTL` - per-query
    ///   TTLs (defaults: 300, 600, 180, 240)
    /// - `SOURCE_LATENCY_MS` - Simulated data source latency (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: var_or("MAX_ENTRIES", defaults.max_entries),
            server_port: var_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: var_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            list_ttl: var_or("LIST_TTL", defaults.list_ttl),
            detail_ttl: var_or("DETAIL_TTL", defaults.detail_ttl),
            search_ttl: var_or("SEARCH_TTL", defaults.search_ttl),
            active_ttl: var_or("ACTIVE_TTL", defaults.active_ttl),
            source_latency_ms: var_or("SOURCE_LATENCY_MS", defaults.source_latency_ms),
        }
    }

    /// Rejects settings the cache cannot honour.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries == 0 {
            return Err("MAX_ENTRIES must be at least 1".to_string());
        }
        if self.cleanup_interval == 0 {
            return Err("CLEANUP_INTERVAL must be at least 1 second".to_string());
        }
        let ttls = [
            ("LIST_TTL", self.list_ttl),
            ("DETAIL_TTL", self.detail_ttl),
            ("SEARCH_TTL", self.search_ttl),
            ("ACTIVE_TTL", self.active_ttl),
        ];
        match ttls.iter().find(|(_, ttl)| *ttl == 0) {
            Some((name, _)) => Err(format!("{} must be positive", name)),
            None => Ok(()),
        }
    }

    /// Per-query TTLs as durations.
    pub fn ttls(&self) -> QueryTtls {
        QueryTtls {
            list: Duration::from_secs(self.list_ttl),
            detail: Duration::from_secs(self.detail_ttl),
            search: Duration::from_secs(self.search_ttl),
            active: Duration::from_secs(self.active_ttl),
        }
    }

    /// Simulated data source latency as a duration.
    pub fn source_latency(&self) -> Duration {
        Duration::from_millis(self.source_latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            server_port: 8000,
            cleanup_interval: 1,
            list_ttl: 300,
            detail_ttl: 600,
            search_ttl: 180,
            active_ttl: 240,
            source_latency_ms: 0,
        }
    }
}

/// How long each kind of cached read stays fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTtls {
    pub list: Duration,
    pub detail: Duration,
    pub search: Duration,
    pub active: Duration,
}

impl Default for QueryTtls {
    fn default() -> Self {
        Config::default().ttls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.source_latency(), Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_query_ttls() {
        let ttls = QueryTtls::default();
        assert_eq!(ttls.list, Duration::from_secs(300));
        assert_eq!(ttls.detail, Duration::from_secs(600));
        assert_eq!(ttls.search, Duration::from_secs(180));
        assert_eq!(ttls.active, Duration::from_secs(240));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = Config {
            max_entries: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let config = Config {
            search_ttl: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("SEARCH_TTL"));
    }

    #[test]
    fn test_config_from_env_defaults() {
        for name in [
            "MAX_ENTRIES",
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
            "LIST_TTL",
            "DETAIL_TTL",
            "SEARCH_TTL",
            "ACTIVE_TTL",
            "SOURCE_LATENCY_MS",
        ] {
            env::remove_var(name);
        }

        assert_eq!(Config::from_env(), Config::default());
    }
}
