//! Restaurant Cache - a restaurant catalogue service with a cache-aside layer
//!
//! Reads are served from a bounded TTL/LRU cache and fall back to the data
//! source on a miss; writes go to the data source and then invalidate the
//! cached entries they make stale.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
