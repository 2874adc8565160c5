//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the service is up.
//!
//! # Tasks
//! - Expiry sweep: removes cache entries whose TTL has elapsed

mod cleanup;

pub use cleanup::spawn_cleanup_task;
