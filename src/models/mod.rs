//! Records and DTOs for the restaurant API
//!
//! This module defines the restaurant record owned by the data source and
//! the request/response bodies exchanged over HTTP.

pub mod requests;
pub mod responses;
pub mod restaurant;

// Re-export commonly used types
pub use requests::{Pagination, SearchQuery};
pub use responses::{
    CacheAttempt, CacheTestResponse, ClearResponse, ErrorResponse, HealthResponse, Lookup,
    SampleDataResponse, StatsResponse,
};
pub use restaurant::{Restaurant, RestaurantCreate, RestaurantUpdate};
