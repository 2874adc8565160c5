//! API Module
//!
//! HTTP handlers and routing for the restaurant service.
//!
//! # Endpoints
//! - `GET /restaurants`, `GET /restaurants/active`, `GET /restaurants/search`,
//!   `GET /restaurants/:id` - cached reads
//! - `POST /restaurants`, `PUT /restaurants/:id`, `DELETE /restaurants/:id` -
//!   writes with cache invalidation
//! - `GET /cache/stats`, `DELETE /cache/clear`, `DELETE /cache/clear/:namespace` -
//!   cache administration
//! - `POST /demo/sample-data` - seed demo restaurants
//! - `GET /demo/cache-test/:id` - three timed reads showing cache hits and misses
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
