//! API Routes
//!
//! Configures the Axum router with all service endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats, cache_test, clear_cache, clear_cache_namespace, create_restaurant,
    delete_restaurant, get_restaurant, health_handler, list_active_restaurants,
    list_restaurants, search_restaurants, seed_sample_data, update_restaurant, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/restaurants", get(list_restaurants).post(create_restaurant))
        .route("/restaurants/active", get(list_active_restaurants))
        .route("/restaurants/search", get(search_restaurants))
        .route(
            "/restaurants/:id",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
        .route("/cache/stats", get(cache_stats))
        .route("/cache/clear", delete(clear_cache))
        .route("/cache/clear/:namespace", delete(clear_cache_namespace))
        .route("/demo/sample-data", post(seed_sample_data))
        .route("/demo/cache-test/:id", get(cache_test))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
