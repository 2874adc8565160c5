//! API Handlers
//!
//! HTTP request handlers for the restaurant and cache administration
//! endpoints. Every read goes through [`CacheAside::read`] with its key and
//! ttl spelled out here; every write goes through [`CacheAside::write`] with
//! the entries it makes stale.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::{CacheAside, CacheKey, Invalidation};
use crate::config::{Config, QueryTtls};
use crate::error::{CacheError, Result};
use crate::models::{
    CacheAttempt, CacheTestResponse, ClearResponse, HealthResponse, Lookup, Pagination,
    Restaurant, RestaurantCreate, RestaurantUpdate, SampleDataResponse, SearchQuery,
    StatsResponse,
};
use crate::source::{sample_restaurants, Command, ListFilter, RestaurantSource};

/// Namespace for every cached list, search and filter result
pub const LISTS_NAMESPACE: &str = "restaurants";

/// Namespace for cached single-restaurant lookups
pub const DETAILS_NAMESPACE: &str = "restaurant_details";

/// What the restaurant cache holds: one record or one page of records.
#[derive(Debug, Clone, PartialEq)]
pub enum Cached {
    One(Restaurant),
    Many(Vec<Restaurant>),
}

impl Cached {
    fn into_one(self) -> Result<Restaurant> {
        match self {
            Cached::One(record) => Ok(record),
            Cached::Many(_) => Err(CacheError::Internal(
                "cached a list where a record was expected".to_string(),
            )),
        }
    }

    fn into_many(self) -> Result<Vec<Restaurant>> {
        match self {
            Cached::Many(records) => Ok(records),
            Cached::One(_) => Err(CacheError::Internal(
                "cached a record where a list was expected".to_string(),
            )),
        }
    }
}

/// Cache key of the detail lookup for restaurant `id`.
pub fn detail_key(id: u64) -> CacheKey {
    CacheKey::new("get_restaurant").arg(id)
}

/// Entries made stale by changing restaurant `id`: its detail lookup and
/// every list that might contain it.
fn record_changed(id: u64) -> Invalidation {
    Invalidation::none()
        .key(detail_key(id))
        .namespace(LISTS_NAMESPACE)
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside layer in front of `source`
    pub cache: Arc<CacheAside<Cached>>,
    /// System of record
    pub source: Arc<dyn RestaurantSource>,
    /// Freshness window per kind of read
    pub ttls: QueryTtls,
}

impl AppState {
    pub fn new(
        cache: Arc<CacheAside<Cached>>,
        source: Arc<dyn RestaurantSource>,
        ttls: QueryTtls,
    ) -> Self {
        Self { cache, source, ttls }
    }

    /// Builds the cache from configuration in front of `source`.
    pub fn from_config(config: &Config, source: Arc<dyn RestaurantSource>) -> Self {
        let cache = Arc::new(CacheAside::new(config.max_entries));
        Self::new(cache, source, config.ttls())
    }

    async fn cached_list(
        &self,
        key: CacheKey,
        ttl: std::time::Duration,
        filter: ListFilter,
        (skip, limit): (usize, usize),
    ) -> Result<Vec<Restaurant>> {
        let source = Arc::clone(&self.source);
        self.cache
            .read(key, Some(LISTS_NAMESPACE), ttl, move || async move {
                source
                    .load_list(&filter, skip, limit)
                    .await
                    .map(Cached::Many)
            })
            .await?
            .into_many()
    }

    async fn cached_detail(&self, id: u64) -> Result<Restaurant> {
        let source = Arc::clone(&self.source);
        self.cache
            .read(
                detail_key(id),
                Some(DETAILS_NAMESPACE),
                self.ttls.detail,
                move || async move { source.load(id).await.map(Cached::One) },
            )
            .await?
            .into_one()
    }
}

// == Restaurant Reads ==

/// Handler for GET /restaurants
pub async fn list_restaurants(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Restaurant>>> {
    let (skip, limit) = page.window();
    let key = CacheKey::new("list_restaurants").arg(skip).arg(limit);
    let records = state
        .cached_list(key, state.ttls.list, ListFilter::All, (skip, limit))
        .await?;
    Ok(Json(records))
}

/// Handler for GET /restaurants/active
pub async fn list_active_restaurants(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Restaurant>>> {
    let (skip, limit) = page.window();
    let key = CacheKey::new("active_restaurants").arg(skip).arg(limit);
    let records = state
        .cached_list(key, state.ttls.active, ListFilter::Active, (skip, limit))
        .await?;
    Ok(Json(records))
}

/// Handler for GET /restaurants/search?cuisine=
pub async fn search_restaurants(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Restaurant>>> {
    let cuisine = query.normalized_cuisine();
    if cuisine.is_empty() {
        return Err(CacheError::InvalidRequest(
            "cuisine cannot be empty".to_string(),
        ));
    }

    let (skip, limit) = query.window();
    let key = CacheKey::new("search_restaurants")
        .arg(&cuisine)
        .arg(skip)
        .arg(limit);
    let records = state
        .cached_list(key, state.ttls.search, ListFilter::Cuisine(cuisine), (skip, limit))
        .await?;
    Ok(Json(records))
}

/// Handler for GET /restaurants/:id
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Restaurant>> {
    Ok(Json(state.cached_detail(id).await?))
}

// == Restaurant Writes ==

/// Handler for POST /restaurants
///
/// A new record cannot be in any cached detail lookup, so only lists are dropped.
pub async fn create_restaurant(
    State(state): State<AppState>,
    Json(payload): Json<RestaurantCreate>,
) -> Result<(StatusCode, Json<Restaurant>)> {
    if let Some(error_msg) = payload.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let source = Arc::clone(&state.source);
    let created = state
        .cache
        .write(&Invalidation::none().namespace(LISTS_NAMESPACE), move || async move {
            source.mutate(Command::Create(payload)).await
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT /restaurants/:id
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<RestaurantUpdate>,
) -> Result<Json<Restaurant>> {
    if let Some(error_msg) = patch.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let source = Arc::clone(&state.source);
    let updated = state
        .cache
        .write(&record_changed(id), move || async move {
            source.mutate(Command::Update(id, patch)).await
        })
        .await?;
    Ok(Json(updated))
}

/// Handler for DELETE /restaurants/:id
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Restaurant>> {
    let source = Arc::clone(&state.source);
    let deleted = state
        .cache
        .write(&record_changed(id), move || async move {
            source.mutate(Command::Delete(id)).await
        })
        .await?;
    Ok(Json(deleted))
}

// == Cache Administration ==

/// Handler for GET /cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for DELETE /cache/clear
pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.clear_all().await;
    Json(ClearResponse::all(removed))
}

/// Handler for DELETE /cache/clear/:namespace
pub async fn clear_cache_namespace(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Json<ClearResponse> {
    let removed = state.cache.clear_namespace(&namespace).await;
    Json(ClearResponse::namespace(&namespace, removed))
}

// == Demo ==

/// Handler for POST /demo/sample-data
///
/// Restaurants whose phone number is already registered are skipped, so the
/// endpoint can be called repeatedly.
pub async fn seed_sample_data(State(state): State<AppState>) -> Result<Json<SampleDataResponse>> {
    let source = Arc::clone(&state.source);
    let created = state
        .cache
        .write(&Invalidation::none().namespace(LISTS_NAMESPACE), move || async move {
            let mut created = Vec::new();
            for payload in sample_restaurants() {
                match source.mutate(Command::Create(payload)).await {
                    Ok(record) => created.push(record.name),
                    Err(CacheError::Conflict(_)) => continue,
                    Err(err) => return Err(err),
                }
            }
            Ok(created)
        })
        .await?;
    Ok(Json(SampleDataResponse { created }))
}

/// Handler for GET /demo/cache-test/:id
///
/// Reads restaurant `id` three times through the cache and reports, per
/// attempt, whether the cache served it and how long it took. Stops at the
/// first failed read.
pub async fn cache_test(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Json<CacheTestResponse> {
    let mut performance = Vec::with_capacity(3);
    for attempt in 1..=3 {
        let hits_before = state.cache.stats().await.hits;
        let started = Instant::now();
        match state.cached_detail(id).await {
            Ok(record) => {
                let elapsed = started.elapsed();
                let status = if state.cache.stats().await.hits > hits_before {
                    Lookup::Hit
                } else {
                    Lookup::Miss
                };
                performance.push(CacheAttempt::Served {
                    attempt,
                    status,
                    time_ms: (elapsed.as_secs_f64() * 100_000.0).round() / 100.0,
                    name: record.name,
                });
            }
            Err(err) => {
                performance.push(CacheAttempt::Failed {
                    attempt,
                    error: err.to_string(),
                });
                break;
            }
        }
    }
    Json(CacheTestResponse { performance })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
