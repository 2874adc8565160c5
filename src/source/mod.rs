//! Data Source Module
//!
//! The system of record behind the cache. Request handlers never talk to a
//! source directly for reads; they go through [`crate::cache::CacheAside`].

mod memory;
mod sample;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Restaurant, RestaurantCreate, RestaurantUpdate};

pub use memory::InMemorySource;
pub use sample::sample_restaurants;

/// Which restaurants a list query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    All,
    /// Only `is_active` restaurants
    Active,
    /// Case-insensitive substring match on `cuisine_type`
    Cuisine(String),
}

impl ListFilter {
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Active => restaurant.is_active,
            ListFilter::Cuisine(term) => restaurant
                .cuisine_type
                .to_lowercase()
                .contains(&term.to_lowercase()),
        }
    }
}

/// A mutation against the data source.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create(RestaurantCreate),
    Update(u64, RestaurantUpdate),
    Delete(u64),
}

/// Port for the backing restaurant store.
///
/// Implementations may be slow and may fail; errors are reported as
/// [`crate::error::CacheError`] so the cache layer can pass them through.
#[async_trait]
pub trait RestaurantSource: Send + Sync + 'static {
    /// Fetches one restaurant, or `NotFound`.
    async fn load(&self, id: u64) -> Result<Restaurant>;

    /// Fetches a page of restaurants matching `filter`, ordered by id.
    async fn load_list(&self, filter: &ListFilter, offset: usize, limit: usize)
        -> Result<Vec<Restaurant>>;

    /// Applies `command` and returns the created, updated or deleted record.
    async fn mutate(&self, command: Command) -> Result<Restaurant>;
}
