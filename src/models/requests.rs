//! Query-string DTOs for the restaurant API

use serde::Deserialize;

/// Default page size for list endpoints
pub const DEFAULT_LIMIT: usize = 100;

/// Largest page size a caller may request
pub const MAX_LIMIT: usize = 1000;

/// `?skip=&limit=` for list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Pagination {
    /// Resolves defaults and caps the limit: `(skip, limit)`.
    pub fn window(&self) -> (usize, usize) {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        (skip, limit)
    }
}

/// `?cuisine=&skip=&limit=` for `GET /restaurants/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub cuisine: String,
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn window(&self) -> (usize, usize) {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
        .window()
    }

    /// Search term normalized so `Thai`, ` thai ` and `THAI` share a cache key.
    pub fn normalized_cuisine(&self) -> String {
        self.cuisine.trim().to_lowercase()
    }
}
