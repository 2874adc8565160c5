//! Cache Keys and Invalidation Sets
//!
//! Keys are rendered from an operation name plus its arguments so that the
//! same logical query always maps to the same key.

use std::collections::BTreeSet;
use std::fmt;

// == Cache Key ==
/// Deterministic cache key builder.
///
/// Renders as `op:arg1:arg2...`. Backslashes and colons inside arguments are
/// escaped, so distinct argument lists can never produce the same key.
///
/// ```
/// use restaurant_cache::cache::CacheKey;
///
/// let key = CacheKey::new("list_restaurants").arg(0).arg(100);
/// assert_eq!(key.as_str(), "list_restaurants:0:100");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Starts a key for the named operation.
    pub fn new(operation: &str) -> Self {
        let mut rendered = String::with_capacity(operation.len() + 16);
        push_escaped(&mut rendered, operation);
        Self(rendered)
    }

    /// Appends one argument.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.0.push(':');
        push_escaped(&mut self.0, &value.to_string());
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

fn push_escaped(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        if ch == '\\' || ch == ':' {
            out.push('\\');
        }
        out.push(ch);
    }
}

// == Invalidation ==
/// The set of cache entries a write makes stale: exact keys and/or whole
/// namespaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalidation {
    keys: BTreeSet<String>,
    namespaces: BTreeSet<String>,
}

impl Invalidation {
    /// An empty invalidation; a write using it drops nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces.insert(namespace.into());
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.namespaces.is_empty()
    }
}
