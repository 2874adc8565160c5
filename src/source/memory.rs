//! In-memory restaurant source
//!
//! A `BTreeMap` behind a lock, with a switch to simulate an outage and an
//! optional artificial latency for observing cache behaviour.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Command, ListFilter, RestaurantSource};
use crate::error::{CacheError, Result};
use crate::models::{Restaurant, RestaurantCreate, RestaurantUpdate};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<u64, Restaurant>,
    next_id: u64,
}

/// Restaurant table held in process memory.
#[derive(Debug)]
pub struct InMemorySource {
    table: RwLock<Table>,
    latency: Option<Duration>,
    available: AtomicBool,
    reads: AtomicU64,
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySource {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
            latency: None,
            available: AtomicBool::new(true),
            reads: AtomicU64::new(0),
        }
    }

    /// Delays every call by `latency`. A zero latency disables the delay.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = (!latency.is_zero()).then_some(latency);
        self
    }

    /// While unavailable every call fails with `SourceUnavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of `load`/`load_list` calls served so far.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::SourceUnavailable(
                "restaurant store is offline".to_string(),
            ))
        }
    }

    fn ensure_unique_phone(table: &Table, phone: &str, except: Option<u64>) -> Result<()> {
        let taken = table
            .rows
            .values()
            .any(|r| r.phone_number == phone && Some(r.id) != except);
        if taken {
            Err(CacheError::Conflict(format!(
                "phone number {} is already registered",
                phone
            )))
        } else {
            Ok(())
        }
    }

    fn create(table: &mut Table, payload: RestaurantCreate) -> Result<Restaurant> {
        Self::ensure_unique_phone(table, &payload.phone_number, None)?;
        let id = table.next_id;
        table.next_id += 1;
        let record = Restaurant::from_create(id, payload, Utc::now());
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    fn update(table: &mut Table, id: u64, patch: RestaurantUpdate) -> Result<Restaurant> {
        if !table.rows.contains_key(&id) {
            return Err(not_found(id));
        }
        if let Some(phone) = &patch.phone_number {
            Self::ensure_unique_phone(table, phone, Some(id))?;
        }
        let record = table.rows.get_mut(&id).ok_or_else(|| not_found(id))?;
        record.apply(patch, Utc::now());
        Ok(record.clone())
    }
}

fn not_found(id: u64) -> CacheError {
    CacheError::NotFound(format!("restaurant {}", id))
}

#[async_trait]
impl RestaurantSource for InMemorySource {
    async fn load(&self, id: u64) -> Result<Restaurant> {
        self.enter().await?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        debug!(id, "source load");

        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn load_list(
        &self,
        filter: &ListFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Restaurant>> {
        self.enter().await?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        debug!(?filter, offset, limit, "source load_list");

        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|r| filter.matches(r))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn mutate(&self, command: Command) -> Result<Restaurant> {
        self.enter().await?;
        let mut table = self.table.write().await;

        match command {
            Command::Create(payload) => Self::create(&mut table, payload),
            Command::Update(id, patch) => Self::update(&mut table, id, patch),
            Command::Delete(id) => table.rows.remove(&id).ok_or_else(|| not_found(id)),
        }
    }
}
