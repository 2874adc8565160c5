//! Restaurant record and write payloads

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A restaurant as stored by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cuisine_type: String,
    pub address: String,
    pub phone_number: String,
    pub rating: f64,
    pub is_active: bool,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// Builds a new record from a create payload.
    pub fn from_create(id: u64, payload: RestaurantCreate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: payload.name,
            description: payload.description,
            cuisine_type: payload.cuisine_type,
            address: payload.address,
            phone_number: payload.phone_number,
            rating: payload.rating,
            is_active: payload.is_active,
            opening_time: payload.opening_time,
            closing_time: payload.closing_time,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the fields present in `patch` and bumps `updated_at`.
    pub fn apply(&mut self, patch: RestaurantUpdate, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(cuisine_type) = patch.cuisine_type {
            self.cuisine_type = cuisine_type;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = phone_number;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(opening_time) = patch.opening_time {
            self.opening_time = opening_time;
        }
        if let Some(closing_time) = patch.closing_time {
            self.closing_time = closing_time;
        }
        self.updated_at = now;
    }
}

fn default_active() -> bool {
    true
}

/// Request body for `POST /restaurants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cuisine_type: String,
    pub address: String,
    pub phone_number: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl RestaurantCreate {
    /// Returns an error message if the payload is unusable, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Name cannot be empty".to_string());
        }
        if self.phone_number.trim().is_empty() {
            return Some("Phone number cannot be empty".to_string());
        }
        validate_rating(self.rating)
    }
}

/// Request body for `PUT /restaurants/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub opening_time: Option<NaiveTime>,
    #[serde(default)]
    pub closing_time: Option<NaiveTime>,
}

impl RestaurantUpdate {
    pub fn validate(&self) -> Option<String> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Some("Name cannot be empty".to_string());
        }
        self.rating.and_then(validate_rating)
    }
}

fn validate_rating(rating: f64) -> Option<String> {
    if (0.0..=5.0).contains(&rating) {
        None
    } else {
        Some(format!("Rating must be between 0 and 5, got {}", rating))
    }
}
