//! Demo restaurants used by `POST /demo/sample-data`

use chrono::NaiveTime;

use crate::models::RestaurantCreate;

fn at(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn restaurant(
    name: &str,
    cuisine: &str,
    address: &str,
    phone: &str,
    rating: f64,
    hours: (u32, u32),
) -> RestaurantCreate {
    RestaurantCreate {
        name: name.to_string(),
        description: None,
        cuisine_type: cuisine.to_string(),
        address: address.to_string(),
        phone_number: phone.to_string(),
        rating,
        is_active: true,
        opening_time: at(hours.0),
        closing_time: at(hours.1),
    }
}

/// A small fixed catalogue. Phone numbers are unique.
pub fn sample_restaurants() -> Vec<RestaurantCreate> {
    let mut closed = restaurant(
        "Old Town Diner",
        "American",
        "3 Market Square",
        "+44 555 0103",
        3.2,
        (7, 15),
    );
    closed.is_active = false;

    vec![
        restaurant("Pasta Palace", "Italian", "12 Via Roma", "+44 555 0100", 4.4, (11, 22)),
        restaurant("Sushi Central", "Japanese", "8 Harbour Road", "+44 555 0101", 4.7, (12, 23)),
        restaurant("Trattoria Nonna", "Italian", "41 Elm Street", "+44 555 0102", 4.1, (12, 22)),
        closed,
        restaurant("Bangkok Street", "Thai", "19 Canal Walk", "+44 555 0104", 4.5, (11, 23)),
    ]
}
