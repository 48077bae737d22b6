use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A city/location within a trip. `sequence_order` defines the position in
/// the itinerary; uniqueness within a trip is the caller's responsibility.
#[derive(Debug, Clone, Serialize)]
pub struct Stop {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub city_name: String,
    pub country: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub sequence_order: i32,
    pub cost_index: Option<f64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewStop {
    pub trip_id: Uuid,
    pub city_name: String,
    pub country: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub sequence_order: i32,
    pub cost_index: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct StopUpdate {
    pub city_name: String,
    pub country: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub sequence_order: i32,
}
