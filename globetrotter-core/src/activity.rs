use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Recommended activity categories. Free text is accepted; this set drives
/// the analytics grouping and frontend pickers.
pub const ACTIVITY_CATEGORIES: &[&str] = &[
    "sightseeing",
    "food",
    "adventure",
    "shopping",
    "culture",
    "nightlife",
    "sports",
    "relaxation",
];

/// Something to do at a stop: Eiffel Tower, Louvre, a river cruise.
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub id: Uuid,
    pub stop_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cost_cents: Option<i64>,
    pub duration_hours: Option<f64>,
    pub date_scheduled: NaiveDate,
    pub time_start: Option<NaiveTime>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewActivity {
    pub stop_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cost_cents: Option<i64>,
    pub duration_hours: Option<f64>,
    pub date_scheduled: NaiveDate,
    pub time_start: Option<NaiveTime>,
    pub image_url: Option<String>,
}
