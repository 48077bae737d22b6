use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The parent entity of the system: User -> Trip -> Stops -> Activities,
/// with budget records and parking bookings hanging off the trip.
#[derive(Debug, Clone, Serialize)]
pub struct Trip {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_limit_cents: Option<i64>,
    pub cover_photo_url: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl Trip {
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

#[derive(Debug)]
pub struct NewTrip {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_limit_cents: Option<i64>,
    pub cover_photo_url: Option<String>,
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Default)]
pub struct TripUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget_limit_cents: Option<i64>,
    pub cover_photo_url: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SharedTrip {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub public_share_token: String,
    pub shared_by_user_id: Uuid,
    pub can_copy: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_duration_days() {
        let trip = Trip {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Test".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            budget_limit_cents: Some(100_000),
            cover_photo_url: None,
            is_public: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_deleted: false,
        };
        assert_eq!(trip.duration_days(), 4);
    }
}
