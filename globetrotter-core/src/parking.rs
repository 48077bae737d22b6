use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Maintenance,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Booked => "booked",
            SlotStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "available" => Ok(SlotStatus::Available),
            "booked" => Ok(SlotStatus::Booked),
            "maintenance" => Ok(SlotStatus::Maintenance),
            other => Err(CoreError::InternalError(format!(
                "unknown slot status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(CoreError::InternalError(format!(
                "unknown booking status: {}",
                other
            ))),
        }
    }
}

/// A parking space at a stop, with hourly/daily rates.
#[derive(Debug, Clone, Serialize)]
pub struct ParkingSlot {
    pub id: Uuid,
    pub stop_id: Uuid,
    pub slot_number: String,
    pub location: String,
    pub availability_status: SlotStatus,
    pub cost_per_hour_cents: Option<i64>,
    pub cost_per_day_cents: Option<i64>,
    pub max_hours: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// A reservation of one slot for one trip's date range.
#[derive(Debug, Clone, Serialize)]
pub struct ParkingBooking {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub parking_slot_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub total_cost_cents: i64,
    pub booking_status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Total cost of booking a slot for the given range: whole days times the
/// daily rate. A slot with no daily rate books for free.
///
/// The range must span at least one day.
pub fn booking_cost_cents(
    start_date: NaiveDate,
    end_date: NaiveDate,
    cost_per_day_cents: Option<i64>,
) -> CoreResult<i64> {
    let days = (end_date - start_date).num_days();
    if days <= 0 {
        return Err(CoreError::ValidationError(
            "Booking end date must be after start date".to_string(),
        ));
    }
    Ok(days * cost_per_day_cents.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_booking_cost_four_days() {
        // June 1 -> June 5 at $30/day is 4 days = $120.
        let cost = booking_cost_cents(d(2024, 6, 1), d(2024, 6, 5), Some(3000)).unwrap();
        assert_eq!(cost, 12000);
    }

    #[test]
    fn test_booking_cost_no_daily_rate() {
        let cost = booking_cost_cents(d(2024, 6, 1), d(2024, 6, 3), None).unwrap();
        assert_eq!(cost, 0);
    }

    #[test]
    fn test_booking_cost_rejects_empty_range() {
        assert!(booking_cost_cents(d(2024, 6, 5), d(2024, 6, 5), Some(3000)).is_err());
        assert!(booking_cost_cents(d(2024, 6, 5), d(2024, 6, 1), Some(3000)).is_err());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            SlotStatus::parse(SlotStatus::Booked.as_str()).unwrap(),
            SlotStatus::Booked
        );
        assert_eq!(
            BookingStatus::parse("cancelled").unwrap(),
            BookingStatus::Cancelled
        );
        assert!(SlotStatus::parse("gone").is_err());
    }
}
