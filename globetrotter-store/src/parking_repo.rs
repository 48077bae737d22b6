use chrono::{NaiveDate, NaiveTime};
use globetrotter_core::parking::{BookingStatus, ParkingBooking, ParkingSlot, SlotStatus};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::StoreResult;

const SLOT_COLUMNS: &str = "id, stop_id, slot_number, location, availability_status, \
                            cost_per_hour_cents, cost_per_day_cents, max_hours, created_at";

const BOOKING_COLUMNS: &str = "id, trip_id, parking_slot_id, start_date, end_date, start_time, \
                               end_time, total_cost_cents, booking_status, created_at";

#[derive(sqlx::FromRow)]
struct SlotRow {
    id: Uuid,
    stop_id: Uuid,
    slot_number: String,
    location: String,
    availability_status: String,
    cost_per_hour_cents: Option<i64>,
    cost_per_day_cents: Option<i64>,
    max_hours: Option<i32>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<SlotRow> for ParkingSlot {
    type Error = globetrotter_core::CoreError;

    fn try_from(row: SlotRow) -> Result<Self, Self::Error> {
        Ok(ParkingSlot {
            id: row.id,
            stop_id: row.stop_id,
            slot_number: row.slot_number,
            location: row.location,
            availability_status: SlotStatus::parse(&row.availability_status)?,
            cost_per_hour_cents: row.cost_per_hour_cents,
            cost_per_day_cents: row.cost_per_day_cents,
            max_hours: row.max_hours,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    trip_id: Uuid,
    parking_slot_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    total_cost_cents: i64,
    booking_status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<BookingRow> for ParkingBooking {
    type Error = globetrotter_core::CoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(ParkingBooking {
            id: row.id,
            trip_id: row.trip_id,
            parking_slot_id: row.parking_slot_id,
            start_date: row.start_date,
            end_date: row.end_date,
            start_time: row.start_time,
            end_time: row.end_time,
            total_cost_cents: row.total_cost_cents,
            booking_status: BookingStatus::parse(&row.booking_status)?,
            created_at: row.created_at,
        })
    }
}

pub struct NewParkingSlot {
    pub stop_id: Uuid,
    pub slot_number: String,
    pub location: String,
    pub cost_per_hour_cents: Option<i64>,
    pub cost_per_day_cents: Option<i64>,
    pub max_hours: Option<i32>,
}

pub struct ParkingRepository;

impl ParkingRepository {
    pub async fn create_slot(pool: &PgPool, new_slot: &NewParkingSlot) -> StoreResult<ParkingSlot> {
        let query = format!(
            "INSERT INTO parking_slots (id, stop_id, slot_number, location,
                                        cost_per_hour_cents, cost_per_day_cents, max_hours)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SLOT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SlotRow>(&query)
            .bind(Uuid::new_v4())
            .bind(new_slot.stop_id)
            .bind(&new_slot.slot_number)
            .bind(&new_slot.location)
            .bind(new_slot.cost_per_hour_cents)
            .bind(new_slot.cost_per_day_cents)
            .bind(new_slot.max_hours)
            .fetch_one(pool)
            .await?;
        Ok(row.try_into()?)
    }

    pub async fn find_slot(pool: &PgPool, id: Uuid) -> StoreResult<Option<ParkingSlot>> {
        let query = format!("SELECT {SLOT_COLUMNS} FROM parking_slots WHERE id = $1");
        let row = sqlx::query_as::<_, SlotRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match row {
            Some(r) => Ok(Some(ParkingSlot::try_from(r)?)),
            None => Ok(None),
        }
    }

    /// Slots at a stop still open for booking.
    pub async fn list_available_slots(
        pool: &PgPool,
        stop_id: Uuid,
    ) -> StoreResult<Vec<ParkingSlot>> {
        let query = format!(
            "SELECT {SLOT_COLUMNS} FROM parking_slots
             WHERE stop_id = $1 AND availability_status = 'available'
             ORDER BY slot_number"
        );
        let rows = sqlx::query_as::<_, SlotRow>(&query)
            .bind(stop_id)
            .fetch_all(pool)
            .await?;
        rows.into_iter()
            .map(|r| ParkingSlot::try_from(r).map_err(Into::into))
            .collect()
    }

    /// Atomically flip a slot from `available` to `booked`. Returns false when
    /// the slot was already taken (or under maintenance), which the caller
    /// must treat as a conflict: two concurrent bookings cannot both win.
    pub async fn try_mark_slot_booked(
        tx: &mut Transaction<'_, Postgres>,
        slot_id: Uuid,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE parking_slots SET availability_status = 'booked'
             WHERE id = $1 AND availability_status = 'available'",
        )
        .bind(slot_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Release a booked slot back to `available` (booking cancellation).
    pub async fn release_slot(
        tx: &mut Transaction<'_, Postgres>,
        slot_id: Uuid,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE parking_slots SET availability_status = 'available'
             WHERE id = $1 AND availability_status = 'booked'",
        )
        .bind(slot_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn insert_booking(
        tx: &mut Transaction<'_, Postgres>,
        booking: &ParkingBooking,
    ) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO parking_bookings (id, trip_id, parking_slot_id, start_date, end_date,
                                           start_time, end_time, total_cost_cents, booking_status,
                                           created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(booking.id)
        .bind(booking.trip_id)
        .bind(booking.parking_slot_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.total_cost_cents)
        .bind(booking.booking_status.as_str())
        .bind(booking.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn find_booking(pool: &PgPool, id: Uuid) -> StoreResult<Option<ParkingBooking>> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM parking_bookings WHERE id = $1");
        let row = sqlx::query_as::<_, BookingRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match row {
            Some(r) => Ok(Some(ParkingBooking::try_from(r)?)),
            None => Ok(None),
        }
    }

    pub async fn list_bookings_for_trip(
        pool: &PgPool,
        trip_id: Uuid,
    ) -> StoreResult<Vec<ParkingBooking>> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM parking_bookings
             WHERE trip_id = $1
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, BookingRow>(&query)
            .bind(trip_id)
            .fetch_all(pool)
            .await?;
        rows.into_iter()
            .map(|r| ParkingBooking::try_from(r).map_err(Into::into))
            .collect()
    }

    /// Transition `confirmed -> cancelled`. Returns false if the booking was
    /// already cancelled.
    pub async fn try_cancel_booking(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: Uuid,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE parking_bookings SET booking_status = 'cancelled'
             WHERE id = $1 AND booking_status = 'confirmed'",
        )
        .bind(booking_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Costs of confirmed bookings for the budget breakdown.
    pub async fn confirmed_booking_costs(pool: &PgPool, trip_id: Uuid) -> StoreResult<Vec<i64>> {
        let rows = sqlx::query_scalar::<_, i64>(
            "SELECT total_cost_cents FROM parking_bookings
             WHERE trip_id = $1 AND booking_status = 'confirmed'",
        )
        .bind(trip_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
