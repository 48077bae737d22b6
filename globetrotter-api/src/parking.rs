use axum::{
    extract::{Path, Query, State},
    routing::post,
    Extension, Json, Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use globetrotter_core::money;
use globetrotter_core::parking::{self, BookingStatus, ParkingBooking, ParkingSlot};
use globetrotter_store::parking_repo::{NewParkingSlot, ParkingRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::stops::owned_stop;
use crate::trips::owned_trip;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSlotRequest {
    pub stop_id: Uuid,
    pub slot_number: String,
    pub location: String,
    pub cost_per_hour: Option<f64>,
    pub cost_per_day: Option<f64>,
    pub max_hours: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SlotListQuery {
    pub stop_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub trip_id: Uuid,
    pub parking_slot_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub trip_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub id: Uuid,
    pub stop_id: Uuid,
    pub slot_number: String,
    pub location: String,
    pub availability_status: String,
    pub cost_per_hour: Option<f64>,
    pub cost_per_day: Option<f64>,
    pub max_hours: Option<i32>,
}

impl From<ParkingSlot> for SlotResponse {
    fn from(slot: ParkingSlot) -> Self {
        SlotResponse {
            id: slot.id,
            stop_id: slot.stop_id,
            slot_number: slot.slot_number,
            location: slot.location,
            availability_status: slot.availability_status.as_str().to_string(),
            cost_per_hour: money::opt_to_major(slot.cost_per_hour_cents),
            cost_per_day: money::opt_to_major(slot.cost_per_day_cents),
            max_hours: slot.max_hours,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub parking_slot_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub total_cost: f64,
    pub booking_status: String,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<ParkingBooking> for BookingResponse {
    fn from(booking: ParkingBooking) -> Self {
        BookingResponse {
            id: booking.id,
            trip_id: booking.trip_id,
            parking_slot_id: booking.parking_slot_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            total_cost: money::to_major(booking.total_cost_cents),
            booking_status: booking.booking_status.as_str().to_string(),
            created_at: booking.created_at,
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/parking/slots", post(create_slot).get(list_slots))
        .route(
            "/api/parking/bookings",
            post(create_booking).get(list_bookings),
        )
        .route(
            "/api/parking/bookings/{booking_id}/cancel",
            post(cancel_booking),
        )
}

async fn create_slot(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CreateSlotRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    owned_stop(&state, req.stop_id, &auth_user).await?;

    let slot = ParkingRepository::create_slot(
        &state.db.pool,
        &NewParkingSlot {
            stop_id: req.stop_id,
            slot_number: req.slot_number,
            location: req.location,
            cost_per_hour_cents: money::opt_to_cents(req.cost_per_hour),
            cost_per_day_cents: money::opt_to_cents(req.cost_per_day),
            max_hours: req.max_hours,
        },
    )
    .await
    .map_err(AppError::internal)?;

    Ok(Json(slot.into()))
}

async fn list_slots(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<SlotListQuery>,
) -> Result<Json<Vec<SlotResponse>>, AppError> {
    owned_stop(&state, query.stop_id, &auth_user).await?;

    let slots = ParkingRepository::list_available_slots(&state.db.pool, query.stop_id)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(slots.into_iter().map(Into::into).collect()))
}

/// Book a parking slot. The slot is flipped to `booked` with a conditional
/// update inside the same transaction as the booking insert, so two requests
/// racing for one slot cannot both succeed.
async fn create_booking(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    owned_trip(&state, req.trip_id, &auth_user).await?;

    let slot = ParkingRepository::find_slot(&state.db.pool, req.parking_slot_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Parking slot not found".to_string()))?;

    let total_cost_cents =
        parking::booking_cost_cents(req.start_date, req.end_date, slot.cost_per_day_cents)
            .map_err(AppError::from_core)?;

    let mut tx = state.db.pool.begin().await.map_err(AppError::internal)?;

    let won = ParkingRepository::try_mark_slot_booked(&mut tx, slot.id)
        .await
        .map_err(AppError::internal)?;
    if !won {
        return Err(AppError::ConflictError(
            "Parking slot is not available".to_string(),
        ));
    }

    let booking = ParkingBooking {
        id: Uuid::new_v4(),
        trip_id: req.trip_id,
        parking_slot_id: slot.id,
        start_date: req.start_date,
        end_date: req.end_date,
        start_time: req.start_time,
        end_time: req.end_time,
        total_cost_cents,
        booking_status: BookingStatus::Confirmed,
        created_at: Utc::now(),
    };
    ParkingRepository::insert_booking(&mut tx, &booking)
        .await
        .map_err(AppError::internal)?;

    tx.commit().await.map_err(AppError::internal)?;

    tracing::info!("Parking booking created: {} slot {}", booking.id, slot.id);
    Ok(Json(booking.into()))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    owned_trip(&state, query.trip_id, &auth_user).await?;

    let bookings = ParkingRepository::list_bookings_for_trip(&state.db.pool, query.trip_id)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = ParkingRepository::find_booking(&state.db.pool, booking_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;
    owned_trip(&state, booking.trip_id, &auth_user).await?;

    let mut tx = state.db.pool.begin().await.map_err(AppError::internal)?;

    let cancelled = ParkingRepository::try_cancel_booking(&mut tx, booking_id)
        .await
        .map_err(AppError::internal)?;
    if !cancelled {
        return Err(AppError::ConflictError(
            "Booking is already cancelled".to_string(),
        ));
    }
    ParkingRepository::release_slot(&mut tx, booking.parking_slot_id)
        .await
        .map_err(AppError::internal)?;

    tx.commit().await.map_err(AppError::internal)?;

    let updated = ParkingRepository::find_booking(&state.db.pool, booking_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;
    Ok(Json(updated.into()))
}
