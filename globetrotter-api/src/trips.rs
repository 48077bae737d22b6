use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use globetrotter_core::budget::BudgetRecord;
use globetrotter_core::trip::{NewTrip, Trip, TripUpdate};
use globetrotter_core::{money, validate};
use globetrotter_store::activity_repo::ActivityRepository;
use globetrotter_store::budget_repo::BudgetRepository;
use globetrotter_store::stop_repo::StopRepository;
use globetrotter_store::trip_repo::TripRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::activities::ActivityResponse;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::stops::StopResponse;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_limit: Option<f64>,
    pub cover_photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTripRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget_limit: Option<f64>,
    pub cover_photo_url: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_limit: Option<f64>,
    pub cover_photo_url: Option<String>,
    pub is_public: bool,
    pub is_deleted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        TripResponse {
            id: trip.id,
            user_id: trip.user_id,
            name: trip.name,
            description: trip.description,
            start_date: trip.start_date,
            end_date: trip.end_date,
            budget_limit: money::opt_to_major(trip.budget_limit_cents),
            cover_photo_url: trip.cover_photo_url,
            is_public: trip.is_public,
            is_deleted: trip.is_deleted,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BudgetRecordResponse {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub date: chrono::DateTime<chrono::Utc>,
    pub notes: Option<String>,
}

impl From<BudgetRecord> for BudgetRecordResponse {
    fn from(record: BudgetRecord) -> Self {
        BudgetRecordResponse {
            id: record.id,
            trip_id: record.trip_id,
            category: record.category,
            amount: money::to_major(record.amount_cents),
            date: record.date,
            notes: record.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TripBudgetSection {
    pub records: Vec<BudgetRecordResponse>,
    pub total: f64,
}

#[derive(Debug, Serialize)]
pub struct TripSummaryResponse {
    pub trip: TripResponse,
    pub stops: Vec<StopResponse>,
    pub activities: Vec<ActivityResponse>,
    pub budget: TripBudgetSection,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Ownership helper
// ============================================================================

/// Load a non-deleted trip and verify the caller owns it. Shared by every
/// handler operating on trip-scoped children (budget, parking, sharing).
pub async fn owned_trip(
    state: &AppState,
    trip_id: Uuid,
    auth_user: &AuthUser,
) -> Result<Trip, AppError> {
    let trip = TripRepository::find_active(&state.db.pool, trip_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Trip not found".to_string()))?;

    if trip.user_id != auth_user.id {
        return Err(AppError::AuthorizationError(
            "Trip does not belong to you".to_string(),
        ));
    }
    Ok(trip)
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/trips", post(create_trip).get(list_trips))
        .route(
            "/api/trips/{trip_id}",
            get(get_trip).put(update_trip).delete(delete_trip),
        )
        .route("/api/trips/{trip_id}/summary", get(trip_summary))
}

async fn create_trip(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CreateTripRequest>,
) -> Result<Json<TripResponse>, AppError> {
    validate::date_range(req.start_date, req.end_date).map_err(AppError::from_core)?;
    let budget_limit_cents = money::opt_to_cents(req.budget_limit);
    if let Some(cents) = budget_limit_cents {
        validate::budget_limit(cents).map_err(AppError::from_core)?;
    }

    let trip = TripRepository::create(
        &state.db.pool,
        &NewTrip {
            user_id: auth_user.id,
            name: req.name,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            budget_limit_cents,
            cover_photo_url: req.cover_photo_url,
        },
    )
    .await
    .map_err(AppError::internal)?;

    tracing::info!("Trip created: {}", trip.id);
    Ok(Json(trip.into()))
}

async fn list_trips(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    let trips = TripRepository::list_for_user(&state.db.pool, auth_user.id)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(trips.into_iter().map(Into::into).collect()))
}

async fn get_trip(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripResponse>, AppError> {
    let trip = owned_trip(&state, trip_id, &auth_user).await?;
    Ok(Json(trip.into()))
}

async fn update_trip(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(trip_id): Path<Uuid>,
    Json(req): Json<UpdateTripRequest>,
) -> Result<Json<TripResponse>, AppError> {
    let existing = owned_trip(&state, trip_id, &auth_user).await?;

    // Validate the date range that would result from the update
    let start = req.start_date.unwrap_or(existing.start_date);
    let end = req.end_date.unwrap_or(existing.end_date);
    validate::date_range(start, end).map_err(AppError::from_core)?;

    let budget_limit_cents = money::opt_to_cents(req.budget_limit);
    if let Some(cents) = budget_limit_cents {
        validate::budget_limit(cents).map_err(AppError::from_core)?;
    }

    let update = TripUpdate {
        name: req.name,
        description: req.description,
        start_date: req.start_date,
        end_date: req.end_date,
        budget_limit_cents,
        cover_photo_url: req.cover_photo_url,
        is_public: req.is_public,
    };

    let trip = TripRepository::update(&state.db.pool, trip_id, &update)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Trip not found".to_string()))?;
    Ok(Json(trip.into()))
}

async fn delete_trip(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    owned_trip(&state, trip_id, &auth_user).await?;

    let deleted = TripRepository::soft_delete(&state.db.pool, trip_id)
        .await
        .map_err(AppError::internal)?;
    if !deleted {
        return Err(AppError::NotFoundError("Trip not found".to_string()));
    }

    tracing::info!("Trip soft-deleted: {}", trip_id);
    Ok(Json(MessageResponse {
        message: "Trip deleted successfully".to_string(),
    }))
}

/// Complete trip view: trip, ordered stops, their activities, and the budget
/// records with their grand total.
async fn trip_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripSummaryResponse>, AppError> {
    let trip = owned_trip(&state, trip_id, &auth_user).await?;

    let stops = StopRepository::list_for_trip(&state.db.pool, trip_id)
        .await
        .map_err(AppError::internal)?;
    let activities = ActivityRepository::list_for_trip(&state.db.pool, trip_id)
        .await
        .map_err(AppError::internal)?;
    let records = BudgetRepository::list_for_trip(&state.db.pool, trip_id)
        .await
        .map_err(AppError::internal)?;

    let total_cents: i64 = records.iter().map(|r| r.amount_cents).sum();

    Ok(Json(TripSummaryResponse {
        trip: trip.into(),
        stops: stops.into_iter().map(Into::into).collect(),
        activities: activities.into_iter().map(Into::into).collect(),
        budget: TripBudgetSection {
            records: records.into_iter().map(Into::into).collect(),
            total: money::to_major(total_cents),
        },
    }))
}
