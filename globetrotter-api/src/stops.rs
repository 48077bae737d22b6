use axum::{
    extract::{Path, Query, State},
    routing::{post, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use globetrotter_core::stop::{NewStop, Stop, StopUpdate};
use globetrotter_core::validate;
use globetrotter_store::stop_repo::StopRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::trips::{owned_trip, MessageResponse};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateStopRequest {
    pub trip_id: Uuid,
    pub city_name: String,
    pub country: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub sequence_order: i32,
    pub cost_index: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStopRequest {
    pub city_name: String,
    pub country: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub sequence_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct StopListQuery {
    pub trip_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub stop_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub city_name: String,
    pub country: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub sequence_order: i32,
    pub cost_index: Option<f64>,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Stop> for StopResponse {
    fn from(stop: Stop) -> Self {
        StopResponse {
            id: stop.id,
            trip_id: stop.trip_id,
            city_name: stop.city_name,
            country: stop.country,
            arrival_date: stop.arrival_date,
            departure_date: stop.departure_date,
            sequence_order: stop.sequence_order,
            cost_index: stop.cost_index,
            description: stop.description,
            created_at: stop.created_at,
        }
    }
}

// ============================================================================
// Ownership helper
// ============================================================================

/// Resolve a stop and verify the caller owns its trip. Returns the stop.
pub async fn owned_stop(
    state: &AppState,
    stop_id: Uuid,
    auth_user: &AuthUser,
) -> Result<Stop, AppError> {
    let stop = StopRepository::find(&state.db.pool, stop_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Stop not found".to_string()))?;

    let (_, owner_id) = StopRepository::trip_owner(&state.db.pool, stop_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Trip not found".to_string()))?;

    if owner_id != auth_user.id {
        return Err(AppError::AuthorizationError(
            "Stop does not belong to you".to_string(),
        ));
    }
    Ok(stop)
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/stops", post(create_stop).get(list_stops))
        .route("/api/stops/{stop_id}", put(update_stop).delete(delete_stop))
        .route("/api/stops/reorder/{trip_id}", put(reorder_stops))
}

async fn create_stop(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CreateStopRequest>,
) -> Result<Json<StopResponse>, AppError> {
    owned_trip(&state, req.trip_id, &auth_user).await?;
    validate::date_range(req.arrival_date, req.departure_date).map_err(AppError::from_core)?;

    let stop = StopRepository::create(
        &state.db.pool,
        &NewStop {
            trip_id: req.trip_id,
            city_name: req.city_name,
            country: req.country,
            arrival_date: req.arrival_date,
            departure_date: req.departure_date,
            sequence_order: req.sequence_order,
            cost_index: req.cost_index,
            description: req.description,
        },
    )
    .await
    .map_err(AppError::internal)?;

    Ok(Json(stop.into()))
}

async fn list_stops(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<StopListQuery>,
) -> Result<Json<Vec<StopResponse>>, AppError> {
    owned_trip(&state, query.trip_id, &auth_user).await?;

    let stops = StopRepository::list_for_trip(&state.db.pool, query.trip_id)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(stops.into_iter().map(Into::into).collect()))
}

async fn update_stop(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(stop_id): Path<Uuid>,
    Json(req): Json<UpdateStopRequest>,
) -> Result<Json<StopResponse>, AppError> {
    owned_stop(&state, stop_id, &auth_user).await?;
    validate::date_range(req.arrival_date, req.departure_date).map_err(AppError::from_core)?;

    let stop = StopRepository::update(
        &state.db.pool,
        stop_id,
        &StopUpdate {
            city_name: req.city_name,
            country: req.country,
            arrival_date: req.arrival_date,
            departure_date: req.departure_date,
            sequence_order: req.sequence_order,
        },
    )
    .await
    .map_err(AppError::internal)?
    .ok_or_else(|| AppError::NotFoundError("Stop not found".to_string()))?;

    Ok(Json(stop.into()))
}

/// Hard delete: the schema cascades the stop's activities and parking slots.
async fn delete_stop(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(stop_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    owned_stop(&state, stop_id, &auth_user).await?;

    let deleted = StopRepository::delete(&state.db.pool, stop_id)
        .await
        .map_err(AppError::internal)?;
    if !deleted {
        return Err(AppError::NotFoundError("Stop not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Stop deleted".to_string(),
    }))
}

async fn reorder_stops(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(trip_id): Path<Uuid>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    owned_trip(&state, trip_id, &auth_user).await?;

    let mut tx = state.db.pool.begin().await?;
    StopRepository::reorder(&mut tx, trip_id, &req.stop_ids)
        .await
        .map_err(AppError::internal)?;
    tx.commit().await?;

    Ok(Json(MessageResponse {
        message: "Stops reordered".to_string(),
    }))
}
