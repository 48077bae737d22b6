use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use globetrotter_core::budget::{self, BudgetTotals};
use globetrotter_core::{money, validate};
use globetrotter_store::budget_repo::{BudgetRepository, NewBudgetRecord};
use globetrotter_store::parking_repo::ParkingRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::trips::{owned_trip, BudgetRecordResponse, MessageResponse};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    pub trip_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BudgetListQuery {
    pub trip_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct BudgetSummaryResponse {
    pub total_transport: f64,
    pub total_stay: f64,
    pub total_activities: f64,
    pub total_meals: f64,
    pub total_parking: f64,
    pub total_cost: f64,
}

impl From<BudgetTotals> for BudgetSummaryResponse {
    fn from(totals: BudgetTotals) -> Self {
        BudgetSummaryResponse {
            total_transport: money::to_major(totals.transport_cents),
            total_stay: money::to_major(totals.stay_cents),
            total_activities: money::to_major(totals.activities_cents),
            total_meals: money::to_major(totals.meals_cents),
            total_parking: money::to_major(totals.parking_cents),
            total_cost: money::to_major(totals.total_cost_cents),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BreakdownBuckets {
    pub transport: f64,
    pub stay: f64,
    pub activities: f64,
    pub meals: f64,
    pub parking: f64,
}

#[derive(Debug, Serialize)]
pub struct BudgetBreakdownResponse {
    pub breakdown: BreakdownBuckets,
    pub total: f64,
}

impl From<BudgetTotals> for BudgetBreakdownResponse {
    fn from(totals: BudgetTotals) -> Self {
        BudgetBreakdownResponse {
            breakdown: BreakdownBuckets {
                transport: money::to_major(totals.transport_cents),
                stay: money::to_major(totals.stay_cents),
                activities: money::to_major(totals.activities_cents),
                meals: money::to_major(totals.meals_cents),
                parking: money::to_major(totals.parking_cents),
            },
            total: money::to_major(totals.total_cost_cents),
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/budget", post(create_record).get(list_records))
        .route("/api/budget/{record_id}", delete(delete_record))
        .route("/api/budget/summary/{trip_id}", get(budget_summary))
        .route("/api/budget/breakdown/{trip_id}", get(budget_breakdown))
}

async fn create_record(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CreateBudgetRequest>,
) -> Result<Json<BudgetRecordResponse>, AppError> {
    owned_trip(&state, req.trip_id, &auth_user).await?;

    let amount_cents = money::to_cents(req.amount);
    validate::non_negative_amount("Budget amount", amount_cents).map_err(AppError::from_core)?;

    let record = BudgetRepository::create(
        &state.db.pool,
        &NewBudgetRecord {
            trip_id: req.trip_id,
            category: req.category,
            amount_cents,
            notes: req.notes,
        },
    )
    .await
    .map_err(AppError::internal)?;

    Ok(Json(record.into()))
}

async fn list_records(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<BudgetListQuery>,
) -> Result<Json<Vec<BudgetRecordResponse>>, AppError> {
    owned_trip(&state, query.trip_id, &auth_user).await?;

    let records = BudgetRepository::list_for_trip(&state.db.pool, query.trip_id)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

async fn delete_record(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let record = BudgetRepository::find(&state.db.pool, record_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Budget record not found".to_string()))?;
    owned_trip(&state, record.trip_id, &auth_user).await?;

    BudgetRepository::delete(&state.db.pool, record_id)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(MessageResponse {
        message: "Budget record deleted".to_string(),
    }))
}

/// Per-bucket totals over the manual records only.
async fn budget_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<BudgetSummaryResponse>, AppError> {
    owned_trip(&state, trip_id, &auth_user).await?;

    let records = BudgetRepository::list_for_trip(&state.db.pool, trip_id)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(budget::summarize(&records).into()))
}

/// Bucket totals with confirmed parking bookings folded into the parking
/// bucket.
async fn budget_breakdown(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<BudgetBreakdownResponse>, AppError> {
    owned_trip(&state, trip_id, &auth_user).await?;

    let records = BudgetRepository::list_for_trip(&state.db.pool, trip_id)
        .await
        .map_err(AppError::internal)?;
    let parking_costs = ParkingRepository::confirmed_booking_costs(&state.db.pool, trip_id)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(budget::breakdown(&records, &parking_costs).into()))
}
