use axum::{extract::State, routing::get, Json, Router};
use globetrotter_core::money;
use globetrotter_store::stats_repo::{GroupCount, StatsRepository};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PlatformStatsResponse {
    pub total_users: i64,
    pub total_trips: i64,
    pub total_stops: i64,
    pub total_activities: i64,
    pub avg_trip_duration_days: f64,
    pub avg_budget: f64,
}

#[derive(Debug, Serialize)]
pub struct DestinationCount {
    pub city: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct UserTripCount {
    pub user_email: String,
    pub trip_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/stats", get(platform_stats))
        .route("/api/admin/popular-destinations", get(popular_destinations))
        .route("/api/admin/top-users", get(top_users))
        .route("/api/admin/activity-analytics", get(activity_analytics))
}

async fn platform_stats(
    State(state): State<AppState>,
) -> Result<Json<PlatformStatsResponse>, AppError> {
    let counts = StatsRepository::platform_counts(&state.db.pool)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(PlatformStatsResponse {
        total_users: counts.total_users,
        total_trips: counts.total_trips,
        total_stops: counts.total_stops,
        total_activities: counts.total_activities,
        avg_trip_duration_days: money::round2(counts.avg_trip_duration_days),
        avg_budget: money::round2(counts.avg_budget_cents / 100.0),
    }))
}

async fn popular_destinations(
    State(state): State<AppState>,
) -> Result<Json<Vec<DestinationCount>>, AppError> {
    let rows = StatsRepository::popular_destinations(&state.db.pool)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(
        rows.into_iter()
            .map(|GroupCount { label, count }| DestinationCount { city: label, count })
            .collect(),
    ))
}

async fn top_users(State(state): State<AppState>) -> Result<Json<Vec<UserTripCount>>, AppError> {
    let rows = StatsRepository::top_users(&state.db.pool)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(
        rows.into_iter()
            .map(|GroupCount { label, count }| UserTripCount {
                user_email: label,
                trip_count: count,
            })
            .collect(),
    ))
}

async fn activity_analytics(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryCount>>, AppError> {
    let rows = StatsRepository::activity_analytics(&state.db.pool)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(
        rows.into_iter()
            .map(|GroupCount { label, count }| CategoryCount {
                category: label,
                count,
            })
            .collect(),
    ))
}
