use axum::{
    extract::{Path, Query, State},
    routing::{post, put},
    Extension, Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use globetrotter_core::activity::{Activity, NewActivity};
use globetrotter_core::{money, validate};
use globetrotter_store::activity_repo::ActivityRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::stops::owned_stop;
use crate::trips::MessageResponse;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub stop_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub duration_hours: Option<f64>,
    pub date_scheduled: NaiveDate,
    pub time_start: Option<NaiveTime>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityListQuery {
    pub stop_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub stop_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub duration_hours: Option<f64>,
    pub date_scheduled: NaiveDate,
    pub time_start: Option<NaiveTime>,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        ActivityResponse {
            id: activity.id,
            stop_id: activity.stop_id,
            name: activity.name,
            category: activity.category,
            description: activity.description,
            cost: money::opt_to_major(activity.cost_cents),
            duration_hours: activity.duration_hours,
            date_scheduled: activity.date_scheduled,
            time_start: activity.time_start,
            image_url: activity.image_url,
            created_at: activity.created_at,
        }
    }
}

fn validated_payload(req: CreateActivityRequest) -> Result<NewActivity, AppError> {
    let cost_cents = money::opt_to_cents(req.cost);
    if let Some(cents) = cost_cents {
        validate::non_negative_amount("Activity cost", cents).map_err(AppError::from_core)?;
    }
    if let Some(hours) = req.duration_hours {
        validate::activity_duration(hours).map_err(AppError::from_core)?;
    }

    Ok(NewActivity {
        stop_id: req.stop_id,
        name: req.name,
        category: req.category,
        description: req.description,
        cost_cents,
        duration_hours: req.duration_hours,
        date_scheduled: req.date_scheduled,
        time_start: req.time_start,
        image_url: req.image_url,
    })
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/activities", post(create_activity).get(list_activities))
        .route(
            "/api/activities/{activity_id}",
            put(update_activity).delete(delete_activity),
        )
}

async fn create_activity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CreateActivityRequest>,
) -> Result<Json<ActivityResponse>, AppError> {
    owned_stop(&state, req.stop_id, &auth_user).await?;
    let payload = validated_payload(req)?;

    let activity = ActivityRepository::create(&state.db.pool, &payload)
        .await
        .map_err(AppError::internal)?;

    tracing::info!("Activity created: {}", activity.id);
    Ok(Json(activity.into()))
}

async fn list_activities(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ActivityListQuery>,
) -> Result<Json<Vec<ActivityResponse>>, AppError> {
    owned_stop(&state, query.stop_id, &auth_user).await?;

    let activities = ActivityRepository::list_for_stop(&state.db.pool, query.stop_id)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(activities.into_iter().map(Into::into).collect()))
}

async fn update_activity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(activity_id): Path<Uuid>,
    Json(req): Json<CreateActivityRequest>,
) -> Result<Json<ActivityResponse>, AppError> {
    let existing = ActivityRepository::find(&state.db.pool, activity_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Activity not found".to_string()))?;
    owned_stop(&state, existing.stop_id, &auth_user).await?;

    let payload = validated_payload(req)?;
    let activity = ActivityRepository::update(&state.db.pool, activity_id, &payload)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Activity not found".to_string()))?;
    Ok(Json(activity.into()))
}

async fn delete_activity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let existing = ActivityRepository::find(&state.db.pool, activity_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Activity not found".to_string()))?;
    owned_stop(&state, existing.stop_id, &auth_user).await?;

    ActivityRepository::delete(&state.db.pool, activity_id)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(MessageResponse {
        message: "Activity deleted".to_string(),
    }))
}
