use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use globetrotter_core::trip::NewTrip;
use globetrotter_store::activity_repo::ActivityRepository;
use globetrotter_store::sharing_repo::SharingRepository;
use globetrotter_store::stop_repo::StopRepository;
use globetrotter_store::trip_repo::TripRepository;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::activities::ActivityResponse;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::stops::StopResponse;
use crate::trips::{owned_trip, TripResponse};

const SHARE_TOKEN_LENGTH: usize = 48;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub share_token: String,
    pub share_url: String,
}

#[derive(Debug, Serialize)]
pub struct PublicTripResponse {
    pub trip: TripResponse,
    pub stops: Vec<StopResponse>,
    pub activities: Vec<ActivityResponse>,
    pub can_copy: bool,
}

#[derive(Debug, Serialize)]
pub struct CopyResponse {
    pub message: String,
    pub new_trip_id: Uuid,
}

fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHARE_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

// ============================================================================
// Routes
// ============================================================================

/// Routes that require a logged-in user.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sharing/{trip_id}", post(share_trip))
        .route("/api/sharing/copy/{token}", post(copy_trip))
}

/// The public trip view, reachable without a token header.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/api/sharing/public/{token}", get(view_shared_trip))
}

/// Create (or return the existing) share link for a trip. Sharing twice
/// hands back the same token.
async fn share_trip(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<ShareResponse>, AppError> {
    owned_trip(&state, trip_id, &auth_user).await?;

    let existing = SharingRepository::find_by_trip(&state.db.pool, trip_id)
        .await
        .map_err(AppError::internal)?;
    let share = match existing {
        Some(share) => share,
        None => {
            let token = generate_token();
            match SharingRepository::create(&state.db.pool, trip_id, &token, auth_user.id).await {
                Ok(share) => share,
                // A concurrent request created the share first; `trip_id` is
                // unique, so re-read theirs
                Err(e) if globetrotter_store::is_unique_violation(e.as_ref()) => {
                    SharingRepository::find_by_trip(&state.db.pool, trip_id)
                        .await
                        .map_err(AppError::internal)?
                        .ok_or_else(|| {
                            AppError::InternalServerError("Share vanished after conflict".to_string())
                        })?
                }
                Err(e) => return Err(AppError::internal(e)),
            }
        }
    };

    let share_url = format!("/share/{}", share.public_share_token);
    Ok(Json(ShareResponse {
        share_token: share.public_share_token,
        share_url,
    }))
}

async fn view_shared_trip(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<PublicTripResponse>, AppError> {
    let share = SharingRepository::find_by_token(&state.db.pool, &token)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Shared trip not found".to_string()))?;

    let trip = TripRepository::find_active(&state.db.pool, share.trip_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Shared trip not found".to_string()))?;

    let stops = StopRepository::list_for_trip(&state.db.pool, trip.id)
        .await
        .map_err(AppError::internal)?;
    let activities = ActivityRepository::list_for_trip(&state.db.pool, trip.id)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(PublicTripResponse {
        trip: trip.into(),
        stops: stops.into_iter().map(Into::into).collect(),
        activities: activities.into_iter().map(Into::into).collect(),
        can_copy: share.can_copy,
    }))
}

/// Copy a shared trip into the caller's account. Only the trip shell is
/// copied; stops and activities stay with the original.
async fn copy_trip(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(token): Path<String>,
) -> Result<Json<CopyResponse>, AppError> {
    let share = SharingRepository::find_by_token(&state.db.pool, &token)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Shared trip not found".to_string()))?;
    if !share.can_copy {
        return Err(AppError::AuthorizationError(
            "Trip cannot be copied".to_string(),
        ));
    }

    let source = TripRepository::find_active(&state.db.pool, share.trip_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("Shared trip not found".to_string()))?;

    let copy = TripRepository::create(
        &state.db.pool,
        &NewTrip {
            user_id: auth_user.id,
            name: format!("{} (Copy)", source.name),
            description: source.description.clone(),
            start_date: source.start_date,
            end_date: source.end_date,
            budget_limit_cents: source.budget_limit_cents,
            cover_photo_url: None,
        },
    )
    .await
    .map_err(AppError::internal)?;

    tracing::info!("Trip {} copied as {}", source.id, copy.id);
    Ok(Json(CopyResponse {
        message: "Trip copied".to_string(),
        new_trip_id: copy.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), SHARE_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }
}
