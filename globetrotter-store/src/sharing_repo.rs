use chrono::{DateTime, Utc};
use globetrotter_core::trip::SharedTrip;
use sqlx::PgPool;
use uuid::Uuid;

use crate::StoreResult;

const COLUMNS: &str = "id, trip_id, public_share_token, shared_by_user_id, can_copy, created_at";

#[derive(sqlx::FromRow)]
struct SharedTripRow {
    id: Uuid,
    trip_id: Uuid,
    public_share_token: String,
    shared_by_user_id: Uuid,
    can_copy: bool,
    created_at: DateTime<Utc>,
}

impl From<SharedTripRow> for SharedTrip {
    fn from(row: SharedTripRow) -> Self {
        SharedTrip {
            id: row.id,
            trip_id: row.trip_id,
            public_share_token: row.public_share_token,
            shared_by_user_id: row.shared_by_user_id,
            can_copy: row.can_copy,
            created_at: row.created_at,
        }
    }
}

pub struct SharingRepository;

impl SharingRepository {
    /// Existing share for a trip, if any. Shares are one-per-trip; callers
    /// return this token instead of minting a second one.
    pub async fn find_by_trip(pool: &PgPool, trip_id: Uuid) -> StoreResult<Option<SharedTrip>> {
        let query = format!("SELECT {COLUMNS} FROM shared_trips WHERE trip_id = $1");
        let row = sqlx::query_as::<_, SharedTripRow>(&query)
            .bind(trip_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn find_by_token(pool: &PgPool, token: &str) -> StoreResult<Option<SharedTrip>> {
        let query = format!("SELECT {COLUMNS} FROM shared_trips WHERE public_share_token = $1");
        let row = sqlx::query_as::<_, SharedTripRow>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn create(
        pool: &PgPool,
        trip_id: Uuid,
        token: &str,
        shared_by_user_id: Uuid,
    ) -> StoreResult<SharedTrip> {
        let query = format!(
            "INSERT INTO shared_trips (id, trip_id, public_share_token, shared_by_user_id, can_copy)
             VALUES ($1, $2, $3, $4, TRUE)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SharedTripRow>(&query)
            .bind(Uuid::new_v4())
            .bind(trip_id)
            .bind(token)
            .bind(shared_by_user_id)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }
}
