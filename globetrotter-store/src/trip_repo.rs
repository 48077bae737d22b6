use globetrotter_core::trip::{NewTrip, Trip, TripUpdate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::StoreResult;

const COLUMNS: &str = "id, user_id, name, description, start_date, end_date, budget_limit_cents, \
                       cover_photo_url, is_public, created_at, updated_at, is_deleted";

#[derive(sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: Option<String>,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    budget_limit_cents: Option<i64>,
    cover_photo_url: Option<String>,
    is_public: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    is_deleted: bool,
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Trip {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            budget_limit_cents: row.budget_limit_cents,
            cover_photo_url: row.cover_photo_url,
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_deleted: row.is_deleted,
        }
    }
}

pub struct TripRepository;

impl TripRepository {
    pub async fn create(pool: &PgPool, new_trip: &NewTrip) -> StoreResult<Trip> {
        let query = format!(
            "INSERT INTO trips (id, user_id, name, description, start_date, end_date,
                                budget_limit_cents, cover_photo_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TripRow>(&query)
            .bind(Uuid::new_v4())
            .bind(new_trip.user_id)
            .bind(&new_trip.name)
            .bind(&new_trip.description)
            .bind(new_trip.start_date)
            .bind(new_trip.end_date)
            .bind(new_trip.budget_limit_cents)
            .bind(&new_trip.cover_photo_url)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Non-deleted trips for one user, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> StoreResult<Vec<Trip>> {
        let query = format!(
            "SELECT {COLUMNS} FROM trips
             WHERE user_id = $1 AND is_deleted = FALSE
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, TripRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Find a trip, excluding soft-deleted rows.
    pub async fn find_active(pool: &PgPool, id: Uuid) -> StoreResult<Option<Trip>> {
        let query = format!("SELECT {COLUMNS} FROM trips WHERE id = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, TripRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn update(pool: &PgPool, id: Uuid, update: &TripUpdate) -> StoreResult<Option<Trip>> {
        let query = format!(
            "UPDATE trips SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                budget_limit_cents = COALESCE($6, budget_limit_cents),
                cover_photo_url = COALESCE($7, cover_photo_url),
                is_public = COALESCE($8, is_public),
                updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TripRow>(&query)
            .bind(id)
            .bind(&update.name)
            .bind(&update.description)
            .bind(update.start_date)
            .bind(update.end_date)
            .bind(update.budget_limit_cents)
            .bind(&update.cover_photo_url)
            .bind(update.is_public)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Soft delete: the row stays for FK integrity and audit history.
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE trips SET is_deleted = TRUE, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
