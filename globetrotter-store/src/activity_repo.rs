use globetrotter_core::activity::{Activity, NewActivity};
use sqlx::PgPool;
use uuid::Uuid;

use crate::StoreResult;

const COLUMNS: &str = "id, stop_id, name, category, description, cost_cents, duration_hours, \
                       date_scheduled, time_start, image_url, created_at";

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    stop_id: Uuid,
    name: String,
    category: Option<String>,
    description: Option<String>,
    cost_cents: Option<i64>,
    duration_hours: Option<f64>,
    date_scheduled: chrono::NaiveDate,
    time_start: Option<chrono::NaiveTime>,
    image_url: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        Activity {
            id: row.id,
            stop_id: row.stop_id,
            name: row.name,
            category: row.category,
            description: row.description,
            cost_cents: row.cost_cents,
            duration_hours: row.duration_hours,
            date_scheduled: row.date_scheduled,
            time_start: row.time_start,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

pub struct ActivityRepository;

impl ActivityRepository {
    pub async fn create(pool: &PgPool, new_activity: &NewActivity) -> StoreResult<Activity> {
        let query = format!(
            "INSERT INTO activities (id, stop_id, name, category, description, cost_cents,
                                     duration_hours, date_scheduled, time_start, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ActivityRow>(&query)
            .bind(Uuid::new_v4())
            .bind(new_activity.stop_id)
            .bind(&new_activity.name)
            .bind(&new_activity.category)
            .bind(&new_activity.description)
            .bind(new_activity.cost_cents)
            .bind(new_activity.duration_hours)
            .bind(new_activity.date_scheduled)
            .bind(new_activity.time_start)
            .bind(&new_activity.image_url)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> StoreResult<Option<Activity>> {
        let query = format!("SELECT {COLUMNS} FROM activities WHERE id = $1");
        let row = sqlx::query_as::<_, ActivityRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn list_for_stop(pool: &PgPool, stop_id: Uuid) -> StoreResult<Vec<Activity>> {
        let query = format!(
            "SELECT {COLUMNS} FROM activities
             WHERE stop_id = $1
             ORDER BY date_scheduled, time_start"
        );
        let rows = sqlx::query_as::<_, ActivityRow>(&query)
            .bind(stop_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Every activity under any stop of the trip (trip summary view).
    pub async fn list_for_trip(pool: &PgPool, trip_id: Uuid) -> StoreResult<Vec<Activity>> {
        let query = format!(
            "SELECT a.{} FROM activities a
             JOIN stops s ON a.stop_id = s.id
             WHERE s.trip_id = $1
             ORDER BY a.date_scheduled, a.time_start",
            COLUMNS.replace(", ", ", a.")
        );
        let rows = sqlx::query_as::<_, ActivityRow>(&query)
            .bind(trip_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        new_activity: &NewActivity,
    ) -> StoreResult<Option<Activity>> {
        let query = format!(
            "UPDATE activities SET
                name = $2,
                category = $3,
                description = $4,
                cost_cents = $5,
                duration_hours = $6,
                date_scheduled = $7,
                time_start = $8,
                image_url = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ActivityRow>(&query)
            .bind(id)
            .bind(&new_activity.name)
            .bind(&new_activity.category)
            .bind(&new_activity.description)
            .bind(new_activity.cost_cents)
            .bind(new_activity.duration_hours)
            .bind(new_activity.date_scheduled)
            .bind(new_activity.time_start)
            .bind(&new_activity.image_url)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
