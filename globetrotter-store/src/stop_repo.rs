use globetrotter_core::stop::{NewStop, Stop, StopUpdate};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::StoreResult;

const COLUMNS: &str = "id, trip_id, city_name, country, arrival_date, departure_date, \
                       sequence_order, cost_index, description, created_at";

#[derive(sqlx::FromRow)]
struct StopRow {
    id: Uuid,
    trip_id: Uuid,
    city_name: String,
    country: String,
    arrival_date: chrono::NaiveDate,
    departure_date: chrono::NaiveDate,
    sequence_order: i32,
    cost_index: Option<f64>,
    description: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<StopRow> for Stop {
    fn from(row: StopRow) -> Self {
        Stop {
            id: row.id,
            trip_id: row.trip_id,
            city_name: row.city_name,
            country: row.country,
            arrival_date: row.arrival_date,
            departure_date: row.departure_date,
            sequence_order: row.sequence_order,
            cost_index: row.cost_index,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

pub struct StopRepository;

impl StopRepository {
    pub async fn create(pool: &PgPool, new_stop: &NewStop) -> StoreResult<Stop> {
        let query = format!(
            "INSERT INTO stops (id, trip_id, city_name, country, arrival_date, departure_date,
                                sequence_order, cost_index, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, StopRow>(&query)
            .bind(Uuid::new_v4())
            .bind(new_stop.trip_id)
            .bind(&new_stop.city_name)
            .bind(&new_stop.country)
            .bind(new_stop.arrival_date)
            .bind(new_stop.departure_date)
            .bind(new_stop.sequence_order)
            .bind(new_stop.cost_index)
            .bind(&new_stop.description)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> StoreResult<Option<Stop>> {
        let query = format!("SELECT {COLUMNS} FROM stops WHERE id = $1");
        let row = sqlx::query_as::<_, StopRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Stops of a trip in itinerary order.
    pub async fn list_for_trip(pool: &PgPool, trip_id: Uuid) -> StoreResult<Vec<Stop>> {
        let query =
            format!("SELECT {COLUMNS} FROM stops WHERE trip_id = $1 ORDER BY sequence_order");
        let rows = sqlx::query_as::<_, StopRow>(&query)
            .bind(trip_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update(pool: &PgPool, id: Uuid, update: &StopUpdate) -> StoreResult<Option<Stop>> {
        let query = format!(
            "UPDATE stops SET
                city_name = $2,
                country = $3,
                arrival_date = $4,
                departure_date = $5,
                sequence_order = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, StopRow>(&query)
            .bind(id)
            .bind(&update.city_name)
            .bind(&update.country)
            .bind(update.arrival_date)
            .bind(update.departure_date)
            .bind(update.sequence_order)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Hard delete; activities and parking slots cascade at the schema level.
    pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM stops WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Renumber the given stops 1..n in list order. Ids not belonging to the
    /// trip are skipped.
    pub async fn reorder(
        tx: &mut Transaction<'_, Postgres>,
        trip_id: Uuid,
        stop_ids: &[Uuid],
    ) -> StoreResult<()> {
        for (index, stop_id) in stop_ids.iter().enumerate() {
            sqlx::query("UPDATE stops SET sequence_order = $1 WHERE id = $2 AND trip_id = $3")
                .bind((index + 1) as i32)
                .bind(stop_id)
                .bind(trip_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    /// Owning user of the trip a stop belongs to, with the trip's soft-delete
    /// flag honored. Used for ownership checks on child entities.
    pub async fn trip_owner(pool: &PgPool, stop_id: Uuid) -> StoreResult<Option<(Uuid, Uuid)>> {
        let row = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT t.id, t.user_id FROM trips t
             JOIN stops s ON s.trip_id = t.id
             WHERE s.id = $1 AND t.is_deleted = FALSE",
        )
        .bind(stop_id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }
}
