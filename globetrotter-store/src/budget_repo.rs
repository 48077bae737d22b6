use chrono::{DateTime, Utc};
use globetrotter_core::budget::BudgetRecord;
use sqlx::PgPool;
use uuid::Uuid;

use crate::StoreResult;

const COLUMNS: &str = "id, trip_id, category, amount_cents, date, notes, created_at";

#[derive(sqlx::FromRow)]
struct BudgetRow {
    id: Uuid,
    trip_id: Uuid,
    category: String,
    amount_cents: i64,
    date: DateTime<Utc>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BudgetRow> for BudgetRecord {
    fn from(row: BudgetRow) -> Self {
        BudgetRecord {
            id: row.id,
            trip_id: row.trip_id,
            category: row.category,
            amount_cents: row.amount_cents,
            date: row.date,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

pub struct NewBudgetRecord {
    pub trip_id: Uuid,
    pub category: String,
    pub amount_cents: i64,
    pub notes: Option<String>,
}

pub struct BudgetRepository;

impl BudgetRepository {
    pub async fn create(pool: &PgPool, record: &NewBudgetRecord) -> StoreResult<BudgetRecord> {
        let query = format!(
            "INSERT INTO budget_records (id, trip_id, category, amount_cents, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BudgetRow>(&query)
            .bind(Uuid::new_v4())
            .bind(record.trip_id)
            .bind(&record.category)
            .bind(record.amount_cents)
            .bind(&record.notes)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// All records of a trip, newest expense first.
    pub async fn list_for_trip(pool: &PgPool, trip_id: Uuid) -> StoreResult<Vec<BudgetRecord>> {
        let query = format!(
            "SELECT {COLUMNS} FROM budget_records WHERE trip_id = $1 ORDER BY date DESC"
        );
        let rows = sqlx::query_as::<_, BudgetRow>(&query)
            .bind(trip_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> StoreResult<Option<BudgetRecord>> {
        let query = format!("SELECT {COLUMNS} FROM budget_records WHERE id = $1");
        let row = sqlx::query_as::<_, BudgetRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM budget_records WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
