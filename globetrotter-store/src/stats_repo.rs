//! Aggregate queries for the admin dashboard. Counting and averaging stay in
//! SQL; `COALESCE` keeps zero-trip averages at 0 instead of NULL.

use sqlx::PgPool;

use crate::StoreResult;

#[derive(Debug, Clone, Default)]
pub struct PlatformCounts {
    pub total_users: i64,
    pub total_trips: i64,
    pub total_stops: i64,
    pub total_activities: i64,
    /// Average of (end_date - start_date) in days over non-deleted trips.
    pub avg_trip_duration_days: f64,
    /// Average budget limit in cents over non-deleted trips with a limit set.
    pub avg_budget_cents: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupCount {
    pub label: String,
    pub count: i64,
}

pub struct StatsRepository;

impl StatsRepository {
    pub async fn platform_counts(pool: &PgPool) -> StoreResult<PlatformCounts> {
        let total_users = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE is_deleted = FALSE",
        )
        .fetch_one(pool)
        .await?;

        let total_trips = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM trips WHERE is_deleted = FALSE",
        )
        .fetch_one(pool)
        .await?;

        let total_stops = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stops")
            .fetch_one(pool)
            .await?;

        let total_activities = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activities")
            .fetch_one(pool)
            .await?;

        let avg_trip_duration_days = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(AVG(end_date - start_date), 0)::FLOAT8
             FROM trips WHERE is_deleted = FALSE",
        )
        .fetch_one(pool)
        .await?;

        let avg_budget_cents = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(AVG(budget_limit_cents), 0)::FLOAT8
             FROM trips WHERE is_deleted = FALSE",
        )
        .fetch_one(pool)
        .await?;

        Ok(PlatformCounts {
            total_users,
            total_trips,
            total_stops,
            total_activities,
            avg_trip_duration_days,
            avg_budget_cents,
        })
    }

    /// Top 10 cities by stop count. Ties break on earliest first appearance
    /// so the ranking is deterministic.
    pub async fn popular_destinations(pool: &PgPool) -> StoreResult<Vec<GroupCount>> {
        let rows = sqlx::query_as::<_, GroupCount>(
            "SELECT city_name AS label, COUNT(*) AS count
             FROM stops
             GROUP BY city_name
             ORDER BY COUNT(*) DESC, MIN(created_at) ASC
             LIMIT 10",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Top 10 users by non-deleted trip count.
    pub async fn top_users(pool: &PgPool) -> StoreResult<Vec<GroupCount>> {
        let rows = sqlx::query_as::<_, GroupCount>(
            "SELECT u.email AS label, COUNT(t.id) AS count
             FROM users u
             JOIN trips t ON t.user_id = u.id
             WHERE u.is_deleted = FALSE AND t.is_deleted = FALSE
             GROUP BY u.id, u.email
             ORDER BY COUNT(t.id) DESC, u.email ASC
             LIMIT 10",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Activity counts per category, most popular first.
    pub async fn activity_analytics(pool: &PgPool) -> StoreResult<Vec<GroupCount>> {
        let rows = sqlx::query_as::<_, GroupCount>(
            "SELECT COALESCE(category, 'uncategorized') AS label, COUNT(*) AS count
             FROM activities
             GROUP BY category
             ORDER BY COUNT(*) DESC, MIN(created_at) ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
