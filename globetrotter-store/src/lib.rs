pub mod activity_repo;
pub mod app_config;
pub mod budget_repo;
pub mod database;
pub mod parking_repo;
pub mod sharing_repo;
pub mod stats_repo;
pub mod stop_repo;
pub mod trip_repo;
pub mod user_repo;

pub use database::DbClient;

/// Repository result type. Queries surface `sqlx::Error`; row-to-domain
/// conversion can surface `CoreError`, so the boxed form covers both.
pub type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Whether a repository error is a Postgres unique-constraint violation.
/// Callers racing on a unique column use this to turn the loss into a
/// conflict response or a re-read instead of a 500.
pub fn is_unique_violation(err: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(sqlx::Error::as_database_error)
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_ignores_other_errors() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));

        let core_err = globetrotter_core::CoreError::Conflict("taken".to_string());
        assert!(!is_unique_violation(&core_err));
    }
}
