use globetrotter_core::user::{NewUser, ProfileUpdate, User};
use sqlx::PgPool;
use uuid::Uuid;

use crate::StoreResult;

const COLUMNS: &str = "id, email, password_hash, first_name, last_name, profile_photo_url, \
                       language_preference, created_at, updated_at, is_deleted";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    profile_photo_url: Option<String>,
    language_preference: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    is_deleted: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            profile_photo_url: row.profile_photo_url,
            language_preference: row.language_preference,
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_deleted: row.is_deleted,
        }
    }
}

pub struct UserRepository;

impl UserRepository {
    pub async fn create(pool: &PgPool, new_user: &NewUser) -> StoreResult<User> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash, first_name, last_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(Uuid::new_v4())
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Whether any row holds this email, soft-deleted or not. The email
    /// column is globally unique, so a deleted account still reserves its
    /// address; signup conflict checks must see it.
    pub async fn email_taken(pool: &PgPool, email: &str) -> StoreResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(taken)
    }

    /// Exact, case-sensitive email match. Excludes soft-deleted accounts.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Apply a partial profile update; `None` fields keep their value.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<User>> {
        let query = format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                profile_photo_url = COALESCE($4, profile_photo_url),
                language_preference = COALESCE($5, language_preference),
                updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(&update.profile_photo_url)
            .bind(&update.language_preference)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }
}
