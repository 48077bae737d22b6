use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use globetrotter_core::user::{NewUser, ProfileUpdate, User};
use globetrotter_store::user_repo::UserRepository;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::{AuthUser, Claims};
use crate::state::{AppState, AuthConfig};

const MIN_PASSWORD_LENGTH: usize = 8;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_photo_url: Option<String>,
    pub language_preference: String,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_photo_url: user.profile_photo_url,
            language_preference: user.language_preference,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub user: UserResponse,
}

// ============================================================================
// Password hashing (Argon2id, PHC string storage)
// ============================================================================

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

// ============================================================================
// Token issuance
// ============================================================================

pub fn issue_token(user: &User, auth: &AuthConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        exp: (now + auth.token_ttl_minutes as i64 * 60) as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

// ============================================================================
// Routes
// ============================================================================

/// Public routes: no credentials required.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
}

/// Routes behind the auth middleware.
pub fn me_routes() -> Router<AppState> {
    Router::new().route("/api/auth/me", get(current_user).put(update_profile))
}

/// A concurrent signup can slip past the `email_taken` check and lose on the
/// unique index instead; that loss is a conflict, not a server error.
fn signup_insert_error(e: Box<dyn std::error::Error + Send + Sync>) -> AppError {
    if globetrotter_store::is_unique_violation(e.as_ref()) {
        AppError::ConflictError("User already exists".to_string())
    } else {
        AppError::internal(e)
    }
}

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    // Exact, case-sensitive duplicate check; soft-deleted accounts still
    // reserve their email
    let taken = UserRepository::email_taken(&state.db.pool, &req.email)
        .await
        .map_err(AppError::internal)?;
    if taken {
        return Err(AppError::ConflictError("User already exists".to_string()));
    }

    let password_hash = hash_password(&req.password).map_err(AppError::internal)?;

    let user = UserRepository::create(
        &state.db.pool,
        &NewUser {
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
        },
    )
    .await
    .map_err(signup_insert_error)?;

    tracing::info!("New user registered: {}", user.id);

    let token = issue_token(&user, &state.auth)?;
    Ok(Json(AuthResponse {
        token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    // One error for both unknown email and wrong password
    let invalid = || AppError::AuthenticationError("Invalid email or password".to_string());

    let user = UserRepository::find_by_email(&state.db.pool, &req.email)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(invalid)?;

    let verified = verify_password(&req.password, &user.password_hash)
        .map_err(AppError::internal)?;
    if !verified {
        return Err(invalid());
    }

    let token = issue_token(&user, &state.auth)?;
    Ok(Json(AuthResponse {
        token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

async fn current_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserRepository::find_by_id(&state.db.pool, auth_user.id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;
    Ok(Json(user.into()))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserRepository::update_profile(&state.db.pool, auth_user.id, &update)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct-horse-battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse-battery", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_signup_insert_error_keeps_other_errors_internal() {
        let err = signup_insert_error(Box::new(sqlx::Error::RowNotFound));
        assert!(matches!(err, AppError::InternalServerError(_)));
    }
}
