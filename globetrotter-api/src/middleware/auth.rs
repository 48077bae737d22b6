use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id, as a UUID string.
    pub sub: String,
    pub email: String,
    pub exp: usize,
    pub iat: usize,
}

/// The verified caller, injected into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

// ============================================================================
// Authentication Middleware
// ============================================================================

/// Requires a valid `Authorization: Bearer <token>` header. There is no
/// fallback identity: absent, malformed, expired, or badly signed credentials
/// are all rejected with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Extract token from Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Missing credentials".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::AuthenticationError("Missing credentials".to_string()))?;

    // 2. Decode and validate JWT (signature + expiry, fail closed)
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthenticationError("Invalid credentials".to_string()))?;

    let user_id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::AuthenticationError("Invalid credentials".to_string()))?;

    // 3. Inject the verified identity into request extensions
    req.extensions_mut().insert(AuthUser {
        id: user_id,
        email: token_data.claims.email,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_claims_round_trip() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "john@example.com".to_string(),
            exp: now + 1800,
            iat: now,
        };
        let token = make_token(&claims, "test-secret");

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, claims.sub);
        assert_eq!(decoded.claims.email, claims.email);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "john@example.com".to_string(),
            exp: now + 1800,
            iat: now,
        };
        let token = make_token(&claims, "test-secret");

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "john@example.com".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = make_token(&claims, "test-secret");

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
