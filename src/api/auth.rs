use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task;

use super::extract::Json;
use super::{ApiError, AppState};
use super::types::{AuthResponse, UserDto};
use super::validation;
use crate::entities::users;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// The authenticated user's row, attached to the request by
/// `auth_middleware`.
#[derive(Clone)]
pub struct CurrentUser(pub users::Model);

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// ============================================================================
// Middleware
// ============================================================================

/// Requires a valid `Authorization: Bearer <token>` header and a still
/// existing user behind it.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let user_id = decode_user_id(&token, &state.shared.config.auth.jwt_secret)
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

    let user = state
        .store()
        .get_user(&user_id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    Some(token.trim().to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation("Email is required"))?;
    if !validation::valid_email(email) {
        return Err(ApiError::validation("Invalid email format"));
    }

    let username = payload
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::validation("Username is required"))?;
    validation::valid_username(username).map_err(ApiError::validation)?;

    let password = payload
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("Password is required"))?;
    validation::valid_password(password).map_err(ApiError::validation)?;

    let store = state.store();
    if store
        .get_user_by_email(email)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .is_some()
    {
        return Err(ApiError::conflict("Email already exists"));
    }
    if store
        .get_user_by_username(username)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .is_some()
    {
        return Err(ApiError::conflict("Username already exists"));
    }

    let password_hash = hash_password(password).await?;
    let now = Utc::now().to_rfc3339();
    let user = users::Model {
        user_id: generate_id("u"),
        email: email.to_string(),
        username: username.to_string(),
        password_hash,
        avatar: None,
        bio: None,
        aura_colors: None,
        aesthetic_tags: None,
        created_at: now.clone(),
        updated_at: now,
    };

    if let Err(err) = store.create_user(user.clone()).await {
        // two registrations can race past the pre-checks
        if let Some(db_err) = err.downcast_ref::<sea_orm::DbErr>()
            && matches!(
                db_err.sql_err(),
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
            )
        {
            return Err(ApiError::conflict("Email or username already exists"));
        }
        return Err(ApiError::DatabaseError(err.to_string()));
    }

    tracing::info!("Registered user {}", user.username);

    let token = issue_token(
        &user.user_id,
        &state.shared.config.auth.jwt_secret,
        state.shared.config.auth.token_ttl_days,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserDto::from(user),
        }),
    ))
}

/// POST /auth/login
///
/// Failures are indistinguishable on the wire whether the email is unknown
/// or the password wrong.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation("Email is required"))?;
    let password = payload
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("Password is required"))?;

    let user = state
        .store()
        .get_user_by_email(email)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let is_valid = verify_password(password, &user.password_hash).await?;
    if !is_valid {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = issue_token(
        &user.user_id,
        &state.shared.config.auth.jwt_secret,
        state.shared.config.auth.token_ttl_days,
    )?;

    Ok(Json(AuthResponse {
        token,
        user: UserDto::from(user),
    }))
}

// ============================================================================
// Helpers
// ============================================================================

pub fn issue_token(user_id: &str, secret: &str, ttl_days: i64) -> Result<String, ApiError> {
    let exp = (Utc::now() + chrono::Duration::days(ttl_days)).timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: usize::try_from(exp).unwrap_or(usize::MAX),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("Failed to sign token: {e}")))
}

pub fn decode_user_id(token: &str, secret: &str) -> Option<String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims.sub)
}

/// Opaque record ids: prefix plus 12 hex chars.
pub fn generate_id(prefix: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &hex[..12])
}

/// Argon2id hashing runs on the blocking pool since it is CPU-intensive
/// and would stall the async runtime if run directly.
pub(super) async fn hash_password(password: &str) -> Result<String, ApiError> {
    let password = password.to_string();

    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::internal(format!("Failed to hash password: {e}")))
    })
    .await
    .map_err(|e| ApiError::internal(format!("Hashing task panicked: {e}")))?
}

pub(super) async fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let password = password.to_string();
    let hash = hash.to_string();

    task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| ApiError::internal(format!("Invalid password hash format: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| ApiError::internal(format!("Verification task panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = issue_token("u_abc123def456", "test-secret", 7).unwrap();
        assert_eq!(
            decode_user_id(&token, "test-secret").as_deref(),
            Some("u_abc123def456")
        );
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let token = issue_token("u_abc123def456", "test-secret", 7).unwrap();
        assert!(decode_user_id(&token, "other-secret").is_none());
    }

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let a = generate_id("u");
        let b = generate_id("u");
        assert!(a.starts_with("u_"));
        assert_eq!(a.len(), 14);
        assert_ne!(a, b);
    }
}
