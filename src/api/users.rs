use axum::{
    Extension,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::extract::Json;
use super::types::{UserDto, double_option};
use super::validation::MAX_BIO_LENGTH;
use super::{ApiError, AppState};

/// Absent fields are left untouched; an explicit `null` clears the field.
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub avatar: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
}

/// GET /users/profile
pub async fn get_profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserDto> {
    Json(UserDto::from(user))
}

/// PUT /users/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserDto>, ApiError> {
    if let Some(Some(bio)) = &payload.bio
        && bio.len() > MAX_BIO_LENGTH
    {
        return Err(ApiError::validation("Bio must be 500 characters or less"));
    }

    let updated = state
        .store()
        .update_user_profile(&user.user_id, payload.avatar, payload.bio)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(UserDto::from(updated)))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state
        .store()
        .get_user(&id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserDto::from(user)))
}
