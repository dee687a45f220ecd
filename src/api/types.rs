use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::{shares, users};

/// Distinguishes an absent field (outer `None`, leave as-is) from an explicit
/// `null` (inner `None`, clear the column). Use with `#[serde(default)]`.
pub(super) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Public view of a user row. The password hash never leaves the database
/// layer through this type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for UserDto {
    fn from(user: users::Model) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            username: user.username,
            avatar: user.avatar,
            bio: user.bio,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareDto {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub content_id: String,
    pub title: String,
    pub image: Option<String>,
    pub dominant_color: Option<String>,
    pub caption: Option<String>,
    pub created_at: String,
}

impl From<shares::Model> for ShareDto {
    fn from(share: shares::Model) -> Self {
        Self {
            id: share.id,
            user_id: share.user_id,
            category: share.category,
            content_id: share.content_id,
            title: share.title,
            image: share.image,
            dominant_color: share.dominant_color,
            caption: share.caption,
            created_at: share.created_at,
        }
    }
}

/// One slice of a user's share distribution, percentage rounded to one
/// decimal place.
#[derive(Debug, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuraProfile {
    pub user_id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub recent_shares: Vec<ShareDto>,
    pub aura_colors: Vec<String>,
    pub aesthetic_tags: Vec<String>,
    pub top_categories: Vec<CategoryBreakdown>,
}
