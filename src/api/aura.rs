use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use super::auth::{CurrentUser, generate_id};
use super::extract::Json;
use super::types::{AuraProfile, CategoryBreakdown, ShareDto, double_option};
use super::validation::{self, MAX_CAPTION_LENGTH, SHARE_CATEGORIES};
use super::{ApiError, AppState};
use crate::entities::{shares, users};
use crate::models::content::PageResult;

/// How many shares the aura profile surfaces.
const RECENT_SHARES: u64 = 10;

/// Absent fields are left untouched; an explicit `null` clears them.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuraRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub aura_colors: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub aesthetic_tags: Option<Option<Vec<String>>>,
}

#[derive(Deserialize)]
pub struct ListSharesQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    pub category: Option<String>,
    pub content_id: Option<String>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub dominant_color: Option<String>,
    pub caption: Option<String>,
}

/// GET /aura/profile
pub async fn get_aura_profile(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<AuraProfile>, ApiError> {
    build_profile(&state, user).await.map(Json)
}

/// GET /aura/profile/{id}
pub async fn get_public_aura_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AuraProfile>, ApiError> {
    let user = state
        .store()
        .get_user(&id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    build_profile(&state, user).await.map(Json)
}

/// PUT /aura/profile
pub async fn update_aura_profile(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdateAuraRequest>,
) -> Result<Json<AuraProfile>, ApiError> {
    if let Some(Some(colors)) = &payload.aura_colors {
        for color in colors {
            if !validation::valid_hex_color(color) {
                return Err(ApiError::validation(format!(
                    "Invalid aura color: {color}"
                )));
            }
        }
    }

    let colors_json = match payload.aura_colors {
        Some(Some(colors)) => Some(Some(serde_json::to_string(&colors).map_err(|e| {
            ApiError::internal(format!("Failed to encode aura colors: {e}"))
        })?)),
        Some(None) => Some(None),
        None => None,
    };
    let tags_json = match payload.aesthetic_tags {
        Some(Some(tags)) => Some(Some(serde_json::to_string(&tags).map_err(|e| {
            ApiError::internal(format!("Failed to encode aesthetic tags: {e}"))
        })?)),
        Some(None) => Some(None),
        None => None,
    };

    let updated = state
        .store()
        .update_user_aura(&user.user_id, colors_json, tags_json)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    build_profile(&state, updated).await.map(Json)
}

/// GET /aura/shares
pub async fn list_shares(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ListSharesQuery>,
) -> Result<Json<PageResult<ShareDto>>, ApiError> {
    let (limit, offset) = validation::pagination(query.limit.as_deref(), query.offset.as_deref());

    let (rows, total) = state
        .store()
        .list_shares(&user.user_id, limit, offset)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(PageResult {
        data: rows.into_iter().map(ShareDto::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// POST /aura/shares
pub async fn create_share(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateShareRequest>,
) -> Result<(StatusCode, Json<ShareDto>), ApiError> {
    let category = payload
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::validation("Category is required"))?;
    if !validation::valid_category(category) {
        return Err(ApiError::validation(format!(
            "Category must be one of: {}",
            SHARE_CATEGORIES.join(", ")
        )));
    }

    let content_id = payload
        .content_id
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::validation("Content id is required"))?;

    if let Some(caption) = &payload.caption
        && caption.len() > MAX_CAPTION_LENGTH
    {
        return Err(ApiError::validation(
            "Caption must be 500 characters or less",
        ));
    }
    if let Some(color) = &payload.dominant_color
        && !validation::valid_hex_color(color)
    {
        return Err(ApiError::validation(format!("Invalid dominant color: {color}")));
    }

    let title = payload
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("{} - {}", validation::capitalize(category), content_id));

    let share = shares::Model {
        id: generate_id("s"),
        user_id: user.user_id,
        category: category.to_string(),
        content_id: content_id.to_string(),
        title,
        image: payload.image,
        dominant_color: payload.dominant_color,
        caption: payload.caption,
        created_at: Utc::now().to_rfc3339(),
    };

    state
        .store()
        .create_share(share.clone())
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(ShareDto::from(share))))
}

async fn build_profile(state: &AppState, user: users::Model) -> Result<AuraProfile, ApiError> {
    let recent = state
        .store()
        .recent_shares(&user.user_id, RECENT_SHARES)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    let counts = state
        .store()
        .share_category_counts(&user.user_id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(AuraProfile {
        user_id: user.user_id,
        username: user.username,
        avatar: user.avatar,
        bio: user.bio,
        recent_shares: recent.into_iter().map(ShareDto::from).collect(),
        aura_colors: parse_json_list(user.aura_colors),
        aesthetic_tags: parse_json_list(user.aesthetic_tags),
        top_categories: breakdown(counts),
    })
}

fn parse_json_list(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

/// Percentages are rounded to one decimal and the list is sorted by count,
/// largest first. No shares means an empty breakdown.
fn breakdown(counts: Vec<(String, i64)>) -> Vec<CategoryBreakdown> {
    let total: i64 = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Vec::new();
    }

    #[allow(clippy::cast_precision_loss)]
    let mut slices: Vec<CategoryBreakdown> = counts
        .into_iter()
        .map(|(category, count)| CategoryBreakdown {
            percentage: (count as f64 / total as f64 * 1000.0).round() / 10.0,
            category,
            count,
        })
        .collect();
    slices.sort_by(|a, b| b.count.cmp(&a.count));
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_rounds_to_one_decimal() {
        let slices = breakdown(vec![("cinema".to_string(), 2), ("music".to_string(), 1)]);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].category, "cinema");
        assert!((slices[0].percentage - 66.7).abs() < f64::EPSILON);
        assert!((slices[1].percentage - 33.3).abs() < f64::EPSILON);
    }

    #[test]
    fn breakdown_without_shares_is_empty() {
        assert!(breakdown(Vec::new()).is_empty());
    }

    #[test]
    fn breakdown_sorts_by_count() {
        let slices = breakdown(vec![
            ("books".to_string(), 1),
            ("travel".to_string(), 5),
            ("games".to_string(), 3),
        ]);

        let order: Vec<&str> = slices.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(order, ["travel", "games", "books"]);
    }

    #[test]
    fn json_lists_parse_or_default() {
        assert_eq!(
            parse_json_list(Some(r##"["#AABBCC","#001122"]"##.to_string())),
            vec!["#AABBCC", "#001122"]
        );
        assert!(parse_json_list(Some("not json".to_string())).is_empty());
        assert!(parse_json_list(None).is_empty());
    }
}
