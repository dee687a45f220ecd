use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use super::validation::{self, SHARE_CATEGORIES};
use super::{ApiError, AppState};

#[derive(Deserialize)]
pub struct GlobalSearchQuery {
    pub query: Option<String>,
    pub categories: Option<String>,
    pub limit: Option<String>,
}

/// GET /search
///
/// Substring search over the local cache only; nothing here reaches out to a
/// provider.
pub async fn global_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GlobalSearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let term = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::validation("Query parameter is required"))?;

    // per-category cap, normalized the same way as list pagination
    let (limit, _) = validation::pagination(query.limit.as_deref(), None);

    let categories: Vec<&str> = match query.categories.as_deref() {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|c| SHARE_CATEGORIES.contains(c))
            .collect(),
        None => SHARE_CATEGORIES.to_vec(),
    };

    let store = state.store();
    let mut results = Vec::new();

    for category in categories {
        match category {
            "cinema" => {
                let movies = store
                    .search_movies(term, limit)
                    .await
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
                tag_records("cinema", "movie", movies, &mut results);
            }
            "music" => {
                let albums = store
                    .search_albums(term, limit)
                    .await
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
                tag_records("music", "album", albums, &mut results);
            }
            "games" => {
                let games = store
                    .search_games(term, limit)
                    .await
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
                tag_records("games", "game", games, &mut results);
            }
            "books" => {
                let books = store
                    .search_books(term, limit)
                    .await
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
                tag_records("books", "book", books, &mut results);
            }
            "travel" => {
                let locations = store
                    .search_locations(term, limit)
                    .await
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
                tag_records("travel", "location", locations, &mut results);
            }
            _ => {}
        }
    }

    let total = results.len();
    Ok(Json(json!({
        "query": term,
        "results": results,
        "total": total,
    })))
}

/// Flattens records into the result list, stamping each with its category
/// and record type.
fn tag_records<T: Serialize>(category: &str, kind: &str, records: Vec<T>, out: &mut Vec<Value>) {
    for record in records {
        let Ok(Value::Object(mut map)) = serde_json::to_value(record) else {
            continue;
        };
        map.insert("category".to_string(), json!(category));
        map.insert("type".to_string(), json!(kind));
        out.push(Value::Object(map));
    }
}
