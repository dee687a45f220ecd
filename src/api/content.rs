use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation;
use super::{ApiError, AppState};
use crate::models::content::{Album, Book, Difficulty, Game, Location, MediaKind, Movie, PageResult};

#[derive(Deserialize)]
pub struct MoviesQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub year: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Deserialize)]
pub struct AlbumsQuery {
    pub search: Option<String>,
    pub artist: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Deserialize)]
pub struct GamesQuery {
    pub search: Option<String>,
    pub platform: Option<String>,
    pub difficulty: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Deserialize)]
pub struct BooksQuery {
    pub search: Option<String>,
    pub author: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Deserialize)]
pub struct LocationsQuery {
    pub search: Option<String>,
    pub country: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ============================================================================
// Cinema
// ============================================================================

/// GET /content/movies
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MoviesQuery>,
) -> Result<Json<PageResult<Movie>>, ApiError> {
    let (limit, offset) = validation::pagination(query.limit.as_deref(), query.offset.as_deref());
    let year = validation::optional_year(query.year.as_deref());
    let kind = match non_empty(query.kind.as_deref()) {
        Some(raw) => Some(
            MediaKind::parse(raw)
                .ok_or_else(|| ApiError::validation("Type must be 'movie' or 'tv'"))?,
        ),
        None => None,
    };

    if let Some(search) = non_empty(query.search.as_deref()) {
        let (movies, total) = state
            .shared
            .tmdb
            .search(search, kind, year, limit, offset)
            .await?;
        for movie in &movies {
            if let Err(e) = state.store().upsert_movie(movie).await {
                tracing::warn!("Failed to cache movie {}: {e}", movie.id);
            }
        }
        return Ok(Json(PageResult {
            data: movies,
            total,
            limit,
            offset,
        }));
    }

    let (movies, total) = state
        .store()
        .list_movies(year, kind, limit, offset)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    Ok(Json(PageResult {
        data: movies,
        total,
        limit,
        offset,
    }))
}

/// GET /content/movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    if let Some(movie) = state
        .store()
        .get_movie(&id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
    {
        return Ok(Json(movie));
    }

    let movie = state
        .shared
        .tmdb
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Movie not found"))?;

    if let Err(e) = state.store().upsert_movie(&movie).await {
        tracing::warn!("Failed to cache movie {}: {e}", movie.id);
    }
    Ok(Json(movie))
}

// ============================================================================
// Music
// ============================================================================

/// GET /content/albums
pub async fn list_albums(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AlbumsQuery>,
) -> Result<Json<PageResult<Album>>, ApiError> {
    let (limit, offset) = validation::pagination(query.limit.as_deref(), query.offset.as_deref());
    let search = non_empty(query.search.as_deref());
    let artist = non_empty(query.artist.as_deref());

    if search.is_some() || artist.is_some() {
        let (albums, total) = state
            .shared
            .deezer
            .search(search.unwrap_or_default(), artist, limit, offset)
            .await?;
        for album in &albums {
            if let Err(e) = state.store().upsert_album(album).await {
                tracing::warn!("Failed to cache album {}: {e}", album.id);
            }
        }
        return Ok(Json(PageResult {
            data: albums,
            total,
            limit,
            offset,
        }));
    }

    let (albums, total) = state
        .store()
        .list_albums(limit, offset)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    Ok(Json(PageResult {
        data: albums,
        total,
        limit,
        offset,
    }))
}

/// GET /content/albums/{id}
pub async fn get_album(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Album>, ApiError> {
    if let Some(album) = state
        .store()
        .get_album(&id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
    {
        return Ok(Json(album));
    }

    let album = state
        .shared
        .deezer
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Album not found"))?;

    if let Err(e) = state.store().upsert_album(&album).await {
        tracing::warn!("Failed to cache album {}: {e}", album.id);
    }
    Ok(Json(album))
}

// ============================================================================
// Games
// ============================================================================

/// GET /content/games
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GamesQuery>,
) -> Result<Json<PageResult<Game>>, ApiError> {
    let (limit, offset) = validation::pagination(query.limit.as_deref(), query.offset.as_deref());
    let platform = non_empty(query.platform.as_deref());
    let difficulty = match non_empty(query.difficulty.as_deref()) {
        Some(raw) => Some(Difficulty::parse(raw).ok_or_else(|| {
            ApiError::validation("Difficulty must be 'Easy', 'Medium' or 'Hard'")
        })?),
        None => None,
    };

    if let Some(search) = non_empty(query.search.as_deref()) {
        let (games, total) = state
            .shared
            .rawg
            .search(search, platform, difficulty, limit, offset)
            .await?;
        for game in &games {
            if let Err(e) = state.store().upsert_game(game).await {
                tracing::warn!("Failed to cache game {}: {e}", game.id);
            }
        }
        return Ok(Json(PageResult {
            data: games,
            total,
            limit,
            offset,
        }));
    }

    let (games, total) = state
        .store()
        .list_games(platform, difficulty, limit, offset)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    Ok(Json(PageResult {
        data: games,
        total,
        limit,
        offset,
    }))
}

/// GET /content/games/{id}
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    if let Some(game) = state
        .store()
        .get_game(&id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
    {
        return Ok(Json(game));
    }

    let game = state
        .shared
        .rawg
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Game not found"))?;

    if let Err(e) = state.store().upsert_game(&game).await {
        tracing::warn!("Failed to cache game {}: {e}", game.id);
    }
    Ok(Json(game))
}

// ============================================================================
// Books
// ============================================================================

/// GET /content/books
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BooksQuery>,
) -> Result<Json<PageResult<Book>>, ApiError> {
    let (limit, offset) = validation::pagination(query.limit.as_deref(), query.offset.as_deref());
    let search = non_empty(query.search.as_deref());
    let author = non_empty(query.author.as_deref());

    if search.is_some() || author.is_some() {
        let (books, total) = state
            .shared
            .openlibrary
            .search(search.unwrap_or_default(), author, limit, offset)
            .await?;
        for book in &books {
            if let Err(e) = state.store().upsert_book(book).await {
                tracing::warn!("Failed to cache book {}: {e}", book.id);
            }
        }
        return Ok(Json(PageResult {
            data: books,
            total,
            limit,
            offset,
        }));
    }

    let (books, total) = state
        .store()
        .list_books(limit, offset)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    Ok(Json(PageResult {
        data: books,
        total,
        limit,
        offset,
    }))
}

/// GET /content/books/{id}
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    if let Some(book) = state
        .store()
        .get_book(&id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
    {
        return Ok(Json(book));
    }

    let book = state
        .shared
        .openlibrary
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;

    if let Err(e) = state.store().upsert_book(&book).await {
        tracing::warn!("Failed to cache book {}: {e}", book.id);
    }
    Ok(Json(book))
}

// ============================================================================
// Travel
// ============================================================================

/// GET /content/locations
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationsQuery>,
) -> Result<Json<PageResult<Location>>, ApiError> {
    let (limit, offset) = validation::pagination(query.limit.as_deref(), query.offset.as_deref());
    let search = non_empty(query.search.as_deref());
    let country = non_empty(query.country.as_deref());

    // a country filter alone still geocodes, using the country as the term
    if let Some(term) = search.or(country) {
        let (locations, total) = state
            .shared
            .locations
            .search(term, country, limit, offset)
            .await?;
        for location in &locations {
            if let Err(e) = state.store().upsert_location(location).await {
                tracing::warn!("Failed to cache location {}: {e}", location.id);
            }
        }
        return Ok(Json(PageResult {
            data: locations,
            total,
            limit,
            offset,
        }));
    }

    let (locations, total) = state
        .store()
        .list_locations(limit, offset)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    Ok(Json(PageResult {
        data: locations,
        total,
        limit,
        offset,
    }))
}

/// GET /content/locations/{id}
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Location>, ApiError> {
    if let Some(location) = state
        .store()
        .get_location(&id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
    {
        return Ok(Json(location));
    }

    let location = state
        .shared
        .locations
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Location not found"))?;

    if let Err(e) = state.store().upsert_location(&location).await {
        tracing::warn!("Failed to cache location {}: {e}", location.id);
    }
    Ok(Json(location))
}
