use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub mod auth;
mod aura;
mod content;
mod error;
mod extract;
mod search;
mod system;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn config(&self) -> &crate::config::Config {
        &self.shared.config
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected = Router::new()
        .route("/users/profile", get(users::get_profile))
        .route("/users/profile", put(users::update_profile))
        .route("/aura/profile", get(aura::get_aura_profile))
        .route("/aura/profile", put(aura::update_aura_profile))
        .route("/aura/shares", get(aura::list_shares))
        .route("/aura/shares", post(aura::create_share))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let api_router = Router::new()
        .merge(protected)
        .route("/health", get(system::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/{id}", get(users::get_user))
        .route("/aura/profile/{id}", get(aura::get_public_aura_profile))
        .route("/content/movies", get(content::list_movies))
        .route("/content/movies/{id}", get(content::get_movie))
        .route("/content/albums", get(content::list_albums))
        .route("/content/albums/{id}", get(content::get_album))
        .route("/content/games", get(content::list_games))
        .route("/content/games/{id}", get(content::get_game))
        .route("/content/books", get(content::list_books))
        .route("/content/books/{id}", get(content::get_book))
        .route("/content/locations", get(content::list_locations))
        .route("/content/locations/{id}", get(content::get_location))
        .route("/search", get(search::global_search))
        .with_state(state);

    let cors_layer = if cors_origins.is_empty() || cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api/v1", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
