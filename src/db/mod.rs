use crate::entities::{shares, users};
use crate::models::content::{Album, Book, Difficulty, Game, Location, MediaKind, Movie};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn album_repo(&self) -> repositories::album::AlbumRepository {
        repositories::album::AlbumRepository::new(self.conn.clone())
    }

    fn game_repo(&self) -> repositories::game::GameRepository {
        repositories::game::GameRepository::new(self.conn.clone())
    }

    fn book_repo(&self) -> repositories::book::BookRepository {
        repositories::book::BookRepository::new(self.conn.clone())
    }

    fn location_repo(&self) -> repositories::location::LocationRepository {
        repositories::location::LocationRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn share_repo(&self) -> repositories::share::ShareRepository {
        repositories::share::ShareRepository::new(self.conn.clone())
    }

    // ========== Content caches ==========

    pub async fn upsert_movie(&self, movie: &Movie) -> Result<()> {
        self.movie_repo().upsert(movie).await
    }

    pub async fn get_movie(&self, id: &str) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn list_movies(
        &self,
        year: Option<i32>,
        kind: Option<MediaKind>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Movie>, u64)> {
        self.movie_repo().list(year, kind, limit, offset).await
    }

    pub async fn search_movies(&self, term: &str, limit: u64) -> Result<Vec<Movie>> {
        self.movie_repo().search(term, limit).await
    }

    pub async fn upsert_album(&self, album: &Album) -> Result<()> {
        self.album_repo().upsert(album).await
    }

    pub async fn get_album(&self, id: &str) -> Result<Option<Album>> {
        self.album_repo().get(id).await
    }

    pub async fn list_albums(&self, limit: u64, offset: u64) -> Result<(Vec<Album>, u64)> {
        self.album_repo().list(limit, offset).await
    }

    pub async fn search_albums(&self, term: &str, limit: u64) -> Result<Vec<Album>> {
        self.album_repo().search(term, limit).await
    }

    pub async fn upsert_game(&self, game: &Game) -> Result<()> {
        self.game_repo().upsert(game).await
    }

    pub async fn get_game(&self, id: &str) -> Result<Option<Game>> {
        self.game_repo().get(id).await
    }

    pub async fn list_games(
        &self,
        platform: Option<&str>,
        difficulty: Option<Difficulty>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Game>, u64)> {
        self.game_repo()
            .list(platform, difficulty, limit, offset)
            .await
    }

    pub async fn search_games(&self, term: &str, limit: u64) -> Result<Vec<Game>> {
        self.game_repo().search(term, limit).await
    }

    pub async fn upsert_book(&self, book: &Book) -> Result<()> {
        self.book_repo().upsert(book).await
    }

    pub async fn get_book(&self, id: &str) -> Result<Option<Book>> {
        self.book_repo().get(id).await
    }

    pub async fn list_books(&self, limit: u64, offset: u64) -> Result<(Vec<Book>, u64)> {
        self.book_repo().list(limit, offset).await
    }

    pub async fn search_books(&self, term: &str, limit: u64) -> Result<Vec<Book>> {
        self.book_repo().search(term, limit).await
    }

    pub async fn upsert_location(&self, location: &Location) -> Result<()> {
        self.location_repo().upsert(location).await
    }

    pub async fn get_location(&self, id: &str) -> Result<Option<Location>> {
        self.location_repo().get(id).await
    }

    pub async fn list_locations(&self, limit: u64, offset: u64) -> Result<(Vec<Location>, u64)> {
        self.location_repo().list(limit, offset).await
    }

    pub async fn search_locations(&self, term: &str, limit: u64) -> Result<Vec<Location>> {
        self.location_repo().search(term, limit).await
    }

    // ========== Users ==========

    pub async fn create_user(&self, user: users::Model) -> Result<()> {
        self.user_repo().create(user).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(user_id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn update_user_profile(
        &self,
        user_id: &str,
        avatar: Option<Option<String>>,
        bio: Option<Option<String>>,
    ) -> Result<users::Model> {
        self.user_repo().update_profile(user_id, avatar, bio).await
    }

    pub async fn update_user_aura(
        &self,
        user_id: &str,
        aura_colors: Option<Option<String>>,
        aesthetic_tags: Option<Option<String>>,
    ) -> Result<users::Model> {
        self.user_repo()
            .update_aura(user_id, aura_colors, aesthetic_tags)
            .await
    }

    // ========== Shares ==========

    pub async fn create_share(&self, share: shares::Model) -> Result<()> {
        self.share_repo().create(share).await
    }

    pub async fn list_shares(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<shares::Model>, u64)> {
        self.share_repo().list_for_user(user_id, limit, offset).await
    }

    pub async fn recent_shares(&self, user_id: &str, limit: u64) -> Result<Vec<shares::Model>> {
        self.share_repo().recent_for_user(user_id, limit).await
    }

    pub async fn share_category_counts(&self, user_id: &str) -> Result<Vec<(String, i64)>> {
        self.share_repo().category_counts(user_id).await
    }
}
