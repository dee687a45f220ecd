use crate::clients::deezer::DeezerClient;
use crate::clients::openlibrary::OpenLibraryClient;
use crate::clients::openmeteo::LocationsClient;
use crate::clients::rawg::RawgClient;
use crate::clients::tmdb::TmdbClient;
use crate::clients::unsplash::UnsplashClient;
use crate::config::Config;
use crate::db::Store;

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all provider clients to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("VibeCheck/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub tmdb: TmdbClient,

    pub deezer: DeezerClient,

    pub rawg: RawgClient,

    pub openlibrary: OpenLibraryClient,

    pub locations: LocationsClient,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        let http_client = build_shared_http_client(config.providers.request_timeout_seconds)?;

        let tmdb = TmdbClient::new(http_client.clone(), config.providers.tmdb_api_key.clone());
        let deezer = DeezerClient::new(http_client.clone());
        let rawg = RawgClient::new(http_client.clone(), config.providers.rawg_api_key.clone());
        let openlibrary = OpenLibraryClient::new(http_client.clone());
        let unsplash = UnsplashClient::new(
            http_client.clone(),
            config.providers.unsplash_access_key.clone(),
        );
        let locations = LocationsClient::new(http_client, unsplash);

        Ok(Self {
            config,
            store,
            tmdb,
            deezer,
            rawg,
            openlibrary,
            locations,
        })
    }
}
