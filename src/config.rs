use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    pub providers: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log filter directive, e.g. "info" or "vibecheck=debug,info".
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// Origins allowed by CORS. Empty means allow any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:vibecheck.db".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,

    pub token_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_days: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub tmdb_api_key: Option<String>,

    pub rawg_api_key: Option<String>,

    pub unsplash_access_key: Option<String>,

    pub request_timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            rawg_api_key: None,
            unsplash_access_key: None,
            request_timeout_seconds: 15,
        }
    }
}

impl Config {
    /// Reads configuration from the environment, loading a `.env` file first
    /// when one is present.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(port) = read_env("PORT") {
            config.server.port = port.parse().context("PORT must be a number")?;
        }
        if let Some(origins) = read_env("CORS_ALLOWED_ORIGINS") {
            config.server.cors_allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(url) = read_env("DATABASE_URL") {
            config.database.url = url;
        }
        if let Some(secret) = read_env("JWT_SECRET_KEY") {
            config.auth.jwt_secret = secret;
        }
        if let Some(timeout) = read_env("API_TIMEOUT") {
            config.providers.request_timeout_seconds = timeout
                .parse()
                .context("API_TIMEOUT must be a number of seconds")?;
        }
        if let Some(level) = read_env("LOG_LEVEL") {
            config.general.log_level = level;
        }
        config.providers.tmdb_api_key = read_env("TMDB_API_KEY");
        config.providers.rawg_api_key = read_env("RAWG_API_KEY");
        config.providers.unsplash_access_key = read_env("UNSPLASH_ACCESS_KEY");

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            bail!("JWT_SECRET_KEY must be set");
        }
        if self.auth.token_ttl_days <= 0 {
            bail!("token TTL must be positive");
        }
        Ok(())
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
