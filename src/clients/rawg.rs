use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, page_for_offset, total_or_len};
use crate::models::content::{Difficulty, Game};

const RAWG_API: &str = "https://api.rawg.io/api";
const RAWG_SITE: &str = "https://rawg.io/games";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    count: Option<u64>,
    #[serde(default)]
    results: Vec<GameHit>,
}

#[derive(Debug, Deserialize)]
struct GameHit {
    id: i64,
    name: String,
    slug: Option<String>,
    background_image: Option<String>,
    playtime: Option<i32>,
    platforms: Option<Vec<PlatformWrap>>,
}

#[derive(Debug, Deserialize)]
struct PlatformWrap {
    platform: PlatformRef,
}

#[derive(Debug, Deserialize)]
struct PlatformRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GameDetail {
    detail: Option<String>,
    id: Option<i64>,
    name: Option<String>,
    slug: Option<String>,
    background_image: Option<String>,
    playtime: Option<i32>,
    platforms: Option<Vec<PlatformWrap>>,
}

#[derive(Clone)]
pub struct RawgClient {
    client: Client,
    api_key: Option<String>,
}

impl RawgClient {
    #[must_use]
    pub const fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    fn key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingCredential("RAWG"))
    }

    pub async fn search(
        &self,
        query: &str,
        platform: Option<&str>,
        difficulty: Option<Difficulty>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Game>, u64), ProviderError> {
        let key = self.key()?;

        let term = match platform {
            Some(platform) => format!("{query} {platform}"),
            None => query.to_string(),
        };
        let page = page_for_offset(offset, limit);
        // over-fetch when filtering by difficulty, since the provider
        // cannot filter on a derived field
        let page_size = if difficulty.is_some() { limit * 2 } else { limit };

        let url = format!("{RAWG_API}/games");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", key),
                ("search", &term),
                ("page", &page.to_string()),
                ("page_size", &page_size.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                service: "RAWG",
                message: format!("{status} - {body}"),
            });
        }

        let payload: SearchResponse = response.json().await?;
        let total = total_or_len(payload.count, payload.results.len());
        let games = payload
            .results
            .into_iter()
            .map(normalize_hit)
            .filter(|g| difficulty.is_none() || g.difficulty == difficulty)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        // count stays provider-reported, so it does not account for the
        // difficulty filter applied above
        Ok((games, total))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Game>, ProviderError> {
        let key = self.key()?;

        let url = format!("{RAWG_API}/games/{id}");
        let response = self.client.get(&url).query(&[("key", key)]).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                service: "RAWG",
                message: format!("{status} - {body}"),
            });
        }

        let detail: GameDetail = response.json().await?;
        if detail.detail.is_some() {
            return Ok(None);
        }
        let Some(game_id) = detail.id else {
            return Ok(None);
        };

        Ok(Some(Game {
            id: game_id.to_string(),
            title: detail.name.unwrap_or_default(),
            platform: first_platform(detail.platforms),
            cover: detail.background_image,
            difficulty: Difficulty::from_playtime(detail.playtime),
            url: detail.slug.map(|s| format!("{RAWG_SITE}/{s}")),
        }))
    }
}

fn first_platform(platforms: Option<Vec<PlatformWrap>>) -> String {
    platforms
        .and_then(|p| p.into_iter().next())
        .map(|w| w.platform.name)
        .unwrap_or_default()
}

fn normalize_hit(hit: GameHit) -> Game {
    Game {
        id: hit.id.to_string(),
        title: hit.name,
        platform: first_platform(hit.platforms),
        cover: hit.background_image,
        difficulty: Difficulty::from_playtime(hit.playtime),
        url: hit.slug.map(|s| format!("{RAWG_SITE}/{s}")),
    }
}
