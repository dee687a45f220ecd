use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, page_for_offset, total_or_len};
use crate::models::content::{MediaKind, Movie, parse_year};

const TMDB_API: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
const TMDB_SITE: &str = "https://www.themoviedb.org";

/// TMDB serves fixed pages of 20 regardless of the requested limit.
const TMDB_PAGE_SIZE: u64 = 20;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
    total_results: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: i64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    success: Option<bool>,
    id: Option<i64>,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    number_of_seasons: Option<i32>,
    number_of_episodes: Option<i32>,
    credits: Option<Credits>,
}

#[derive(Debug, Deserialize)]
struct Credits {
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    job: Option<String>,
    name: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: Option<String>,
}

impl TmdbClient {
    #[must_use]
    pub const fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    fn key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingCredential("TMDB"))
    }

    pub async fn search(
        &self,
        query: &str,
        kind: Option<MediaKind>,
        year: Option<i32>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Movie>, u64), ProviderError> {
        let key = self.key()?;
        let page = page_for_offset(offset, TMDB_PAGE_SIZE);

        let endpoint = match kind {
            Some(MediaKind::Tv) => "search/tv",
            Some(MediaKind::Movie) => "search/movie",
            None => "search/multi",
        };

        let url = format!("{TMDB_API}/{endpoint}");
        let mut request = self.client.get(&url).query(&[
            ("api_key", key),
            ("query", query),
            ("page", &page.to_string()),
            ("include_adult", "false"),
        ]);
        if let Some(year) = year {
            let param = if kind == Some(MediaKind::Tv) {
                "first_air_date_year"
            } else {
                "year"
            };
            request = request.query(&[(param, year.to_string())]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                service: "TMDB",
                message: format!("{status} - {body}"),
            });
        }

        let payload: SearchResponse = response.json().await?;
        let total = total_or_len(payload.total_results, payload.results.len());
        let movies = payload
            .results
            .into_iter()
            .filter(|hit| {
                // /search/multi mixes in people
                kind.is_some()
                    || matches!(hit.media_type.as_deref(), Some("movie" | "tv"))
            })
            .map(|hit| normalize_hit(&hit, kind))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        Ok((movies, total))
    }

    /// Looks the id up as a film first, then as a TV show. Upstream failures
    /// during the lookup are treated as a miss.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Movie>, ProviderError> {
        let key = self.key()?.to_string();

        if let Some(movie) = self.fetch_detail(id, MediaKind::Movie, &key).await {
            return Ok(Some(movie));
        }
        Ok(self.fetch_detail(id, MediaKind::Tv, &key).await)
    }

    async fn fetch_detail(&self, id: &str, kind: MediaKind, key: &str) -> Option<Movie> {
        let url = format!("{TMDB_API}/{}/{id}", kind.as_str());
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", key), ("append_to_response", "credits")])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let detail: DetailResponse = response.json().await.ok()?;
        if detail.success == Some(false) {
            return None;
        }
        let tmdb_id = detail.id?;

        let is_tv = kind == MediaKind::Tv;
        let date = if is_tv {
            detail.first_air_date
        } else {
            detail.release_date
        };
        let director = detail
            .credits
            .and_then(|c| {
                c.crew
                    .into_iter()
                    .find(|m| m.job.as_deref() == Some("Director"))
                    .and_then(|m| m.name)
            })
            .unwrap_or_else(|| "N/A".to_string());

        Some(Movie {
            id: tmdb_id.to_string(),
            title: detail.title.or(detail.name).unwrap_or_default(),
            year: parse_year(date.as_deref().unwrap_or_default()),
            director,
            poster: detail
                .poster_path
                .map(|p| format!("{TMDB_IMAGE_BASE}{p}")),
            season: if is_tv { detail.number_of_seasons } else { None },
            episode: if is_tv {
                detail.number_of_episodes
            } else {
                None
            },
            kind,
            url: Some(format!("{TMDB_SITE}/{}/{tmdb_id}", kind.as_str())),
        })
    }
}

fn normalize_hit(hit: &SearchHit, forced: Option<MediaKind>) -> Movie {
    let is_tv = forced == Some(MediaKind::Tv)
        || hit.media_type.as_deref() == Some("tv")
        || hit.first_air_date.is_some();
    let kind = if is_tv { MediaKind::Tv } else { MediaKind::Movie };

    let date = hit
        .release_date
        .as_deref()
        .or(hit.first_air_date.as_deref())
        .unwrap_or_default();

    Movie {
        id: hit.id.to_string(),
        title: hit
            .title
            .clone()
            .or_else(|| hit.name.clone())
            .unwrap_or_default(),
        year: parse_year(date),
        director: "N/A".to_string(),
        poster: hit
            .poster_path
            .as_ref()
            .map(|p| format!("{TMDB_IMAGE_BASE}{p}")),
        season: None,
        episode: None,
        kind,
        url: Some(format!("{TMDB_SITE}/{}/{}", kind.as_str(), hit.id)),
    }
}
