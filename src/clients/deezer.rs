use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, total_or_len};
use crate::models::content::Album;

const DEEZER_API: &str = "https://api.deezer.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<AlbumHit>,
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AlbumHit {
    id: i64,
    title: String,
    artist: Option<ArtistRef>,
    cover_big: Option<String>,
    cover_medium: Option<String>,
    cover: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumDetail {
    error: Option<serde_json::Value>,
    id: Option<i64>,
    title: Option<String>,
    artist: Option<ArtistRef>,
    cover_big: Option<String>,
    cover_medium: Option<String>,
    cover: Option<String>,
    duration: Option<i64>,
    link: Option<String>,
    tracks: Option<TrackList>,
}

#[derive(Debug, Deserialize)]
struct TrackList {
    #[serde(default)]
    data: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    duration: Option<i64>,
}

/// Deezer requires no credentials for its public catalog.
#[derive(Clone)]
pub struct DeezerClient {
    client: Client,
}

impl DeezerClient {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn search(
        &self,
        query: &str,
        artist: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Album>, u64), ProviderError> {
        let term = match artist {
            Some(artist) => format!("artist:\"{artist}\" {query}").trim().to_string(),
            None => query.to_string(),
        };

        let url = format!(
            "{DEEZER_API}/search/album?q={}&limit={limit}&index={offset}",
            urlencoding::encode(&term)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                service: "Deezer",
                message: format!("{status} - {body}"),
            });
        }

        let payload: SearchResponse = response.json().await?;
        let total = total_or_len(payload.total, payload.data.len());
        let albums = payload.data.into_iter().map(normalize_hit).collect();

        Ok((albums, total))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Album>, ProviderError> {
        let url = format!("{DEEZER_API}/album/{id}");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let detail: AlbumDetail = response.json().await?;
        // Deezer reports misses with HTTP 200 and an error payload
        if detail.error.is_some() {
            return Ok(None);
        }
        let Some(album_id) = detail.id else {
            return Ok(None);
        };

        let duration = match detail.duration {
            Some(total) if total > 0 => Some(total),
            _ => {
                let summed: i64 = detail
                    .tracks
                    .map(|t| t.data.iter().filter_map(|t| t.duration).sum())
                    .unwrap_or(0);
                (summed > 0).then_some(summed)
            }
        };

        Ok(Some(Album {
            id: album_id.to_string(),
            title: detail.title.unwrap_or_default(),
            artist: detail.artist.map(|a| a.name).unwrap_or_default(),
            cover: detail.cover_big.or(detail.cover_medium).or(detail.cover),
            duration,
            url: detail.link,
        }))
    }
}

fn normalize_hit(hit: AlbumHit) -> Album {
    Album {
        id: hit.id.to_string(),
        title: hit.title,
        artist: hit.artist.map(|a| a.name).unwrap_or_default(),
        cover: hit.cover_big.or(hit.cover_medium).or(hit.cover),
        // search results carry no duration; detail lookups fill it in
        duration: None,
        url: hit.link,
    }
}
