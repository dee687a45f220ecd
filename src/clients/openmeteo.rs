use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;

use super::ProviderError;
use super::unsplash::UnsplashClient;
use crate::models::content::Location;

const GEOCODING_API: &str = "https://geocoding-api.open-meteo.com/v1";
const FORECAST_API: &str = "https://api.open-meteo.com/v1";

/// The geocoder caps result sets at 100; the full eligible set is fetched so
/// country filtering and pagination happen over everything it can return.
const GEOCODING_FETCH_COUNT: u64 = 100;

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeoHit>,
}

#[derive(Debug, Deserialize, Clone)]
struct GeoHit {
    id: i64,
    name: String,
    country: Option<String>,
    country_code: Option<String>,
    latitude: f64,
    longitude: f64,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    timezone: Option<String>,
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: i32,
}

struct WeatherNow {
    temperature: f64,
    description: &'static str,
    timezone: Option<String>,
}

/// Open-Meteo geocoding plus per-location enrichment from the forecast API
/// and Unsplash. Geocoding and forecasts require no credentials.
#[derive(Clone)]
pub struct LocationsClient {
    client: Client,
    unsplash: UnsplashClient,
}

impl LocationsClient {
    #[must_use]
    pub const fn new(client: Client, unsplash: UnsplashClient) -> Self {
        Self { client, unsplash }
    }

    pub async fn search(
        &self,
        query: &str,
        country: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Location>, u64), ProviderError> {
        let url = format!(
            "{GEOCODING_API}/search?name={}&count={GEOCODING_FETCH_COUNT}&language=en&format=json",
            urlencoding::encode(query)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                service: "Open-Meteo",
                message: format!("{status} - {body}"),
            });
        }

        let payload: GeocodingResponse = response.json().await?;
        let eligible: Vec<GeoHit> = match country {
            Some(country) => {
                let term = country.to_lowercase();
                payload
                    .results
                    .into_iter()
                    .filter(|hit| matches_country(hit, &term))
                    .collect()
            }
            None => payload.results,
        };

        let total = eligible.len() as u64;

        // page first, then enrich: weather and photo lookups are per-location
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(eligible.len());
        let end = start
            .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
            .min(eligible.len());
        let page = eligible[start..end].to_vec();

        let locations = join_all(page.into_iter().map(|hit| self.enrich(hit))).await;

        Ok((locations, total))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Location>, ProviderError> {
        let Ok(numeric_id) = id.parse::<i64>() else {
            return Ok(None);
        };

        let url = format!("{GEOCODING_API}/get?id={numeric_id}");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let Ok(hit) = response.json::<GeoHit>().await else {
            return Ok(None);
        };

        Ok(Some(self.enrich(hit).await))
    }

    /// Weather and photo are fetched concurrently and both are best effort.
    async fn enrich(&self, hit: GeoHit) -> Location {
        let (weather, image) = tokio::join!(
            self.fetch_weather(hit.latitude, hit.longitude),
            self.unsplash.city_photo(&hit.name),
        );

        let mut timezone = hit.timezone;
        let (description, temperature) = match weather {
            Some(now) => {
                if now.timezone.is_some() {
                    timezone = now.timezone;
                }
                (Some(now.description.to_string()), Some(now.temperature))
            }
            None => (None, None),
        };

        Location {
            id: hit.id.to_string(),
            city: hit.name.clone(),
            name: hit.name,
            country: hit.country.unwrap_or_default(),
            image,
            weather: description,
            temperature,
            timezone,
            url: Some(format!(
                "https://www.google.com/maps/@{},{},12z",
                hit.latitude, hit.longitude
            )),
        }
    }

    async fn fetch_weather(&self, latitude: f64, longitude: f64) -> Option<WeatherNow> {
        let url = format!(
            "{FORECAST_API}/forecast?latitude={latitude}&longitude={longitude}&current_weather=true&timezone=auto"
        );

        let response = self.client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }

        let payload: ForecastResponse = response.json().await.ok()?;
        let current = payload.current_weather?;

        Some(WeatherNow {
            temperature: current.temperature,
            description: wmo_description(current.weathercode),
            timezone: payload.timezone,
        })
    }
}

fn matches_country(hit: &GeoHit, term: &str) -> bool {
    let in_name = hit
        .country
        .as_deref()
        .is_some_and(|c| c.to_lowercase().contains(term));
    let in_code = hit
        .country_code
        .as_deref()
        .is_some_and(|c| c.to_lowercase().contains(term));
    in_name || in_code
}

/// WMO weather interpretation codes, as documented by Open-Meteo.
const fn wmo_description(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
