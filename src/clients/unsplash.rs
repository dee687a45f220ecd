use reqwest::Client;
use serde::Deserialize;

const UNSPLASH_API: &str = "https://api.unsplash.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

/// Optional image enrichment. Without an access key every lookup yields
/// nothing, which callers treat as "no photo".
#[derive(Clone)]
pub struct UnsplashClient {
    client: Client,
    access_key: Option<String>,
}

impl UnsplashClient {
    #[must_use]
    pub const fn new(client: Client, access_key: Option<String>) -> Self {
        Self { client, access_key }
    }

    pub async fn city_photo(&self, name: &str) -> Option<String> {
        let key = self.access_key.as_deref().filter(|k| !k.is_empty())?;

        let url = format!("{UNSPLASH_API}/search/photos");
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Client-ID {key}"))
            .query(&[
                ("query", format!("{name} city landscape")),
                ("per_page", "1".to_string()),
                ("orientation", "landscape".to_string()),
            ])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let payload: SearchResponse = response.json().await.ok()?;
        payload.results.into_iter().next().and_then(|p| p.urls.regular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_access_key_yields_no_photo() {
        let client = UnsplashClient::new(Client::new(), None);
        assert!(client.city_photo("Paris").await.is_none());

        let client = UnsplashClient::new(Client::new(), Some(String::new()));
        assert!(client.city_photo("Paris").await.is_none());
    }
}
