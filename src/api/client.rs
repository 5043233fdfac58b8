//! Caching PokeAPI client
//!
//! Every request goes through the expiring cache first. On a miss the raw
//! response body is fetched, stored under the exact request URL, and then
//! decoded. Decoding and HTTP status handling stay here; the cache only sees
//! bytes.

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::{LocationArea, LocationPage, Pokemon};
use crate::cache::Cache;

/// Base URL for PokeAPI v2
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Errors that can occur when fetching data from PokeAPI
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The requested resource does not exist
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// The server answered with a non-success status
    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
}

impl ApiError {
    /// Turns a 404 status into a `NotFound` for the given resource
    fn or_not_found(self, kind: &'static str, name: &str) -> Self {
        match self {
            ApiError::Status { status: 404, .. } => ApiError::NotFound {
                kind,
                name: name.to_string(),
            },
            other => other,
        }
    }
}

/// Client for PokeAPI backed by an expiring response cache
#[derive(Debug)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
    cache: Cache,
}

impl PokeApiClient {
    /// Creates a client for `base_url` that caches responses in `cache`
    pub fn new(base_url: impl Into<String>, cache: Cache) -> Self {
        Self::with_client(Client::new(), base_url, cache)
    }

    /// Creates a client with a custom HTTP client
    pub fn with_client(client: Client, base_url: impl Into<String>, cache: Cache) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            cache,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The response cache used by this client
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Returns the raw body for `url`, from the cache when possible
    ///
    /// On a miss the URL is fetched and, if the response is successful, its
    /// body is stored in the cache under `url`. Unsuccessful responses are
    /// never cached.
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The response body
    /// * `Err(ApiError)` - If the request fails or the status is not 2xx
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        if let Some(body) = self.cache.get(url) {
            debug!(url, "cache hit");
            return Ok(body);
        }

        debug!(url, "cache miss, fetching");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "request returned unsuccessful status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?.to_vec();
        self.cache.add(url, body.clone());
        Ok(body)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let body = self.fetch(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches one page of the location listing
    ///
    /// # Arguments
    /// * `limit` - Page size
    /// * `offset` - Index of the first location on the page
    pub async fn location_page(&self, limit: usize, offset: usize) -> Result<LocationPage, ApiError> {
        let url = format!("{}/location/?limit={}&offset={}", self.base_url, limit, offset);
        self.fetch_json(&url).await
    }

    /// Fetches a location area with its pokemon encounters
    pub async fn location_area(&self, name: &str) -> Result<LocationArea, ApiError> {
        let url = format!("{}/location-area/{}", self.base_url, name);
        self.fetch_json(&url)
            .await
            .map_err(|e| e.or_not_found("location", name))
    }

    /// Fetches a pokemon by name or id
    pub async fn pokemon(&self, name: &str) -> Result<Pokemon, ApiError> {
        let url = format!("{}/pokemon/{}", self.base_url, name);
        self.fetch_json(&url)
            .await
            .map_err(|e| e.or_not_found("pokemon", name))
    }

    /// Stops the cache sweeper and waits for it to exit
    pub async fn shutdown(self) {
        self.cache.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    const PIKACHU_JSON: &str = r#"{"id": 25, "name": "pikachu", "base_experience": 112, "height": 4, "weight": 60, "types": [], "stats": []}"#;

    fn create_test_client(base_url: String) -> PokeApiClient {
        PokeApiClient::new(base_url, Cache::new(Duration::from_secs(60)))
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pokemon/pikachu")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PIKACHU_JSON)
            .expect(1)
            .create_async()
            .await;

        let client = create_test_client(server.url());
        let first = client.pokemon("pikachu").await.expect("First fetch should succeed");
        let second = client.pokemon("pikachu").await.expect("Second fetch should succeed");

        assert_eq!(first, second);
        assert_eq!(second.base_experience, Some(112));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_raw_body_is_cached_under_request_url() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/pokemon/pikachu")
            .with_status(200)
            .with_body(PIKACHU_JSON)
            .create_async()
            .await;

        let client = create_test_client(server.url());
        client.pokemon("pikachu").await.unwrap();

        let key = format!("{}/pokemon/pikachu", server.url());
        assert_eq!(client.cache().get(&key).as_deref(), Some(PIKACHU_JSON.as_bytes()));
    }

    #[tokio::test]
    async fn test_fetch_returns_cached_bytes_without_network() {
        // Nothing listens here; a network call would fail
        let client = create_test_client("http://127.0.0.1:9".to_string());
        let url = "http://127.0.0.1:9/pokemon/pikachu";
        client.cache().add(url, PIKACHU_JSON);

        let pokemon = client.pokemon("pikachu").await.expect("Should decode cached body");
        assert_eq!(pokemon.name, "pikachu");
    }

    #[tokio::test]
    async fn test_not_found_is_reported_and_not_cached() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/location-area/nowhere")
            .with_status(404)
            .with_body("Not Found")
            .expect(2)
            .create_async()
            .await;

        let client = create_test_client(server.url());
        for _ in 0..2 {
            let err = client.location_area("nowhere").await.unwrap_err();
            assert!(matches!(
                err,
                ApiError::NotFound { kind: "location", ref name } if name == "nowhere"
            ));
        }

        assert!(client.cache().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/pokemon/pikachu")
            .with_status(500)
            .create_async()
            .await;

        let client = create_test_client(server.url());
        let err = client.pokemon("pikachu").await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 500, .. }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/pokemon/missingno")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = create_test_client(server.url());
        let err = client.pokemon("missingno").await.unwrap_err();

        assert!(matches!(err, ApiError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_location_page_query_parameters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/location/".to_string()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "20".into()),
                Matcher::UrlEncoded("offset".into(), "40".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"count": 2, "next": null, "previous": null, "results": [{"name": "eterna-city", "url": ""}]}"#)
            .create_async()
            .await;

        let client = create_test_client(server.url());
        let page = client.location_page(20, 40).await.expect("Should fetch page");

        assert_eq!(page.results[0].name, "eterna-city");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_trimmed() {
        let client = create_test_client("https://pokeapi.co/api/v2/".to_string());
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }
}
