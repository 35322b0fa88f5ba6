use crate::{
    error::{ApiError, Result},
    models::{MovieDetail, SearchResult},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Read access to a movie metadata provider.
///
/// Implementations absorb every upstream failure: a failed search yields an
/// empty list and a failed lookup yields `None`.
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn search(&self, keyword: &str, page: u32) -> Vec<SearchResult>;
    async fn fetch_detail(&self, imdb_id: &str) -> Option<MovieDetail>;
}

/// Client for an OMDb-style API: one endpoint, query parameters select the mode
/// and every body carries a `Response` flag plus an optional `Error` message.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }

    async fn try_search(&self, keyword: &str, page: u32) -> Result<Vec<SearchResult>> {
        let page = page.to_string();
        let body = self
            .get(&[("s", keyword), ("page", page.as_str()), ("type", "movie")])
            .await?;
        parse_search(body)
    }

    async fn try_fetch_detail(&self, imdb_id: &str) -> Result<MovieDetail> {
        let body = self.get(&[("i", imdb_id), ("plot", "full")]).await?;
        parse_detail(body)
    }
}

#[async_trait]
impl MovieApi for OmdbClient {
    async fn search(&self, keyword: &str, page: u32) -> Vec<SearchResult> {
        match self.try_search(keyword, page).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Search for '{}' failed: {}", keyword, e);
                Vec::new()
            }
        }
    }

    async fn fetch_detail(&self, imdb_id: &str) -> Option<MovieDetail> {
        debug!("Retrieving movie details for {}", imdb_id);
        match self.try_fetch_detail(imdb_id).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                warn!("Detail lookup for {} failed: {}", imdb_id, e);
                None
            }
        }
    }
}

/// Checks the provider's `Response` flag, turning a negative answer into an error
/// carrying the provider's `Error` message.
fn ensure_affirmative(body: &Value) -> Result<()> {
    if body.get("Response").and_then(Value::as_str) == Some("True") {
        return Ok(());
    }

    let reason = body
        .get("Error")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error");
    Err(ApiError::ExternalService(reason.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(ApiError::from)
}

/// Interprets a search response body.
pub fn parse_search(mut body: Value) -> Result<Vec<SearchResult>> {
    ensure_affirmative(&body)?;

    match body.get_mut("Search").map(Value::take) {
        Some(results) => decode(results),
        None => Ok(Vec::new()),
    }
}

/// Interprets a detail response body.
pub fn parse_detail(body: Value) -> Result<MovieDetail> {
    ensure_affirmative(&body)?;
    decode(body)
}
