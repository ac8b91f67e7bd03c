//! Stock-image search client (Freepik-style resources API).

use async_trait::async_trait;
use serde::Deserialize;

use crate::{ensure_success, GenAiError, ImageSearch};

/// HTTP client for a Freepik-compatible resource search API.
pub struct ImageSearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ImageSearchClient {
    /// Create a new client.
    ///
    /// * `base_url` - API base, e.g. `https://api.freepik.com/v1`.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl ImageSearch for ImageSearchClient {
    /// Search for one image and return the first hit's source URL.
    ///
    /// An empty result set is `Ok(None)`, not an error: the caller records
    /// the miss and the export renders a placeholder.
    async fn search(&self, query: &str) -> Result<Option<String>, GenAiError> {
        let response = self
            .client
            .get(format!("{}/resources", self.base_url))
            .header("x-freepik-api-key", &self.api_key)
            .query(&[
                ("locale", "en-US"),
                ("page", "1"),
                ("limit", "1"),
                ("order", "latest"),
                ("term", query),
            ])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let parsed = response.json::<ResourceSearchResponse>().await?;

        Ok(parsed
            .data
            .into_iter()
            .next()
            .map(|hit| hit.image.source.url))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ResourceSearchResponse {
    #[serde(default)]
    data: Vec<ResourceHit>,
}

#[derive(Debug, Deserialize)]
struct ResourceHit {
    image: ResourceImage,
}

#[derive(Debug, Deserialize)]
struct ResourceImage {
    source: ResourceSource,
}

#[derive(Debug, Deserialize)]
struct ResourceSource {
    url: String,
}
