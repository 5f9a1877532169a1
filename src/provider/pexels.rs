//! Pexels curated-photos provider.
//!
//! Implements [`ImageProvider`] against the Pexels v1 REST API (or any
//! endpoint speaking the same shape). Authentication is a bare API key in
//! the `Authorization` header; responses carry a `photos` array where each
//! entry lists its source files under `src`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use snapvault_common::{Error, Result};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::provider::{ImageProvider, ImageReference};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Pexels API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CuratedResponse {
    photos: Vec<CuratedPhoto>,
}

#[derive(Debug, Deserialize)]
struct CuratedPhoto {
    src: PhotoSource,
}

#[derive(Debug, Deserialize)]
struct PhotoSource {
    original: String,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// Pexels image provider.
///
/// # Examples
///
/// ```no_run
/// use snapvault::config::ProviderConfig;
/// use snapvault::provider::PexelsClient;
///
/// let provider = PexelsClient::new(&ProviderConfig::default());
/// ```
pub struct PexelsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PexelsClient {
    /// Create a new provider from configuration.
    pub fn new(config: &ProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn curated_url(&self, limit: i64) -> String {
        format!("{}/curated?per_page={}", self.base_url, limit)
    }
}

#[async_trait]
impl ImageProvider for PexelsClient {
    async fn fetch_batch(&self, limit: i64) -> Result<Vec<ImageReference>> {
        let url = self.curated_url(limit);

        let resp = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::upstream_unavailable(format!("curated request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::upstream_unavailable(format!(
                "curated request returned {}",
                status
            )));
        }

        let page: CuratedResponse = resp
            .json()
            .await
            .map_err(|e| Error::upstream_format(format!("curated response undecodable: {}", e)))?;

        debug!(requested = limit, received = page.photos.len(), "fetched curated batch");

        Ok(page
            .photos
            .into_iter()
            .map(|photo| ImageReference {
                source_uri: photo.src.original,
            })
            .collect())
    }
}
