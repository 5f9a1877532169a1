//! Cloudinary unsigned-upload storage backend.
//!
//! Implements [`Uploader`] against the Cloudinary upload API (or any
//! endpoint speaking the same shape). Uploads are unsigned: the request is
//! a form POST carrying the source URL in `file` plus an `upload_preset`,
//! and Cloudinary fetches the image itself. The response names the stored
//! copy via `public_id` and its serving URL via `secure_url` (with `url` as
//! the plain-HTTP fallback).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use snapvault_common::{Error, Result};
use tracing::debug;

use crate::config::StorageConfig;
use crate::storage::{StoredObject, Uploader};

// Remote fetch plus transcode can take a while on large originals.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Cloudinary API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    public_id: String,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    secure_url: Option<String>,
}

impl UploadResponse {
    fn serving_url(&self) -> Option<&str> {
        self.secure_url.as_deref().or(self.url.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Uploader implementation
// ---------------------------------------------------------------------------

/// Cloudinary storage backend.
///
/// # Examples
///
/// ```no_run
/// use snapvault::config::StorageConfig;
/// use snapvault::storage::CloudinaryClient;
///
/// let uploader = CloudinaryClient::new(&StorageConfig::default());
/// ```
pub struct CloudinaryClient {
    client: reqwest::Client,
    base_url: String,
    cloud_name: String,
    upload_preset: String,
}

impl CloudinaryClient {
    /// Create a new storage backend from configuration.
    pub fn new(config: &StorageConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            upload_preset: config.upload_preset.clone(),
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.base_url, self.cloud_name)
    }
}

#[async_trait]
impl Uploader for CloudinaryClient {
    async fn upload(&self, source_uri: &str) -> Result<StoredObject> {
        let resp = self
            .client
            .post(self.upload_url())
            .form(&[
                ("file", source_uri),
                ("upload_preset", self.upload_preset.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::upload_failed(format!("upload request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::upload_failed(format!(
                "upload returned {}: {}",
                status, body
            )));
        }

        let upload: UploadResponse = resp
            .json()
            .await
            .map_err(|e| Error::upload_failed(format!("upload response undecodable: {}", e)))?;

        if upload.public_id.is_empty() {
            return Err(Error::upload_failed("upload response missing public_id"));
        }

        let uri = upload
            .serving_url()
            .ok_or_else(|| Error::upload_failed("upload response missing url"))?
            .to_string();

        debug!(id = %upload.public_id, "stored image");

        Ok(StoredObject {
            id: upload.public_id,
            uri,
        })
    }
}
