//! Ingestion service coordinating fetch, transfer, and persistence.
//!
//! Provides the high-level `ingest` operation plus the record operations
//! the caller surface exposes. Owns the limit clamp, so collaborators can
//! trust the limits they receive.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use snapvault_common::{Error, Result};
use snapvault_db::models::{ImagePatch, ImageRecord};
use snapvault_db::pool::{get_conn, DbPool};
use snapvault_db::queries::images;
use tracing::{info, warn};

use crate::config::IngestConfig;
use crate::ingest::UploadCoordinator;
use crate::provider::ImageProvider;
use crate::storage::Uploader;

/// Outcome of one ingestion batch.
///
/// `limit` is the number of records actually produced after clamping and
/// after failed transfers are dropped, never the requested count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionResult {
    pub limit: usize,
    pub records: Vec<ImageRecord>,
}

/// High-level ingestion service.
///
/// One instance is shared across the server; all state lives in the
/// collaborators it holds.
pub struct IngestService {
    provider: Arc<dyn ImageProvider>,
    coordinator: UploadCoordinator,
    pool: DbPool,
    hard_limit: i64,
}

impl IngestService {
    /// Create a new `IngestService`.
    ///
    /// # Arguments
    ///
    /// * `provider` - Upstream image source
    /// * `uploader` - Storage backend for the transfer phase
    /// * `pool` - Database connection pool
    /// * `config` - Batch size ceiling and concurrency bound
    pub fn new(
        provider: Arc<dyn ImageProvider>,
        uploader: Arc<dyn Uploader>,
        pool: DbPool,
        config: &IngestConfig,
    ) -> Self {
        Self {
            provider,
            coordinator: UploadCoordinator::new(uploader, config.max_concurrent_uploads),
            pool,
            hard_limit: config.hard_limit,
        }
    }

    /// Run one ingestion batch of up to `requested_limit` images.
    ///
    /// The limit is clamped to the configured hard limit before the
    /// upstream fetch. A fetch failure aborts the batch; individual
    /// transfer failures only shrink it. Persistence is best-effort: a
    /// write failure is logged and the in-memory result is returned
    /// anyway, since the uploads have already happened.
    pub async fn ingest(&self, requested_limit: i64) -> Result<IngestionResult> {
        if requested_limit <= 0 {
            return Err(Error::invalid_argument(format!(
                "limit must be positive, got {}",
                requested_limit
            )));
        }

        let limit = requested_limit.min(self.hard_limit);
        if limit < requested_limit {
            info!(requested = requested_limit, clamped = limit, "limit clamped");
        }

        let references = self.provider.fetch_batch(limit).await?;
        let fetched = references.len();

        let records = self.coordinator.run(references).await;

        info!(
            requested = requested_limit,
            fetched,
            transferred = records.len(),
            "ingestion batch complete"
        );

        match self.persist(&records) {
            Ok(written) => {
                if written < records.len() {
                    warn!(
                        written,
                        transferred = records.len(),
                        "fewer records persisted than transferred"
                    );
                }
            }
            Err(e) => {
                // Storage already accepted the uploads; losing rows is a
                // durability gap, not a batch failure.
                warn!(error = %e, "persistence incomplete after ingest");
            }
        }

        Ok(IngestionResult {
            limit: records.len(),
            records,
        })
    }

    fn persist(&self, records: &[ImageRecord]) -> Result<usize> {
        let conn = get_conn(&self.pool)?;
        images::insert_many(&conn, records)
    }

    /// Fetch a record by id. Soft-deleted records are returned too.
    pub fn get_record(&self, id: &str) -> Result<ImageRecord> {
        let conn = get_conn(&self.pool)?;
        images::find_by_id(&conn, id)?.ok_or_else(|| Error::not_found(id))
    }

    /// Apply a partial update and return the updated record.
    ///
    /// Negative hit counts are rejected before touching the store.
    pub fn update_record(&self, id: &str, patch: &ImagePatch) -> Result<ImageRecord> {
        if let Some(hits) = patch.hits {
            if hits < 0 {
                return Err(Error::invalid_argument(format!(
                    "hits must not be negative, got {}",
                    hits
                )));
            }
        }

        let conn = get_conn(&self.pool)?;
        images::update_partial(&conn, id, patch)?.ok_or_else(|| Error::not_found(id))
    }

    /// Soft-delete a record, returning how many rows matched (0 or 1).
    pub fn soft_delete_record(&self, id: &str) -> Result<usize> {
        let conn = get_conn(&self.pool)?;
        let matched = images::soft_delete(&conn, id)?;

        info!(id, matched, "soft delete");

        Ok(matched)
    }
}
