//! Bounded fan-out transfer of upstream images into storage.
//!
//! One batch spawns one task per image reference. A semaphore caps how many
//! transfers run at once, and every task reports into a single mpsc channel
//! that the coordinator drains until all senders are gone. Channel closure
//! is the completion signal: a task that panics drops its sender without
//! sending, so the drain loop still terminates.

use std::sync::Arc;

use snapvault_db::models::ImageRecord;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, warn};

use crate::provider::ImageReference;
use crate::storage::Uploader;

/// Coordinates the transfer phase of one ingestion batch.
///
/// Results are collected in arrival order; nothing about the upstream
/// listing order survives the fan-out.
pub struct UploadCoordinator {
    uploader: Arc<dyn Uploader>,
    max_in_flight: usize,
}

impl UploadCoordinator {
    /// Create a coordinator that keeps at most `max_in_flight` transfers
    /// running at once. A zero bound is clamped to 1 so a batch can never
    /// deadlock waiting for a permit that does not exist.
    pub fn new(uploader: Arc<dyn Uploader>, max_in_flight: usize) -> Self {
        Self {
            uploader,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Transfer every reference and return the records that succeeded.
    ///
    /// Per-image failures are logged and skipped; they shrink the result
    /// instead of failing the batch. Returns once every spawned task has
    /// reported or died.
    pub async fn run(&self, references: Vec<ImageReference>) -> Vec<ImageRecord> {
        let total = references.len();
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let (tx, mut rx) = mpsc::channel(total.max(1));

        for reference in references {
            let semaphore = semaphore.clone();
            let uploader = self.uploader.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");

                let outcome = uploader.upload(&reference.source_uri).await;

                // A closed channel means the batch was abandoned; the
                // result has nowhere to go.
                let _ = tx.send((reference, outcome)).await;
            });
        }

        // Only task-held senders remain; the channel closes when the last
        // task finishes.
        drop(tx);

        let mut records = Vec::with_capacity(total);
        while let Some((reference, outcome)) = rx.recv().await {
            match outcome {
                Ok(stored) => {
                    debug!(id = %stored.id, "transfer complete");
                    records.push(ImageRecord {
                        id: stored.id,
                        uri: stored.uri,
                        hits: 1,
                        is_deleted: false,
                    });
                }
                Err(e) => {
                    warn!(
                        source_uri = %reference.source_uri,
                        error = %e,
                        "transfer failed, skipping image"
                    );
                }
            }
        }

        records
    }
}
