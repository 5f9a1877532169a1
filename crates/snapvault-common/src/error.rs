//! Common error types used throughout snapvault.
//!
//! This module provides a unified error type that covers common failure
//! cases such as invalid input, upstream fetch failures, upload failures,
//! and record store errors. Fetch failures abort an ingestion run; upload
//! failures only shrink it.

/// Common error type for snapvault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller supplied an unusable input (e.g. a non-positive limit).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The upstream provider could not be reached or answered with a
    /// non-success status. Fatal to the ingestion call.
    #[error("Upstream provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream provider answered, but the body could not be decoded
    /// into the expected shape. Fatal to the ingestion call.
    #[error("Upstream response malformed: {0}")]
    UpstreamFormat(String),

    /// A single image transfer to the storage backend failed. Isolated to
    /// that item; never fatal to the batch.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A record store operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A batch write stopped partway through. `inserted` is the number of
    /// records durably written before the failure.
    #[error("Batch write aborted after {inserted} records: {cause}")]
    PartialWrite { inserted: usize, cause: String },
}

impl Error {
    /// Create a new InvalidArgument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new UpstreamUnavailable error.
    pub fn upstream_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    /// Create a new UpstreamFormat error.
    pub fn upstream_format<S: Into<String>>(msg: S) -> Self {
        Self::UpstreamFormat(msg.into())
    }

    /// Create a new UploadFailed error.
    pub fn upload_failed<S: Into<String>>(msg: S) -> Self {
        Self::UploadFailed(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
