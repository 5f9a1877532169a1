//! Trait definition and types for object storage backends.
//!
//! The transfer step hands each upstream image to an [`Uploader`], which
//! copies it into managed storage and reports the identifier and serving URL
//! the backend assigned.

use async_trait::async_trait;
use snapvault_common::Result;

pub mod cloudinary;

pub use cloudinary::CloudinaryClient;

/// An object that storage accepted, as the backend describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Identifier assigned by the storage backend. Keys the database record.
    pub id: String,
    /// URL the stored copy is served from.
    pub uri: String,
}

/// Async trait for copying one image into managed storage.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Transfer the file at `source_uri` into storage.
    async fn upload(&self, source_uri: &str) -> Result<StoredObject>;
}
