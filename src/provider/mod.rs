//! Trait definition and types for upstream image providers.
//!
//! This module defines the [`ImageProvider`] trait that image sources must
//! implement, along with the reference type a fetch returns. Each provider
//! wraps a single external API and exposes a uniform interface for listing
//! curated images.

use async_trait::async_trait;
use snapvault_common::Result;

pub mod pexels;

pub use pexels::PexelsClient;

/// A reference to a single upstream image, ready to be transferred.
///
/// Carries only what the transfer step needs: the direct URL of the
/// full-resolution source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Fully-qualified URL of the original image file.
    pub source_uri: String,
}

/// Async trait for listing images from an upstream source.
///
/// Implementations are expected to be cheaply shareable behind an `Arc` so
/// they can be used across tasks.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Fetch references for up to `limit` curated images.
    ///
    /// The upstream may return fewer than `limit` entries; an empty batch is
    /// not an error.
    async fn fetch_batch(&self, limit: i64) -> Result<Vec<ImageReference>>;
}
