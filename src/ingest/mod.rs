//! Batch image ingestion pipeline.
//!
//! An ingestion batch runs in three phases: fetch a page of image
//! references from the upstream provider, transfer each one into managed
//! storage under a concurrency bound, and persist the surviving records.
//! [`IngestService`] drives the phases; [`UploadCoordinator`] owns the
//! bounded fan-out in the middle.

pub mod coordinator;
pub mod service;

pub use coordinator::UploadCoordinator;
pub use service::{IngestService, IngestionResult};
