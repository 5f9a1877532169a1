//! Snapvault - Curated image ingestion and archival service
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod ingest;
pub mod provider;
pub mod server;
pub mod storage;
