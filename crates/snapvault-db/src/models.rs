//! Internal Rust models matching the database schema.
//!
//! This module provides strongly-typed Rust structures that map to the
//! `images` table. Records are keyed by the identifier the storage backend
//! assigned at upload time, so the id column is a plain string rather than
//! a locally generated value.

use serde::{Deserialize, Serialize};

/// A stored image record.
///
/// `hits` starts at 1 when a record is first persisted and is only changed
/// through explicit partial updates. `is_deleted` marks retirement; rows are
/// never hard deleted by the application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: String,
    pub uri: String,
    pub hits: i64,
    pub is_deleted: bool,
}

/// A partial update to an existing image record.
///
/// Fields left as `None` keep their stored values. An all-`None` patch is
/// valid and leaves the record untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImagePatch {
    pub uri: Option<String>,
    pub hits: Option<i64>,
}
