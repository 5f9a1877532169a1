//! Image record queries.
//!
//! This module provides persistence for ingested image records: batch
//! upsert, lookup by id, partial update, and soft delete. Lookups do not
//! filter on `is_deleted`; retired records stay readable.

use rusqlite::Connection;
use snapvault_common::{Error, Result};

use crate::models::{ImagePatch, ImageRecord};

/// Parse an image record from a database row.
///
/// Expects columns in order: id, uri, hits, is_deleted.
fn parse_image_row(row: &rusqlite::Row) -> rusqlite::Result<ImageRecord> {
    Ok(ImageRecord {
        id: row.get(0)?,
        uri: row.get(1)?,
        hits: row.get(2)?,
        is_deleted: row.get::<_, i64>(3)? != 0,
    })
}

/// Insert a single record, refreshing the URI if the id already exists.
///
/// On conflict only `uri` is replaced; `hits` and `is_deleted` keep their
/// stored values, so re-ingesting an image does not reset its counters or
/// resurrect a retired record.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `record` - Record to insert
///
/// # Returns
///
/// * `Ok(())` - The record was written
/// * `Err(Error)` - If a database error occurs
pub fn upsert_record(conn: &Connection, record: &ImageRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO images (id, uri, hits, is_deleted)
         VALUES (:id, :uri, :hits, :is_deleted)
         ON CONFLICT(id) DO UPDATE SET uri = excluded.uri",
        rusqlite::named_params! {
            ":id": &record.id,
            ":uri": &record.uri,
            ":hits": record.hits,
            ":is_deleted": record.is_deleted as i64,
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Insert a batch of records one at a time.
///
/// Writes are applied sequentially and are not wrapped in a transaction,
/// so records written before a failure stay written. A mid-batch failure
/// surfaces as [`Error::PartialWrite`] carrying the number of records that
/// landed before the error.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `records` - Records to insert
///
/// # Returns
///
/// * `Ok(usize)` - Number of records written (the full batch)
/// * `Err(Error::PartialWrite)` - If a write fails partway through
pub fn insert_many(conn: &Connection, records: &[ImageRecord]) -> Result<usize> {
    let mut inserted = 0;
    for record in records {
        upsert_record(conn, record).map_err(|e| Error::PartialWrite {
            inserted,
            cause: e.to_string(),
        })?;
        inserted += 1;
    }

    Ok(inserted)
}

/// Get an image record by id.
///
/// Soft-deleted records are returned like any other row.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `id` - Storage-assigned record id
///
/// # Returns
///
/// * `Ok(Some(ImageRecord))` - The record if found
/// * `Ok(None)` - If no record has this id
/// * `Err(Error)` - If a database error occurs
pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<ImageRecord>> {
    let result = conn.query_row(
        "SELECT id, uri, hits, is_deleted FROM images WHERE id = :id",
        rusqlite::named_params! { ":id": id },
        parse_image_row,
    );

    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Apply a partial update to a record and return the updated row.
///
/// Only the fields present in the patch are written. An all-`None` patch
/// performs no write and returns the stored record unchanged.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `id` - Storage-assigned record id
/// * `patch` - Fields to change
///
/// # Returns
///
/// * `Ok(Some(ImageRecord))` - The record after the update
/// * `Ok(None)` - If no record has this id
/// * `Err(Error)` - If a database error occurs
pub fn update_partial(
    conn: &Connection,
    id: &str,
    patch: &ImagePatch,
) -> Result<Option<ImageRecord>> {
    let changed = match (&patch.uri, patch.hits) {
        // Nothing to write; report the stored record as-is.
        (None, None) => return find_by_id(conn, id),
        (Some(uri), Some(hits)) => conn.execute(
            "UPDATE images SET uri = :uri, hits = :hits WHERE id = :id",
            rusqlite::named_params! { ":uri": uri, ":hits": hits, ":id": id },
        ),
        (Some(uri), None) => conn.execute(
            "UPDATE images SET uri = :uri WHERE id = :id",
            rusqlite::named_params! { ":uri": uri, ":id": id },
        ),
        (None, Some(hits)) => conn.execute(
            "UPDATE images SET hits = :hits WHERE id = :id",
            rusqlite::named_params! { ":hits": hits, ":id": id },
        ),
    }
    .map_err(|e| Error::database(e.to_string()))?;

    if changed == 0 {
        return Ok(None);
    }

    find_by_id(conn, id)
}

/// Mark a record as deleted without removing the row.
///
/// The update matches on id alone, so retiring an already-retired record
/// still reports one matched row.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `id` - Storage-assigned record id
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows matched (0 if the id is unknown)
/// * `Err(Error)` - If a database error occurs
pub fn soft_delete(conn: &Connection, id: &str) -> Result<usize> {
    conn.execute(
        "UPDATE images SET is_deleted = 1 WHERE id = :id",
        rusqlite::named_params! { ":id": id },
    )
    .map_err(|e| Error::database(e.to_string()))
}
