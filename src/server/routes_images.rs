//! Ingestion and image record API routes.
//!
//! Provides endpoints for triggering an ingestion batch and for reading,
//! patching, and soft-deleting the records it produces.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use snapvault_common::Error;
use snapvault_db::models::ImagePatch;

use super::AppContext;

/// Create image-related routes.
pub fn image_routes() -> Router<AppContext> {
    Router::new()
        .route("/images/ingest", post(ingest))
        .route(
            "/images/:id",
            get(get_record).patch(update_record).delete(delete_record),
        )
}

// ============================================================================
// Request types
// ============================================================================

/// Request body for the ingest endpoint.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// How many images to request upstream. Clamped to the configured
    /// hard limit; must be positive.
    pub limit: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// Run one ingestion batch.
async fn ingest(
    State(ctx): State<AppContext>,
    Json(req): Json<IngestRequest>,
) -> impl IntoResponse {
    match ctx.service.ingest(req.limit).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Fetch a single record by id. Soft-deleted records are served too.
async fn get_record(State(ctx): State<AppContext>, Path(id): Path<String>) -> impl IntoResponse {
    match ctx.service.get_record(&id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Patch the URI and/or hit count of a record.
async fn update_record(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(patch): Json<ImagePatch>,
) -> impl IntoResponse {
    match ctx.service.update_record(&id, &patch) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Soft-delete a record. Reports how many rows matched, 0 included.
async fn delete_record(State(ctx): State<AppContext>, Path(id): Path<String>) -> impl IntoResponse {
    match ctx.service.soft_delete_record(&id) {
        Ok(matched) => (
            StatusCode::OK,
            Json(serde_json::json!({ "matched": matched })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::UpstreamUnavailable(_) | Error::UpstreamFormat(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the standard error envelope for an arbitrary status and message.
pub(crate) fn envelope(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "status": status.as_u16(),
        "error": status.canonical_reason().unwrap_or("Unknown"),
        "message": message,
    });

    (status, Json(body)).into_response()
}

/// Serialize an error into the standard envelope.
fn error_response(err: &Error) -> Response {
    envelope(status_for(err), &err.to_string())
}
