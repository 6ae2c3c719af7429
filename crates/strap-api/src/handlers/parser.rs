//! History upload handlers
//!
//! Provides the endpoint that turns a captured strap history stream into
//! heart-rate samples.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;
use strap_core::{IngestError, IngestResult, RecordPayload};

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the history file
pub const UPLOAD_FIELD: &str = "file";

/// POST /parser/parse-history
/// Decode an uploaded history stream
///
/// Staging, decoding and cleanup run on the blocking pool. If the client
/// goes away mid-request the blocking task still finishes and removes its
/// staged file.
pub async fn parse_history(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<RecordPayload>>, ApiError> {
    let started = Instant::now();
    let mut multipart = multipart.map_err(|e| IngestError::Upload(e.body_text()))?;
    let upload = read_upload(&mut multipart).await?;
    let size = upload.len();

    let ingest = state.ingest().clone();
    let records = tokio::task::spawn_blocking(move || ingest.ingest(&upload))
        .await
        .map_err(|e| IngestError::Internal(format!("decode task failed: {}", e)))??;

    tracing::info!(
        size,
        records = records.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "History parsed"
    );

    Ok(Json(records.into_iter().map(RecordPayload::from).collect()))
}

/// Buffer the whole `file` field
async fn read_upload(multipart: &mut Multipart) -> IngestResult<Bytes> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(upload_error)?;
        tracing::debug!(filename = ?filename, size = bytes.len(), "Upload received");
        return Ok(bytes);
    }

    Err(IngestError::Upload(format!(
        "missing multipart field '{}'",
        UPLOAD_FIELD
    )))
}

fn upload_error(err: MultipartError) -> IngestError {
    IngestError::Upload(err.body_text())
}
