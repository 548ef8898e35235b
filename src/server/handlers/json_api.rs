//! JSON job handlers for encoding and printing.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::{Value, json};
use uuid::Uuid;

use super::super::state::AppState;
use super::ApiError;
use crate::connection::WriteOutcome;
use crate::json_api::JsonJob;

/// Encode on a blocking thread; raster jobs resize and dither images.
///
/// Request bodies never name server files, so `image` intents are refused.
async fn encode_job(state: &Arc<AppState>, job: JsonJob) -> Result<Vec<u8>, ApiError> {
    let dialect = state.config.dialect;
    tokio::task::spawn_blocking(move || job.encode_inline(dialect))
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?
        .map_err(ApiError::from)
}

/// Handle POST /api/encode - return the command bytes without printing.
pub async fn encode(
    State(state): State<Arc<AppState>>,
    Json(job): Json<JsonJob>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = encode_job(&state, job).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes))
}

/// Handle POST /api/print - encode and write to the printer.
pub async fn print(
    State(state): State<Arc<AppState>>,
    Json(job): Json<JsonJob>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let job_id = Uuid::new_v4().to_string();
    let bytes = encode_job(&state, job).await?;
    let len = bytes.len();

    let writer = Arc::clone(&state);
    let outcome = tokio::task::spawn_blocking(move || writer.printer.write(&bytes))
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?
        .map_err(|e| {
            tracing::warn!(%job_id, error = %e, "print failed");
            ApiError::from(e)
        })?;

    match outcome {
        WriteOutcome::Sent { bytes } => {
            tracing::info!(%job_id, bytes, "printed");
            Ok((
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "job_id": job_id,
                    "bytes": bytes,
                    "outcome": "sent",
                })),
            ))
        }
        WriteOutcome::Dropped => {
            tracing::warn!(%job_id, bytes = len, "printer not connected, job dropped");
            Ok((
                StatusCode::CONFLICT,
                Json(json!({
                    "success": false,
                    "job_id": job_id,
                    "bytes": 0,
                    "outcome": "dropped",
                    "error": "printer is not connected",
                })),
            ))
        }
    }
}
