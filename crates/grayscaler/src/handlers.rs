//! Request handlers.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use grayscaler_core::{InvalidInput, PipelineError, ProcessedResult, UploadedImage};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

/// Multipart field carrying the source image.
pub const SOURCE_FIELD: &str = "source_image";

/// Multipart field carrying the destination image.
pub const DEST_FIELD: &str = "dest_image";

/// Basic API info.
pub async fn root() -> Json<Value> {
    tracing::info!("Root endpoint called");
    Json(json!({
        "message": "Welcome to the Image Processing API! Use /health or /process."
    }))
}

/// Liveness check.
pub async fn health_check() -> Json<Value> {
    tracing::info!("Health check endpoint called");
    Json(json!({ "status": "API is running" }))
}

/// Convert an uploaded source/dest pair to grayscale.
pub async fn process_images(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ProcessedResult>> {
    let (source, dest) = read_pair(multipart?).await?;
    let result = state.processor.process(source, dest).await?;
    Ok(Json(result))
}

/// Pull the two named uploads out of the form, ignoring other fields.
///
/// A missing field is treated like an upload without a filename.
async fn read_pair(mut multipart: Multipart) -> ApiResult<(UploadedImage, UploadedImage)> {
    let mut source = None;
    let mut dest = None;

    while let Some(field) = multipart.next_field().await? {
        let slot = match field.name() {
            Some(SOURCE_FIELD) => &mut source,
            Some(DEST_FIELD) => &mut dest,
            _ => continue,
        };
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        *slot = Some(UploadedImage {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    match (source, dest) {
        (Some(source), Some(dest)) => Ok((source, dest)),
        (source, dest) => {
            tracing::warn!(
                source_present = source.is_some(),
                dest_present = dest.is_some(),
                "Missing upload field"
            );
            Err(PipelineError::from(InvalidInput::NoFileSelected).into())
        }
    }
}
