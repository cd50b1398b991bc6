use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use scriptboard_core::error::CoreError;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/media/{blob_id}
///
/// Serves a generated clip or narration with its content type.
pub async fn get_blob(
    State(state): State<AppState>,
    Path(blob_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let blob = state
        .studio
        .blob(&blob_id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Media",
            id: blob_id.to_string(),
        }))?;

    Ok((
        [(header::CONTENT_TYPE, blob.mime_type.clone())],
        blob.bytes.clone(),
    ))
}
