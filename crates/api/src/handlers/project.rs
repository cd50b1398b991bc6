//! Handlers for script submission and project-wide actions.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use scriptboard_core::media::ImageSize;
use scriptboard_core::scene::Project;
use scriptboard_studio::BulkOutcome;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::run_detached;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitScriptRequest {
    /// Optional project title; derived from the script when absent.
    pub title: Option<String>,
    pub script: String,
}

/// Optional resolution tier for storyboard generation.
#[derive(Debug, Default, Deserialize)]
pub struct SizeParams {
    pub size: Option<ImageSize>,
}

/// POST /api/v1/project
///
/// Analyze a script and replace the current project.
pub async fn submit_script(
    State(state): State<AppState>,
    Json(input): Json<SubmitScriptRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let studio = state.studio.clone();
    let project =
        run_detached(async move { studio.submit_script(input.title, input.script).await }).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// POST /api/v1/project/upload
///
/// Multipart upload of a plain-text script in the `file` field. The file
/// name (without extension) becomes the project title.
pub async fn upload_script(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("script.txt").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some((filename, data.to_vec()));
        }
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    tracing::debug!(filename = %filename, bytes = data.len(), "Script upload received");

    let studio = state.studio.clone();
    let project =
        run_detached(async move { studio.submit_script_upload(&filename, data).await }).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// DELETE /api/v1/project
pub async fn reset(State(state): State<AppState>) -> StatusCode {
    state.studio.reset().await;
    StatusCode::NO_CONTENT
}

/// POST /api/v1/project/storyboards
///
/// Generate storyboard frames for every scene that lacks one.
pub async fn generate_all_storyboards(
    State(state): State<AppState>,
    Query(params): Query<SizeParams>,
) -> AppResult<Json<DataResponse<BulkOutcome>>> {
    let studio = state.studio.clone();
    let size = params.size.unwrap_or_default();
    let outcome = run_detached(async move { studio.generate_all_storyboards(size).await }).await?;
    Ok(Json(DataResponse { data: outcome }))
}
