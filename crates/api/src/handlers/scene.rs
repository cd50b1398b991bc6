//! Handlers for per-scene editing and generation.

use axum::extract::{Path, Query, State};
use axum::Json;
use scriptboard_core::scene::Scene;
use scriptboard_core::types::SceneId;
use scriptboard_studio::StudioError;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::run_detached;
use crate::handlers::project::SizeParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdatePromptRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ProductionResponse {
    /// False when the scene was not approved or had no storyboard frame.
    pub produced: bool,
    pub scene: Scene,
}

/// POST /api/v1/scenes/{scene_id}/storyboard
pub async fn generate_storyboard(
    State(state): State<AppState>,
    Path(scene_id): Path<String>,
    Query(params): Query<SizeParams>,
) -> AppResult<Json<DataResponse<Scene>>> {
    let studio = state.studio.clone();
    let scene_id = SceneId::from(scene_id);
    let size = params.size.unwrap_or_default();
    let scene =
        run_detached(async move { studio.generate_storyboard(&scene_id, size).await }).await?;
    Ok(Json(DataResponse { data: scene }))
}

/// PUT /api/v1/scenes/{scene_id}/prompt
pub async fn update_prompt(
    State(state): State<AppState>,
    Path(scene_id): Path<String>,
    Json(input): Json<UpdatePromptRequest>,
) -> AppResult<Json<DataResponse<Scene>>> {
    let scene = state
        .studio
        .update_storyboard_prompt(&SceneId::from(scene_id), input.prompt)
        .await?;
    Ok(Json(DataResponse { data: scene }))
}

/// POST /api/v1/scenes/{scene_id}/approval
///
/// Flips the approval flag; calling twice restores the original value.
pub async fn toggle_approval(
    State(state): State<AppState>,
    Path(scene_id): Path<String>,
) -> AppResult<Json<DataResponse<Scene>>> {
    let scene = state
        .studio
        .toggle_approval(&SceneId::from(scene_id))
        .await?;
    Ok(Json(DataResponse { data: scene }))
}

/// POST /api/v1/scenes/{scene_id}/production
///
/// Produce the animated clip and narration of an approved scene. A scene
/// that is not ready is returned unchanged with `produced: false`.
pub async fn produce_final_media(
    State(state): State<AppState>,
    Path(scene_id): Path<String>,
) -> AppResult<Json<DataResponse<ProductionResponse>>> {
    let scene_id = SceneId::from(scene_id);

    let produced = {
        let studio = state.studio.clone();
        let scene_id = scene_id.clone();
        run_detached(async move { studio.produce_final_media(&scene_id).await }).await?
    };

    let response = match produced {
        Some(scene) => ProductionResponse {
            produced: true,
            scene,
        },
        None => {
            let project = state.studio.project().await.ok_or(StudioError::NoProject)?;
            ProductionResponse {
                produced: false,
                scene: project.require_scene(&scene_id)?.clone(),
            }
        }
    };
    Ok(Json(DataResponse { data: response }))
}
