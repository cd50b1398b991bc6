pub mod assistant;
pub mod health;
pub mod media;
pub mod project;
pub mod scene;
pub mod studio;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /studio                               snapshot (GET)
/// /credentials                          select, clear (POST, DELETE)
/// /actions/cancel                       cancel running action (POST)
/// /error                                dismiss error (DELETE)
///
/// /project                              submit script, reset (POST, DELETE)
/// /project/upload                       submit script file (POST, multipart)
/// /project/storyboards                  bulk storyboard generation (POST)
///
/// /scenes/{scene_id}/storyboard         generate storyboard (POST)
/// /scenes/{scene_id}/prompt             edit storyboard prompt (PUT)
/// /scenes/{scene_id}/approval           toggle approval (POST)
/// /scenes/{scene_id}/production         final video + narration (POST)
///
/// /transcriptions                       transcribe recorded audio (POST)
/// /chat                                 assistant chat (POST)
///
/// /media/{blob_id}                      generated media bytes (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Studio state, credentials and action control.
        .merge(studio::router())
        // Script submission and project-wide generation.
        .nest("/project", project::router())
        // Per-scene editing and generation.
        .nest("/scenes", scene::router())
        // Voice input and chat assistant.
        .merge(assistant::router())
        // Generated media.
        .nest("/media", media::router())
}
