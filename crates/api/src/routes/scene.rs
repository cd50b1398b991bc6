//! Route definitions for per-scene actions.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::scene;
use crate::state::AppState;

/// Routes mounted at `/scenes`.
///
/// ```text
/// POST /{scene_id}/storyboard    generate_storyboard (?size=1K|2K|4K)
/// PUT  /{scene_id}/prompt        update_prompt
/// POST /{scene_id}/approval      toggle_approval
/// POST /{scene_id}/production    produce_final_media
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{scene_id}/storyboard", post(scene::generate_storyboard))
        .route("/{scene_id}/prompt", put(scene::update_prompt))
        .route("/{scene_id}/approval", post(scene::toggle_approval))
        .route("/{scene_id}/production", post(scene::produce_final_media))
}
