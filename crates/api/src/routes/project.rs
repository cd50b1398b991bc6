use axum::routing::post;
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/project`.
///
/// ```text
/// POST   /               submit_script
/// DELETE /               reset
/// POST   /upload         upload_script (multipart)
/// POST   /storyboards    generate_all_storyboards
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(project::submit_script).delete(project::reset))
        .route("/upload", post(project::upload_script))
        .route("/storyboards", post(project::generate_all_storyboards))
}
