use axum::routing::post;
use axum::Router;

use crate::handlers::assistant;
use crate::state::AppState;

/// Voice input and chat routes, merged at the `/api/v1` root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transcriptions", post(assistant::transcribe))
        .route("/chat", post(assistant::send_chat))
}
