use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::studio;
use crate::state::AppState;

/// Studio-level routes, merged at the `/api/v1` root.
///
/// ```text
/// GET    /studio            snapshot
/// POST   /credentials       select_credentials
/// DELETE /credentials       clear_credentials
/// POST   /actions/cancel    cancel
/// DELETE /error             dismiss_error
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/studio", get(studio::snapshot))
        .route(
            "/credentials",
            post(studio::select_credentials).delete(studio::clear_credentials),
        )
        .route("/actions/cancel", post(studio::cancel))
        .route("/error", delete(studio::dismiss_error))
}
