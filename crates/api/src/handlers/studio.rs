//! Handlers for studio state, credentials and action control.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use scriptboard_studio::StudioSnapshot;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCredentialsRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    /// Whether an action was running when the request arrived.
    pub cancelled: bool,
}

/// GET /api/v1/studio
///
/// Full studio state: project, loading flag, error, credential presence
/// and the chat transcript.
pub async fn snapshot(State(state): State<AppState>) -> Json<DataResponse<StudioSnapshot>> {
    Json(DataResponse {
        data: state.studio.snapshot().await,
    })
}

/// POST /api/v1/credentials
pub async fn select_credentials(
    State(state): State<AppState>,
    Json(input): Json<SelectCredentialsRequest>,
) -> AppResult<StatusCode> {
    state.studio.select_credentials(input.api_key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/credentials
pub async fn clear_credentials(State(state): State<AppState>) -> StatusCode {
    state.studio.clear_credentials().await;
    StatusCode::NO_CONTENT
}

/// POST /api/v1/actions/cancel
pub async fn cancel(State(state): State<AppState>) -> Json<DataResponse<CancelResponse>> {
    let cancelled = state.studio.cancel_current();
    Json(DataResponse {
        data: CancelResponse { cancelled },
    })
}

/// DELETE /api/v1/error
pub async fn dismiss_error(State(state): State<AppState>) -> StatusCode {
    state.studio.dismiss_error().await;
    StatusCode::NO_CONTENT
}
