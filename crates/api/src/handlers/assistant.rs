//! Handlers for voice transcription and the chat assistant.

use axum::extract::State;
use axum::Json;
use scriptboard_core::chat::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::run_detached;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    /// Base64-encoded recording.
    pub audio: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// POST /api/v1/transcriptions
pub async fn transcribe(
    State(state): State<AppState>,
    Json(input): Json<TranscribeRequest>,
) -> AppResult<Json<DataResponse<TranscriptionResponse>>> {
    let studio = state.studio.clone();
    let text =
        run_detached(async move { studio.transcribe(&input.audio, &input.mime_type).await })
            .await?;
    Ok(Json(DataResponse {
        data: TranscriptionResponse { text },
    }))
}

/// POST /api/v1/chat
///
/// Returns the assistant reply; the full transcript is in the studio snapshot.
pub async fn send_chat(
    State(state): State<AppState>,
    Json(input): Json<ChatRequest>,
) -> AppResult<Json<DataResponse<ChatMessage>>> {
    let studio = state.studio.clone();
    let reply = run_detached(async move { studio.send_chat(input.text).await }).await?;
    Ok(Json(DataResponse { data: reply }))
}
