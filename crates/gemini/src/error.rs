//! Provider error taxonomy.
//!
//! Authentication failures get their own variant so callers can react to
//! an expired key without inspecting message text.

use std::time::Duration;

use serde::Deserialize;

/// Message the provider returns when the selected key's project cannot
/// reach the requested model.
pub const ENTITY_NOT_FOUND_MARKER: &str = "Requested entity was not found";

/// Errors from the provider adapter layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider message, or the raw body when it has none.
        message: String,
    },

    /// The API key was rejected or its session expired. The caller must
    /// select a key again before retrying.
    #[error("Authentication expired: {0}")]
    AuthExpired(String),

    /// No API key has been selected.
    #[error("No API key selected")]
    MissingCredentials,

    /// A successful response lacked the expected payload.
    #[error("{0}")]
    MissingData(&'static str),

    /// Structured output could not be decoded.
    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    /// The caller supplied unusable input (bad seed image, empty history).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A long-running operation finished with an error.
    #[error("Video generation failed: {0}")]
    OperationFailed(String),

    /// A long-running operation did not finish within the polling budget.
    #[error("Video generation did not finish within {}s", .0.as_secs())]
    PollTimeout(Duration),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,
}

impl ProviderError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ProviderError::AuthExpired(_))
    }
}

/// Standard Google API error envelope.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Turn a non-2xx response into a [`ProviderError`].
///
/// 401 and 403 are authentication failures. A 404 carrying
/// [`ENTITY_NOT_FOUND_MARKER`] means the selected key cannot see the
/// model, which is also reported as [`ProviderError::AuthExpired`].
pub fn classify_api_error(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    if status == 401 || status == 403 || message.contains(ENTITY_NOT_FOUND_MARKER) {
        return ProviderError::AuthExpired(message);
    }

    ProviderError::Api { status, message }
}
