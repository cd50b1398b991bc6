use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scriptboard_core::error::CoreError;
use scriptboard_gemini::ProviderError;
use scriptboard_studio::StudioError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`StudioError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `scriptboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A studio action failed.
    #[error(transparent)]
    Studio(#[from] StudioError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Studio(studio) => match studio {
                StudioError::Core(core) => classify_core_error(core),
                StudioError::Provider(provider) => classify_provider_error(provider),
                StudioError::Busy => (StatusCode::CONFLICT, "BUSY", studio.to_string()),
                StudioError::NoProject => {
                    (StatusCode::NOT_FOUND, "NO_PROJECT", studio.to_string())
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
    }
}

/// Classify a provider failure into an HTTP status, error code, and message.
///
/// - Rejected or missing keys map to 401 so the client re-opens key selection.
/// - Polling that ran out of budget maps to 504.
/// - Everything else the provider did wrong maps to 502.
fn classify_provider_error(err: &ProviderError) -> (StatusCode, &'static str, String) {
    let message = err.to_string();
    match err {
        ProviderError::AuthExpired(_) => (StatusCode::UNAUTHORIZED, "AUTH_EXPIRED", message),
        ProviderError::MissingCredentials => {
            (StatusCode::UNAUTHORIZED, "MISSING_CREDENTIALS", message)
        }
        ProviderError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message),
        ProviderError::PollTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", message),
        ProviderError::Cancelled => (StatusCode::CONFLICT, "CANCELLED", message),
        ProviderError::Request(_)
        | ProviderError::Api { .. }
        | ProviderError::MissingData(_)
        | ProviderError::Parse(_)
        | ProviderError::OperationFailed(_) => {
            tracing::warn!(error = %err, "Provider error");
            (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn busy_is_conflict() {
        assert_eq!(status_of(StudioError::Busy.into()), StatusCode::CONFLICT);
    }

    #[test]
    fn auth_failures_are_unauthorized() {
        let expired = StudioError::Provider(ProviderError::AuthExpired("gone".into()));
        let missing = StudioError::Provider(ProviderError::MissingCredentials);
        assert_eq!(status_of(expired.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(missing.into()), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn provider_failures_are_bad_gateway() {
        let err = StudioError::Provider(ProviderError::MissingData("no image data"));
        assert_eq!(status_of(err.into()), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn poll_timeout_is_gateway_timeout() {
        let err = StudioError::Provider(ProviderError::PollTimeout(
            std::time::Duration::from_secs(900),
        ));
        assert_eq!(status_of(err.into()), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn wrapped_core_errors_keep_their_status() {
        let err = StudioError::Core(CoreError::Validation("empty".into()));
        assert_eq!(status_of(err.into()), StatusCode::BAD_REQUEST);
        let err = StudioError::Core(CoreError::NotFound {
            entity: "Scene",
            id: "scene-1".into(),
        });
        assert_eq!(status_of(err.into()), StatusCode::NOT_FOUND);
    }
}
