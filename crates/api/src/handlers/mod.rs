pub mod assistant;
pub mod media;
pub mod project;
pub mod scene;
pub mod studio;

use std::future::Future;

use scriptboard_studio::StudioError;

use crate::error::{AppError, AppResult};

/// Run a studio action on its own task and wait for it.
///
/// The action keeps running to completion (and records its outcome in the
/// studio state) even if the request is dropped by the timeout layer or a
/// disconnecting client.
pub(crate) async fn run_detached<T, F>(action: F) -> AppResult<T>
where
    F: Future<Output = Result<T, StudioError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(action).await {
        Ok(result) => result.map_err(AppError::from),
        Err(e) => {
            tracing::error!(error = %e, "Studio action task failed");
            Err(AppError::InternalError("Studio action task failed".into()))
        }
    }
}
