//! Bounded, cancellable polling of long-running operations.
//!
//! After a video job is submitted, call [`wait_for_completion`] to keep
//! checking its status every [`PollPolicy::interval`] until it reports
//! done, the [`PollPolicy::max_elapsed`] budget runs out, or the
//! [`CancellationToken`] is triggered.

use std::future::Future;

use scriptboard_core::polling::PollPolicy;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{ProviderError, ENTITY_NOT_FOUND_MARKER};
use crate::messages::Operation;

/// Poll `fetch` until the operation is done.
///
/// `initial` is the handle returned by the submit call; if it is already
/// done no status request is made. Errors from `fetch` abort the loop
/// unchanged. A finished operation that carries an error is turned into
/// [`ProviderError::OperationFailed`], or [`ProviderError::AuthExpired`]
/// when the error says the key can no longer see the model.
pub async fn wait_for_completion<F, Fut>(
    initial: Operation,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut fetch: F,
) -> Result<Operation, ProviderError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Operation, ProviderError>>,
{
    let started = Instant::now();
    let mut operation = initial;
    let mut attempt = 0u32;

    while !operation.done {
        if !policy.allows_another_wait(started.elapsed()) {
            tracing::warn!(
                operation = %operation.name,
                attempt,
                "Operation polling budget exhausted",
            );
            return Err(ProviderError::PollTimeout(policy.max_elapsed));
        }

        // Wait before the next check, respecting cancellation.
        tokio::select! {
            _ = cancel.cancelled() => return Err(cancelled(&operation)),
            _ = tokio::time::sleep(policy.interval) => {}
        }

        attempt += 1;
        tracing::debug!(operation = %operation.name, attempt, "Checking operation status");

        let name = operation.name.clone();
        operation = tokio::select! {
            _ = cancel.cancelled() => return Err(cancelled(&operation)),
            result = fetch(name) => result?,
        };
    }

    if let Some(error) = operation.error.take() {
        if error.message.contains(ENTITY_NOT_FOUND_MARKER) {
            return Err(ProviderError::AuthExpired(error.message));
        }
        return Err(ProviderError::OperationFailed(if error.message.is_empty() {
            format!("operation failed with code {}", error.code)
        } else {
            error.message
        }));
    }

    tracing::info!(operation = %operation.name, attempt, "Operation completed");
    Ok(operation)
}

fn cancelled(operation: &Operation) -> ProviderError {
    tracing::info!(operation = %operation.name, "Operation polling cancelled");
    ProviderError::Cancelled
}
