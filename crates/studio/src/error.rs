use scriptboard_core::error::CoreError;
use scriptboard_gemini::ProviderError;

/// Errors surfaced by studio actions.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// A domain-level error from `scriptboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Another generation action is still running.
    #[error("Another action is already in progress")]
    Busy,

    /// The action needs a project but none has been created.
    #[error("No project loaded")]
    NoProject,
}

impl StudioError {
    /// Whether the failure means the selected API key is no longer usable.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, StudioError::Provider(e) if e.is_auth_expired())
    }
}
