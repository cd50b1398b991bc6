use std::sync::Arc;

use scriptboard_studio::Studio;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything lives behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The studio controller holding the current project.
    pub studio: Arc<Studio>,
}
