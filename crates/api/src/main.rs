use std::net::SocketAddr;
use std::sync::Arc;

use scriptboard_api::config::ServerConfig;
use scriptboard_api::router::build_app_router;
use scriptboard_api::state::AppState;
use scriptboard_gemini::{GeminiProvider, ProviderContext};
use scriptboard_studio::Studio;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "scriptboard_api=debug,scriptboard_studio=debug,scriptboard_gemini=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Provider ---
    let credentials = ProviderContext::from_env();
    tracing::info!(
        api_url = %config.gemini.api_url,
        text_model = %config.gemini.text_model,
        video_model = %config.gemini.video_model,
        has_credentials = credentials.is_some(),
        "Gemini provider configured",
    );
    let provider = Arc::new(GeminiProvider::new(config.gemini.clone()));

    // --- Studio ---
    let studio = Arc::new(Studio::new(provider).with_credentials(credentials));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        studio: Arc::clone(&studio),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // In-flight video polling stops at its next wait point.
    if studio.cancel_current() {
        tracing::info!("Cancelled running studio action");
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM (on Unix) to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
