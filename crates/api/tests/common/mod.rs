use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use scriptboard_api::config::ServerConfig;
use scriptboard_api::router::build_app_router;
use scriptboard_api::state::AppState;
use scriptboard_core::chat::ChatMessage;
use scriptboard_core::media::{ImageSize, MediaBlob};
use scriptboard_core::scene::AnalyzedScene;
use scriptboard_gemini::{GeminiConfig, ProviderContext, ProviderError, StoryboardProvider};
use scriptboard_studio::Studio;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

pub const FAKE_IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 1024 * 1024,
        gemini: GeminiConfig::default(),
    }
}

/// Provider returning canned results for every capability.
pub struct FakeProvider {
    pub scene_count: usize,
    /// Simulated time spent generating a clip.
    pub video_delay: Duration,
    pub video_error: Option<fn() -> ProviderError>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            scene_count: 2,
            video_delay: Duration::ZERO,
            video_error: None,
        }
    }
}

#[async_trait::async_trait]
impl StoryboardProvider for FakeProvider {
    async fn analyze_script(
        &self,
        _ctx: &ProviderContext,
        _script: &str,
    ) -> Result<Vec<AnalyzedScene>, ProviderError> {
        Ok((1..=self.scene_count)
            .map(|n| AnalyzedScene {
                order: Some(n as u32),
                description: format!("Alice waves, shot {n}"),
                dialogue: "Hello!".to_string(),
            })
            .collect())
    }

    async fn generate_storyboard_image(
        &self,
        _ctx: &ProviderContext,
        _prompt: &str,
        _size: ImageSize,
    ) -> Result<String, ProviderError> {
        Ok(FAKE_IMAGE.to_string())
    }

    async fn generate_scene_video(
        &self,
        _ctx: &ProviderContext,
        _prompt: &str,
        _seed_image: Option<&str>,
        _cancel: &CancellationToken,
    ) -> Result<MediaBlob, ProviderError> {
        if !self.video_delay.is_zero() {
            tokio::time::sleep(self.video_delay).await;
        }
        if let Some(make) = self.video_error {
            return Err(make());
        }
        Ok(MediaBlob::new("video/mp4", b"fake-mp4".to_vec()))
    }

    async fn generate_dialogue_speech(
        &self,
        _ctx: &ProviderContext,
        _text: &str,
    ) -> Result<MediaBlob, ProviderError> {
        Ok(MediaBlob::new("audio/wav", b"RIFF-fake".to_vec()))
    }

    async fn transcribe_audio(
        &self,
        _ctx: &ProviderContext,
        _base64_audio: &str,
        _mime_type: &str,
    ) -> Result<String, ProviderError> {
        Ok("Alice enters".to_string())
    }

    async fn chat(
        &self,
        _ctx: &ProviderContext,
        _history: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        Ok("Try a wider shot.".to_string())
    }
}

/// Build the full application router around `provider`, with a key selected.
pub fn build_test_app(provider: FakeProvider) -> Router {
    build_test_app_with_config(provider, test_config())
}

/// Like [`build_test_app`] with a custom server configuration.
pub fn build_test_app_with_config(provider: FakeProvider, config: ServerConfig) -> Router {
    let ctx = ProviderContext::new("test-api-key").expect("valid test key");
    let studio = Studio::new(Arc::new(provider)).with_credentials(Some(ctx));
    build_router(Arc::new(studio), config)
}

/// Build the router around an existing studio (for tests that need to
/// inspect state between requests).
pub fn build_test_app_with(studio: Arc<Studio>) -> Router {
    build_router(studio, test_config())
}

fn build_router(studio: Arc<Studio>, config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        studio,
    };
    build_app_router(state, &config)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(json.to_string())).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Body::from(json.to_string())).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}
