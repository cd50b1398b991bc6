//! The provider seam used by the studio controller.
//!
//! [`StoryboardProvider`] lists every generative capability the studio
//! needs. [`GeminiProvider`] implements it over the Gemini REST API; tests
//! substitute their own implementations.

use scriptboard_core::chat::ChatMessage;
use scriptboard_core::media::{ImageSize, MediaBlob};
use scriptboard_core::scene::AnalyzedScene;
use tokio_util::sync::CancellationToken;

use crate::api::GeminiApi;
use crate::config::{GeminiConfig, ProviderContext};
use crate::error::ProviderError;
use crate::poll::wait_for_completion;
use crate::requests;

/// Generative capabilities behind the storyboard workflow.
///
/// Every call receives the resolved credentials explicitly.
#[async_trait::async_trait]
pub trait StoryboardProvider: Send + Sync {
    /// Split a script into ordered scenes.
    async fn analyze_script(
        &self,
        ctx: &ProviderContext,
        script: &str,
    ) -> Result<Vec<AnalyzedScene>, ProviderError>;

    /// Draw one storyboard frame. Returns a data URI.
    async fn generate_storyboard_image(
        &self,
        ctx: &ProviderContext,
        prompt: &str,
        size: ImageSize,
    ) -> Result<String, ProviderError>;

    /// Animate a scene, optionally conditioned on a storyboard data URI.
    async fn generate_scene_video(
        &self,
        ctx: &ProviderContext,
        prompt: &str,
        seed_image: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<MediaBlob, ProviderError>;

    /// Narrate dialogue. Returns a playable WAV blob.
    async fn generate_dialogue_speech(
        &self,
        ctx: &ProviderContext,
        text: &str,
    ) -> Result<MediaBlob, ProviderError>;

    /// Transcribe base64-encoded audio. Empty when nothing was recognised.
    async fn transcribe_audio(
        &self,
        ctx: &ProviderContext,
        base64_audio: &str,
        mime_type: &str,
    ) -> Result<String, ProviderError>;

    /// Answer the latest user message of `history` in a fresh session.
    async fn chat(
        &self,
        ctx: &ProviderContext,
        history: &[ChatMessage],
    ) -> Result<String, ProviderError>;
}

/// [`StoryboardProvider`] backed by the Gemini and Veo REST endpoints.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    api: GeminiApi,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        let api = GeminiApi::with_client(client, config.api_url.clone());
        Self { api, config }
    }
}

#[async_trait::async_trait]
impl StoryboardProvider for GeminiProvider {
    async fn analyze_script(
        &self,
        ctx: &ProviderContext,
        script: &str,
    ) -> Result<Vec<AnalyzedScene>, ProviderError> {
        let request = requests::analysis_request(script);
        let response = self
            .api
            .generate_content(ctx, &self.config.text_model, &request)
            .await?;
        let scenes = requests::parse_analysis(&response)?;

        tracing::info!(count = scenes.len(), "Script analyzed");
        Ok(scenes)
    }

    async fn generate_storyboard_image(
        &self,
        ctx: &ProviderContext,
        prompt: &str,
        size: ImageSize,
    ) -> Result<String, ProviderError> {
        let request = requests::storyboard_image_request(prompt, size);
        let response = self
            .api
            .generate_content(ctx, &self.config.image_model, &request)
            .await?;

        requests::extract_image_data_uri(&response)
    }

    async fn generate_scene_video(
        &self,
        ctx: &ProviderContext,
        prompt: &str,
        seed_image: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<MediaBlob, ProviderError> {
        let request = requests::scene_video_request(prompt, seed_image)?;
        let submitted = self
            .api
            .predict_video(ctx, &self.config.video_model, &request)
            .await?;

        tracing::info!(
            operation = %submitted.name,
            seeded = seed_image.is_some(),
            "Video generation submitted",
        );

        let finished = wait_for_completion(submitted, &self.config.poll, cancel, |name| async move {
            self.api.get_operation(ctx, &name).await
        })
        .await?;

        let uri = finished
            .video_uri()
            .ok_or(ProviderError::MissingData("no video download link"))?;

        self.api.download(ctx, uri).await
    }

    async fn generate_dialogue_speech(
        &self,
        ctx: &ProviderContext,
        text: &str,
    ) -> Result<MediaBlob, ProviderError> {
        let request = requests::speech_request(text);
        let response = self
            .api
            .generate_content(ctx, &self.config.tts_model, &request)
            .await?;

        requests::extract_speech_wav(&response)
    }

    async fn transcribe_audio(
        &self,
        ctx: &ProviderContext,
        base64_audio: &str,
        mime_type: &str,
    ) -> Result<String, ProviderError> {
        let request = requests::transcription_request(base64_audio, mime_type);
        let response = self
            .api
            .generate_content(ctx, &self.config.transcribe_model, &request)
            .await?;

        Ok(requests::extract_transcript(&response))
    }

    async fn chat(
        &self,
        ctx: &ProviderContext,
        history: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        let request = requests::chat_request(history)?;
        let response = self
            .api
            .generate_content(ctx, &self.config.chat_model, &request)
            .await?;

        Ok(requests::extract_chat_reply(&response))
    }
}
