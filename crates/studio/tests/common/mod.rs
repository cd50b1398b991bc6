//! Shared fixtures for studio integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use scriptboard_core::chat::ChatMessage;
use scriptboard_core::media::{ImageSize, MediaBlob};
use scriptboard_core::scene::AnalyzedScene;
use scriptboard_gemini::{ProviderContext, ProviderError, StoryboardProvider};
use scriptboard_studio::Studio;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

pub const TEST_KEY: &str = "test-api-key";
pub const FAKE_IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

/// Scripted [`StoryboardProvider`] that counts calls.
#[derive(Default)]
pub struct FakeProvider {
    pub scenes: Vec<AnalyzedScene>,

    pub analyze_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub video_calls: AtomicUsize,
    pub speech_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,

    /// Prompts received by image generation, in call order.
    pub image_prompts: Mutex<Vec<String>>,
    /// Seed images received by video generation.
    pub video_seeds: Mutex<Vec<Option<String>>>,

    /// Fail the n-th (1-based) image call.
    pub fail_image_call: Option<usize>,
    pub video_error: Option<fn() -> ProviderError>,
    pub speech_error: Option<fn() -> ProviderError>,

    /// Park video generation until cancelled.
    pub block_video: AtomicBool,
    /// Park image generation forever.
    pub block_images: AtomicBool,
    pub started: Notify,

    /// Cancel the studio's running action just as a provider call returns
    /// successfully, the way a reset landing between the provider response
    /// and the state update would.
    pub interrupt: Mutex<Option<Weak<Studio>>>,
}

impl FakeProvider {
    pub fn with_scenes(count: usize) -> Self {
        let scenes = (1..=count)
            .map(|n| AnalyzedScene {
                order: Some(n as u32),
                description: format!("Wide shot of scene {n}"),
                dialogue: format!("Line {n}"),
            })
            .collect();
        Self {
            scenes,
            ..Self::default()
        }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn interrupt_on_success(&self, studio: &Arc<Studio>) {
        *self.interrupt.lock().unwrap() = Some(Arc::downgrade(studio));
    }

    fn fire_interrupt(&self) {
        if let Some(studio) = self.interrupt.lock().unwrap().as_ref().and_then(Weak::upgrade) {
            studio.cancel_current();
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
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        self.fire_interrupt();
        Ok(self.scenes.clone())
    }

    async fn generate_storyboard_image(
        &self,
        _ctx: &ProviderContext,
        prompt: &str,
        _size: ImageSize,
    ) -> Result<String, ProviderError> {
        let call = self.image_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.image_prompts.lock().unwrap().push(prompt.to_string());

        if self.block_images.load(Ordering::SeqCst) {
            self.started.notify_one();
            std::future::pending::<()>().await;
        }
        if self.fail_image_call == Some(call) {
            return Err(ProviderError::Api {
                status: 500,
                message: "image backend unavailable".to_string(),
            });
        }
        self.fire_interrupt();
        Ok(FAKE_IMAGE.to_string())
    }

    async fn generate_scene_video(
        &self,
        _ctx: &ProviderContext,
        _prompt: &str,
        seed_image: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<MediaBlob, ProviderError> {
        self.video_calls.fetch_add(1, Ordering::SeqCst);
        self.video_seeds
            .lock()
            .unwrap()
            .push(seed_image.map(str::to_string));

        if self.block_video.load(Ordering::SeqCst) {
            self.started.notify_one();
            cancel.cancelled().await;
            return Err(ProviderError::Cancelled);
        }
        if let Some(make) = self.video_error {
            return Err(make());
        }
        self.fire_interrupt();
        Ok(MediaBlob::new("video/mp4", b"fake-mp4".to_vec()))
    }

    async fn generate_dialogue_speech(
        &self,
        _ctx: &ProviderContext,
        _text: &str,
    ) -> Result<MediaBlob, ProviderError> {
        self.speech_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(make) = self.speech_error {
            return Err(make());
        }
        Ok(MediaBlob::new("audio/wav", b"RIFF-fake".to_vec()))
    }

    async fn transcribe_audio(
        &self,
        _ctx: &ProviderContext,
        _base64_audio: &str,
        _mime_type: &str,
    ) -> Result<String, ProviderError> {
        Ok("Alice enters the room".to_string())
    }

    async fn chat(
        &self,
        _ctx: &ProviderContext,
        history: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        let last = history.last().map(|m| m.text.as_str()).unwrap_or_default();
        Ok(format!("You said: {last}"))
    }
}

/// A studio with a key selected, backed by `provider`.
pub fn studio_with(provider: Arc<FakeProvider>) -> Studio {
    let ctx = ProviderContext::new(TEST_KEY).expect("test key is valid");
    Studio::new(provider).with_credentials(Some(ctx))
}
