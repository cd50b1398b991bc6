//! The studio controller: owns the in-memory project and drives every
//! user action against the provider.
//!
//! State changes only happen at completion points. Provider calls run
//! without holding the state lock, and their results are committed
//! afterwards, so a failure leaves whatever already succeeded in place.
//!
//! Generation actions (script analysis, storyboards, final production)
//! are mutually exclusive: while one runs, [`Studio::is_loading`] is true
//! and starting another fails with [`StudioError::Busy`]. Local edits,
//! chat and transcription are never blocked.

use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use scriptboard_core::chat::ChatMessage;
use scriptboard_core::error::CoreError;
use scriptboard_core::media::{ImageSize, MediaBlob};
use scriptboard_core::scene::{self, Project, Scene};
use scriptboard_core::types::SceneId;
use scriptboard_gemini::{ProviderContext, ProviderError, StoryboardProvider};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::blobs::BlobStore;
use crate::error::StudioError;

/// Everything a client needs to render the studio.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioSnapshot {
    pub project: Option<Project>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub has_credentials: bool,
    pub chat: Vec<ChatMessage>,
}

/// Result of a bulk storyboard run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BulkOutcome {
    /// Scenes that received a new storyboard frame.
    pub generated: usize,
    /// Scenes left alone because they already had one.
    pub skipped: usize,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

#[derive(Default)]
struct StudioState {
    project: Option<Project>,
    error: Option<String>,
    credentials: Option<ProviderContext>,
    chat: Vec<ChatMessage>,
}

/// Application state controller.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct Studio {
    provider: Arc<dyn StoryboardProvider>,
    blobs: BlobStore,
    state: RwLock<StudioState>,
    /// Cancellation handle of the running generation action, if any.
    active: Mutex<Option<CancellationToken>>,
}

/// Marks a generation action as running until dropped.
struct ActionGuard<'a> {
    studio: &'a Studio,
    token: CancellationToken,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        *self.studio.lock_active() = None;
    }
}

impl Studio {
    pub fn new(provider: Arc<dyn StoryboardProvider>) -> Self {
        Self::with_blob_store(provider, BlobStore::default())
    }

    pub fn with_blob_store(provider: Arc<dyn StoryboardProvider>, blobs: BlobStore) -> Self {
        Self {
            provider,
            blobs,
            state: RwLock::new(StudioState::default()),
            active: Mutex::new(None),
        }
    }

    /// Start with credentials already resolved (e.g. from the environment).
    pub fn with_credentials(mut self, credentials: Option<ProviderContext>) -> Self {
        self.state.get_mut().credentials = credentials;
        self
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    /// Whether a generation action is running.
    pub fn is_loading(&self) -> bool {
        self.lock_active().is_some()
    }

    pub async fn has_credentials(&self) -> bool {
        self.state.read().await.credentials.is_some()
    }

    pub async fn project(&self) -> Option<Project> {
        self.state.read().await.project.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn chat_history(&self) -> Vec<ChatMessage> {
        self.state.read().await.chat.clone()
    }

    pub async fn snapshot(&self) -> StudioSnapshot {
        let is_loading = self.is_loading();
        let state = self.state.read().await;
        StudioSnapshot {
            project: state.project.clone(),
            is_loading,
            error: state.error.clone(),
            has_credentials: state.credentials.is_some(),
            chat: state.chat.clone(),
        }
    }

    /// Generated media by blob ID.
    pub async fn blob(&self, id: &Uuid) -> Option<Arc<MediaBlob>> {
        self.blobs.get(id).await
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    // -----------------------------------------------------------------------
    // Credentials
    // -----------------------------------------------------------------------

    /// Store the key chosen through the external key picker.
    pub async fn select_credentials(&self, api_key: String) -> Result<(), StudioError> {
        let ctx = ProviderContext::new(api_key)?;
        let mut state = self.state.write().await;
        state.credentials = Some(ctx);
        state.error = None;
        tracing::info!("API key selected");
        Ok(())
    }

    pub async fn clear_credentials(&self) {
        self.state.write().await.credentials = None;
        tracing::info!("API key cleared");
    }

    // -----------------------------------------------------------------------
    // Project lifecycle
    // -----------------------------------------------------------------------

    /// Analyze a script and replace the current project with the result.
    pub async fn submit_script(
        &self,
        title: Option<String>,
        script: String,
    ) -> Result<Project, StudioError> {
        let result = self.run_submit_script(title, script).await;
        self.settle(result).await
    }

    /// Submit an uploaded plain-text script file.
    pub async fn submit_script_upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Project, StudioError> {
        match parse_script_upload(file_name, bytes) {
            Ok((title, script)) => self.submit_script(title, script).await,
            Err(e) => self.settle(Err(e.into())).await,
        }
    }

    /// Drop the project and all generated media.
    pub async fn reset(&self) {
        self.cancel_current();
        {
            let mut state = self.state.write().await;
            state.project = None;
            state.error = None;
        }
        self.blobs.clear().await;
        tracing::info!("Project reset");
    }

    // -----------------------------------------------------------------------
    // Storyboards
    // -----------------------------------------------------------------------

    /// Generate (or regenerate) the storyboard frame of one scene.
    pub async fn generate_storyboard(
        &self,
        scene_id: &SceneId,
        size: ImageSize,
    ) -> Result<Scene, StudioError> {
        let result = self.run_generate_storyboard(scene_id, size).await;
        self.settle(result).await
    }

    /// Generate frames for every scene that has none, one scene at a time.
    ///
    /// Each frame is committed as soon as it arrives, so progress survives
    /// a later failure or cancellation.
    pub async fn generate_all_storyboards(
        &self,
        size: ImageSize,
    ) -> Result<BulkOutcome, StudioError> {
        let result = self.run_generate_all(size).await;
        self.settle(result).await
    }

    /// Edit the visual prompt of a scene. No provider call.
    pub async fn update_storyboard_prompt(
        &self,
        scene_id: &SceneId,
        prompt: String,
    ) -> Result<Scene, StudioError> {
        let result = match scene::validate_storyboard_prompt(&prompt) {
            Ok(()) => {
                self.with_scene_mut(scene_id, |scene| {
                    scene.storyboard_prompt = Some(prompt);
                    scene.clone()
                })
                .await
            }
            Err(e) => Err(e.into()),
        };
        self.settle(result).await
    }

    /// Flip the approval flag of a scene. No provider call.
    pub async fn toggle_approval(&self, scene_id: &SceneId) -> Result<Scene, StudioError> {
        let result = self
            .with_scene_mut(scene_id, |scene| {
                scene.is_approved = !scene.is_approved;
                scene.clone()
            })
            .await;
        if let Ok(scene) = &result {
            tracing::info!(scene_id = %scene.id, approved = scene.is_approved, "Scene approval toggled");
        }
        self.settle(result).await
    }

    // -----------------------------------------------------------------------
    // Final production
    // -----------------------------------------------------------------------

    /// Produce the animated clip and narrated dialogue of an approved scene.
    ///
    /// Returns `Ok(None)` without calling the provider when the scene is
    /// not approved or has no storyboard frame. Video and speech run
    /// concurrently and are committed together; if either fails neither
    /// is applied. An expired key also clears the stored credentials.
    pub async fn produce_final_media(
        &self,
        scene_id: &SceneId,
    ) -> Result<Option<Scene>, StudioError> {
        let result = self.run_produce_final_media(scene_id).await;
        self.settle(result).await
    }

    // -----------------------------------------------------------------------
    // Assistant
    // -----------------------------------------------------------------------

    /// Transcribe recorded audio (base64) into text.
    pub async fn transcribe(
        &self,
        base64_audio: &str,
        mime_type: &str,
    ) -> Result<String, StudioError> {
        let result = self.run_transcribe(base64_audio, mime_type).await;
        self.settle(result).await
    }

    /// Send a chat message and append the reply to the transcript.
    pub async fn send_chat(&self, text: String) -> Result<ChatMessage, StudioError> {
        let result = self.run_send_chat(text).await;
        self.settle(result).await
    }

    // -----------------------------------------------------------------------
    // Control
    // -----------------------------------------------------------------------

    /// Cancel the running generation action. Returns whether one was running.
    pub fn cancel_current(&self) -> bool {
        match self.lock_active().as_ref() {
            Some(token) => {
                token.cancel();
                tracing::info!("Cancellation requested for running action");
                true
            }
            None => false,
        }
    }

    pub async fn dismiss_error(&self) {
        self.state.write().await.error = None;
    }

    // -----------------------------------------------------------------------
    // Action bodies
    // -----------------------------------------------------------------------

    async fn run_submit_script(
        &self,
        title: Option<String>,
        script: String,
    ) -> Result<Project, StudioError> {
        scene::validate_script(&script)?;
        let guard = self.begin_action("submit_script").await?;
        let ctx = self.credentials().await?;

        let segments =
            until_cancelled(&guard.token, self.provider.analyze_script(&ctx, &script)).await?;
        let project = Project::from_analysis(title, script, segments);

        {
            let mut state = self.state.write().await;
            if guard.token.is_cancelled() {
                return Err(ProviderError::Cancelled.into());
            }
            state.project = Some(project.clone());
        }
        self.blobs.clear().await;

        tracing::info!(
            title = %project.title,
            count = project.scenes.len(),
            "Project created from script",
        );
        Ok(project)
    }

    async fn run_generate_storyboard(
        &self,
        scene_id: &SceneId,
        size: ImageSize,
    ) -> Result<Scene, StudioError> {
        let guard = self.begin_action("generate_storyboard").await?;
        let ctx = self.credentials().await?;

        let prompt = {
            let state = self.state.read().await;
            let project = state.project.as_ref().ok_or(StudioError::NoProject)?;
            project.require_scene(scene_id)?.visual_prompt().to_string()
        };

        let image = until_cancelled(
            &guard.token,
            self.provider.generate_storyboard_image(&ctx, &prompt, size),
        )
        .await?;

        let scene = self.commit_storyboard(&guard.token, scene_id, image).await?;
        tracing::info!(scene_id = %scene_id, size = size.as_str(), "Storyboard generated");
        Ok(scene)
    }

    async fn run_generate_all(&self, size: ImageSize) -> Result<BulkOutcome, StudioError> {
        let guard = self.begin_action("generate_all_storyboards").await?;
        let ctx = self.credentials().await?;

        let scene_ids: Vec<SceneId> = {
            let state = self.state.read().await;
            let project = state.project.as_ref().ok_or(StudioError::NoProject)?;
            project.scenes.iter().map(|s| s.id.clone()).collect()
        };

        let mut outcome = BulkOutcome::default();
        for scene_id in &scene_ids {
            if guard.token.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            let prompt = {
                let state = self.state.read().await;
                let project = state.project.as_ref().ok_or(StudioError::NoProject)?;
                match project.scene(scene_id) {
                    Some(scene) if !scene.has_storyboard() => scene.visual_prompt().to_string(),
                    _ => {
                        outcome.skipped += 1;
                        continue;
                    }
                }
            };

            let generated = until_cancelled(
                &guard.token,
                self.provider.generate_storyboard_image(&ctx, &prompt, size),
            )
            .await;

            match generated {
                Ok(image) => match self.commit_storyboard(&guard.token, scene_id, image).await {
                    Ok(_) => {
                        outcome.generated += 1;
                        tracing::debug!(scene_id = %scene_id, "Bulk storyboard committed");
                    }
                    Err(StudioError::Provider(ProviderError::Cancelled)) => {
                        outcome.cancelled = true;
                        break;
                    }
                    Err(e) => return Err(e),
                },
                Err(ProviderError::Cancelled) => {
                    outcome.cancelled = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            generated = outcome.generated,
            skipped = outcome.skipped,
            cancelled = outcome.cancelled,
            "Bulk storyboard generation finished",
        );
        Ok(outcome)
    }

    async fn run_produce_final_media(
        &self,
        scene_id: &SceneId,
    ) -> Result<Option<Scene>, StudioError> {
        let (prompt, image, dialogue) = {
            let state = self.state.read().await;
            let project = state.project.as_ref().ok_or(StudioError::NoProject)?;
            let scene = project.require_scene(scene_id)?;
            let image = match &scene.storyboard_image {
                Some(image) if scene.is_ready_for_production() => image.clone(),
                _ => {
                    tracing::info!(
                        scene_id = %scene_id,
                        approved = scene.is_approved,
                        has_storyboard = scene.has_storyboard(),
                        "Scene not ready for production, skipping",
                    );
                    return Ok(None);
                }
            };
            (scene.visual_prompt().to_string(), image, scene.dialogue.clone())
        };

        let guard = self.begin_action("produce_final_media").await?;
        let ctx = self.credentials().await?;

        let video = self
            .provider
            .generate_scene_video(&ctx, &prompt, Some(image.as_str()), &guard.token);
        let speech = until_cancelled(&guard.token, async {
            if dialogue.trim().is_empty() {
                return Ok(None);
            }
            self.provider
                .generate_dialogue_speech(&ctx, &dialogue)
                .await
                .map(Some)
        });

        let (video, audio) = match tokio::try_join!(video, speech) {
            Ok(joined) => joined,
            Err(e) => {
                if e.is_auth_expired() {
                    self.state.write().await.credentials = None;
                    tracing::warn!(scene_id = %scene_id, "API key expired, credentials cleared");
                }
                return Err(e.into());
            }
        };

        let video_uri = self.blobs.insert(video).await;
        let audio_uri = match audio {
            Some(audio) => Some(self.blobs.insert(audio).await),
            None => None,
        };

        let committed: Result<_, StudioError> = {
            let mut state = self.state.write().await;
            if guard.token.is_cancelled() {
                Err(ProviderError::Cancelled.into())
            } else {
                match state.project.as_mut() {
                    Some(project) => project
                        .require_scene_mut(scene_id)
                        .map(|scene| {
                            let old_video = scene.video.replace(video_uri.clone());
                            let old_audio =
                                std::mem::replace(&mut scene.audio, audio_uri.clone());
                            (scene.clone(), old_video, old_audio)
                        })
                        .map_err(StudioError::from),
                    None => Err(StudioError::NoProject),
                }
            }
        };

        match committed {
            Ok((scene, old_video, old_audio)) => {
                for uri in old_video.iter().chain(old_audio.iter()) {
                    self.blobs.remove_uri(uri).await;
                }
                tracing::info!(
                    scene_id = %scene_id,
                    has_audio = scene.audio.is_some(),
                    "Final media produced",
                );
                Ok(Some(scene))
            }
            Err(e) => {
                self.blobs.remove_uri(&video_uri).await;
                if let Some(uri) = &audio_uri {
                    self.blobs.remove_uri(uri).await;
                }
                Err(e)
            }
        }
    }

    async fn run_transcribe(
        &self,
        base64_audio: &str,
        mime_type: &str,
    ) -> Result<String, StudioError> {
        if base64_audio.trim().is_empty() {
            return Err(CoreError::Validation("Audio payload must not be empty".to_string()).into());
        }
        let ctx = self.credentials().await?;
        let text = self
            .provider
            .transcribe_audio(&ctx, base64_audio, mime_type)
            .await?;
        tracing::debug!(chars = text.len(), "Audio transcribed");
        Ok(text)
    }

    async fn run_send_chat(&self, text: String) -> Result<ChatMessage, StudioError> {
        if text.trim().is_empty() {
            return Err(CoreError::Validation("Message must not be empty".to_string()).into());
        }
        let ctx = self.credentials().await?;

        let history = {
            let mut state = self.state.write().await;
            state.chat.push(ChatMessage::user(text));
            state.chat.clone()
        };

        let reply = ChatMessage::assistant(self.provider.chat(&ctx, &history).await?);
        self.state.write().await.chat.push(reply.clone());
        Ok(reply)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark a generation action as running and clear the previous error.
    async fn begin_action(&self, action: &'static str) -> Result<ActionGuard<'_>, StudioError> {
        let token = {
            let mut active = self.lock_active();
            if active.is_some() {
                tracing::debug!(action, "Rejected action while another is running");
                return Err(StudioError::Busy);
            }
            let token = CancellationToken::new();
            *active = Some(token.clone());
            token
        };
        let guard = ActionGuard {
            studio: self,
            token,
        };

        self.state.write().await.error = None;
        tracing::debug!(action, "Action started");
        Ok(guard)
    }

    async fn credentials(&self) -> Result<ProviderContext, StudioError> {
        self.state
            .read()
            .await
            .credentials
            .clone()
            .ok_or(StudioError::Provider(ProviderError::MissingCredentials))
    }

    /// Store a generated image unless the action was cancelled meanwhile.
    ///
    /// The token is checked under the write lock so a concurrent reset
    /// cannot interleave between the check and the write.
    async fn commit_storyboard(
        &self,
        token: &CancellationToken,
        scene_id: &SceneId,
        image: String,
    ) -> Result<Scene, StudioError> {
        let mut state = self.state.write().await;
        if token.is_cancelled() {
            return Err(ProviderError::Cancelled.into());
        }
        let project = state.project.as_mut().ok_or(StudioError::NoProject)?;
        let scene = project.require_scene_mut(scene_id)?;
        scene.storyboard_image = Some(image);
        Ok(scene.clone())
    }

    async fn with_scene_mut<T>(
        &self,
        scene_id: &SceneId,
        f: impl FnOnce(&mut Scene) -> T,
    ) -> Result<T, StudioError> {
        let mut state = self.state.write().await;
        let project = state.project.as_mut().ok_or(StudioError::NoProject)?;
        Ok(f(project.require_scene_mut(scene_id)?))
    }

    /// Publish a failure as the global error message.
    ///
    /// Busy rejections and user cancellations are returned but not shown.
    async fn settle<T>(&self, result: Result<T, StudioError>) -> Result<T, StudioError> {
        if let Err(e) = &result {
            match e {
                StudioError::Busy | StudioError::Provider(ProviderError::Cancelled) => {}
                _ => {
                    tracing::warn!(error = %e, "Studio action failed");
                    self.state.write().await.error = Some(e.to_string());
                }
            }
        }
        result
    }
}

/// Race a provider call against cancellation.
async fn until_cancelled<T>(
    token: &CancellationToken,
    fut: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, ProviderError> {
    tokio::select! {
        _ = token.cancelled() => Err(ProviderError::Cancelled),
        result = fut => result,
    }
}

/// Validate an uploaded script file and return `(title, text)`.
///
/// Only plain text is accepted: a `.txt` name (or none) and UTF-8 content.
/// The file stem becomes the project title.
pub fn parse_script_upload(
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<(Option<String>, String), CoreError> {
    let path = Path::new(file_name);
    if let Some(ext) = path.extension() {
        if !ext.eq_ignore_ascii_case("txt") {
            return Err(CoreError::Validation(format!(
                "Unsupported script format '.{}'. Only plain-text (.txt) files are accepted",
                ext.to_string_lossy()
            )));
        }
    }

    let text = String::from_utf8(bytes)
        .map_err(|_| CoreError::Validation("Script file is not valid UTF-8 text".to_string()))?;
    let text = text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text);

    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().trim().to_string())
        .filter(|s| !s.is_empty());

    Ok((title, text))
}
