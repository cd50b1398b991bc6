//! Project and scene model.
//!
//! A [`Project`] is created in one go from the segments returned by script
//! analysis and is afterwards mutated scene by scene as generation steps
//! complete. Scenes are never removed individually.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{SceneId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Title used when the script has no usable first line.
pub const DEFAULT_PROJECT_TITLE: &str = "Untitled Project";

/// Maximum length of a derived project title, in characters.
pub const MAX_DERIVED_TITLE_CHARS: usize = 80;

/// Maximum accepted script length in bytes.
pub const MAX_SCRIPT_LENGTH: usize = 200_000;

/// Maximum length of a storyboard prompt in characters.
pub const MAX_STORYBOARD_PROMPT_LENGTH: usize = 4_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One segment returned by script analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedScene {
    /// Provider-assigned position. Not guaranteed unique or contiguous.
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dialogue: String,
}

/// A script segment together with its generated media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    pub order: u32,
    pub description: String,
    pub dialogue: String,
    /// Data URI of the storyboard frame.
    pub storyboard_image: Option<String>,
    /// Visual prompt for the storyboard frame; starts as the description.
    pub storyboard_prompt: Option<String>,
    /// Blob URI of the animated clip.
    pub video: Option<String>,
    /// Blob URI of the narrated dialogue.
    pub audio: Option<String>,
    pub is_approved: bool,
}

impl Scene {
    /// Prompt used for storyboard generation.
    pub fn visual_prompt(&self) -> &str {
        self.storyboard_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&self.description)
    }

    pub fn has_storyboard(&self) -> bool {
        self.storyboard_image.is_some()
    }

    /// Final production needs an approved scene with a storyboard frame.
    pub fn is_ready_for_production(&self) -> bool {
        self.is_approved && self.has_storyboard()
    }
}

/// The in-memory project: the script and its ordered scenes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub script: String,
    pub scenes: Vec<Scene>,
    pub created_at: Timestamp,
}

impl Project {
    /// Build a project from analysis output.
    ///
    /// Each segment becomes one unapproved scene. Identifiers are unique
    /// within the batch; orders come from the provider, falling back to the
    /// 1-based position when absent. `title` defaults to
    /// [`derive_title`] of the script.
    pub fn from_analysis(
        title: Option<String>,
        script: String,
        segments: Vec<AnalyzedScene>,
    ) -> Self {
        let batch = uuid::Uuid::new_v4();
        let scenes = segments
            .into_iter()
            .enumerate()
            .map(|(index, segment)| Scene {
                id: SceneId::sequential(&batch, index),
                order: segment.order.unwrap_or(index as u32 + 1),
                storyboard_prompt: Some(segment.description.clone()),
                description: segment.description,
                dialogue: segment.dialogue,
                storyboard_image: None,
                video: None,
                audio: None,
                is_approved: false,
            })
            .collect();

        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| derive_title(&script));

        Self {
            title,
            script,
            scenes,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| &s.id == id)
    }

    pub fn scene_mut(&mut self, id: &SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| &s.id == id)
    }

    /// Look up a scene, failing with [`CoreError::NotFound`].
    pub fn require_scene(&self, id: &SceneId) -> Result<&Scene, CoreError> {
        self.scene(id).ok_or_else(|| scene_not_found(id))
    }

    /// Mutable variant of [`Project::require_scene`].
    pub fn require_scene_mut(&mut self, id: &SceneId) -> Result<&mut Scene, CoreError> {
        self.scene_mut(id).ok_or_else(|| scene_not_found(id))
    }
}

fn scene_not_found(id: &SceneId) -> CoreError {
    CoreError::NotFound {
        entity: "Scene",
        id: id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Title from the first non-empty line of the script.
pub fn derive_title(script: &str) -> String {
    script
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(MAX_DERIVED_TITLE_CHARS).collect())
        .unwrap_or_else(|| DEFAULT_PROJECT_TITLE.to_string())
}

/// A script must contain text and stay within [`MAX_SCRIPT_LENGTH`].
pub fn validate_script(script: &str) -> Result<(), CoreError> {
    if script.trim().is_empty() {
        return Err(CoreError::Validation("Script must not be empty".to_string()));
    }
    if script.len() > MAX_SCRIPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Script exceeds maximum length of {MAX_SCRIPT_LENGTH} bytes (got {})",
            script.len()
        )));
    }
    Ok(())
}

/// Storyboard prompts may be empty (the description is used) but bounded.
pub fn validate_storyboard_prompt(prompt: &str) -> Result<(), CoreError> {
    let len = prompt.chars().count();
    if len > MAX_STORYBOARD_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Storyboard prompt exceeds maximum length of {MAX_STORYBOARD_PROMPT_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}
