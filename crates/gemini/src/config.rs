//! Provider configuration and per-call credentials.

use std::fmt;
use std::time::Duration;

use scriptboard_core::polling::PollPolicy;

use crate::error::ProviderError;

/// Provider settings loaded from environment variables.
///
/// Models can be overridden individually; everything has a default so a
/// local run only needs an API key.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub api_url: String,
    /// Model for script analysis.
    pub text_model: String,
    /// Model for storyboard frames.
    pub image_model: String,
    /// Model for animated clips.
    pub video_model: String,
    /// Model for dialogue narration.
    pub tts_model: String,
    /// Model for audio transcription.
    pub transcribe_model: String,
    /// Model for the assistant chat.
    pub chat_model: String,
    /// Video operation polling bounds.
    pub poll: PollPolicy,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com".to_string(),
            text_model: "gemini-2.5-pro".to_string(),
            image_model: "gemini-3-pro-image-preview".to_string(),
            video_model: "veo-3.1-fast-generate-preview".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            transcribe_model: "gemini-2.5-flash".to_string(),
            chat_model: "gemini-2.5-flash".to_string(),
            poll: PollPolicy::default(),
            request_timeout: Duration::from_secs(300),
        }
    }
}

impl GeminiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                                     |
    /// |----------------------------|---------------------------------------------|
    /// | `GEMINI_API_URL`           | `https://generativelanguage.googleapis.com` |
    /// | `GEMINI_TEXT_MODEL`        | `gemini-2.5-pro`                            |
    /// | `GEMINI_IMAGE_MODEL`       | `gemini-3-pro-image-preview`                |
    /// | `GEMINI_VIDEO_MODEL`       | `veo-3.1-fast-generate-preview`             |
    /// | `GEMINI_TTS_MODEL`         | `gemini-2.5-flash-preview-tts`              |
    /// | `GEMINI_TRANSCRIBE_MODEL`  | `gemini-2.5-flash`                          |
    /// | `GEMINI_CHAT_MODEL`        | `gemini-2.5-flash`                          |
    /// | `VIDEO_POLL_INTERVAL_SECS` | `10`                                        |
    /// | `VIDEO_POLL_MAX_SECS`      | `900`                                       |
    /// | `GEMINI_TIMEOUT_SECS`      | `300`                                       |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let interval_secs: u64 = std::env::var("VIDEO_POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("VIDEO_POLL_INTERVAL_SECS must be a valid u64");

        let max_secs: u64 = std::env::var("VIDEO_POLL_MAX_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("VIDEO_POLL_MAX_SECS must be a valid u64");

        let timeout_secs: u64 = std::env::var("GEMINI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("GEMINI_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url: env_or("GEMINI_API_URL", defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            text_model: env_or("GEMINI_TEXT_MODEL", defaults.text_model),
            image_model: env_or("GEMINI_IMAGE_MODEL", defaults.image_model),
            video_model: env_or("GEMINI_VIDEO_MODEL", defaults.video_model),
            tts_model: env_or("GEMINI_TTS_MODEL", defaults.tts_model),
            transcribe_model: env_or("GEMINI_TRANSCRIBE_MODEL", defaults.transcribe_model),
            chat_model: env_or("GEMINI_CHAT_MODEL", defaults.chat_model),
            poll: PollPolicy {
                interval: Duration::from_secs(interval_secs),
                max_elapsed: Duration::from_secs(max_secs),
            },
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Resolved credentials passed explicitly into every provider call.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderContext {
    api_key: String,
}

impl ProviderContext {
    /// Wrap an API key. Blank keys are rejected.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ProviderError::MissingCredentials);
        }
        Ok(Self { api_key })
    }

    /// Key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env() -> Option<Self> {
        ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find_map(|value| Self::new(value).ok())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderContext")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
