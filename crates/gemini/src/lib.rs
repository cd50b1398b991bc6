//! Gemini adapter for the storyboard workflow.
//!
//! Shapes prompts into REST payloads for each capability (script analysis,
//! storyboard images, scene videos, narration, transcription and chat),
//! calls the API with [`reqwest`], and extracts typed results.

pub mod api;
pub mod config;
pub mod error;
pub mod messages;
pub mod poll;
pub mod provider;
pub mod requests;

pub use config::{GeminiConfig, ProviderContext};
pub use error::ProviderError;
pub use provider::{GeminiProvider, StoryboardProvider};
