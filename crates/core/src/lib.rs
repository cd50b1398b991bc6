//! Scriptboard domain core.
//!
//! Provider-agnostic building blocks: the project/scene model, chat
//! transcript entries, media payloads, prompt templates, the WAV container
//! encoder and the polling policy. Nothing in here performs I/O.

pub mod chat;
pub mod error;
pub mod media;
pub mod polling;
pub mod prompts;
pub mod scene;
pub mod types;
pub mod wav;
