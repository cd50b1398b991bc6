//! Request builders and response extractors for each capability.
//!
//! Pure functions, kept apart from the HTTP calls so the payload shapes can
//! be checked without a network.

use scriptboard_core::chat::{last_user_message, ChatMessage};
use scriptboard_core::media::{self, ImageSize, MediaBlob, STORYBOARD_ASPECT_RATIO};
use scriptboard_core::prompts;
use scriptboard_core::scene::AnalyzedScene;
use scriptboard_core::wav;
use serde_json::json;

use crate::error::ProviderError;
use crate::messages::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig, Part,
    PredictVideoRequest, PrebuiltVoiceConfig, SpeechConfig, VideoImage, VideoInstance,
    VideoParameters, VoiceConfig,
};

/// Resolution of generated clips.
pub const VIDEO_RESOLUTION: &str = "720p";

// ---------------------------------------------------------------------------
// Script analysis
// ---------------------------------------------------------------------------

/// JSON schema of the analysis response: an array of scenes.
pub fn scene_list_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "order": { "type": "INTEGER" },
                "description": { "type": "STRING" },
                "dialogue": { "type": "STRING" }
            },
            "required": ["order", "description", "dialogue"]
        }
    })
}

pub fn analysis_request(script: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![Part::text(prompts::script_analysis_prompt(
            script,
        ))])],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(scene_list_schema()),
            ..Default::default()
        }),
    }
}

/// Decode analysis output.
///
/// A response without text is an empty scene list; text that is not a
/// JSON array of scenes is a [`ProviderError::Parse`].
pub fn parse_analysis(response: &GenerateContentResponse) -> Result<Vec<AnalyzedScene>, ProviderError> {
    let Some(text) = response.text().filter(|t| !t.trim().is_empty()) else {
        tracing::warn!("Script analysis returned no text, treating as empty scene list");
        return Ok(Vec::new());
    };
    serde_json::from_str(text.trim()).map_err(|e| ProviderError::Parse(e.to_string()))
}

// ---------------------------------------------------------------------------
// Storyboard images
// ---------------------------------------------------------------------------

pub fn storyboard_image_request(prompt: &str, size: ImageSize) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![Part::text(prompts::storyboard_image_prompt(
            prompt,
        ))])],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_modalities: vec!["IMAGE".to_string()],
            image_config: Some(ImageConfig {
                aspect_ratio: STORYBOARD_ASPECT_RATIO.to_string(),
                image_size: size.as_str().to_string(),
            }),
            ..Default::default()
        }),
    }
}

/// First inline image of the response as a data URI.
pub fn extract_image_data_uri(response: &GenerateContentResponse) -> Result<String, ProviderError> {
    let data = response
        .inline_data()
        .ok_or(ProviderError::MissingData("no image data"))?;
    let mime_type = if data.mime_type.is_empty() {
        "image/png"
    } else {
        data.mime_type.as_str()
    };
    Ok(media::data_uri(mime_type, &data.data))
}

// ---------------------------------------------------------------------------
// Scene videos
// ---------------------------------------------------------------------------

/// Video request; a seed data URI becomes the conditioning image.
pub fn scene_video_request(
    prompt: &str,
    seed_image: Option<&str>,
) -> Result<PredictVideoRequest, ProviderError> {
    let image = seed_image
        .map(|uri| {
            let blob = media::parse_data_uri(uri)
                .map_err(|e| ProviderError::InvalidInput(format!("seed image: {e}")))?;
            Ok::<_, ProviderError>(VideoImage {
                bytes_base64_encoded: blob.to_base64(),
                mime_type: blob.mime_type,
            })
        })
        .transpose()?;

    Ok(PredictVideoRequest {
        instances: vec![VideoInstance {
            prompt: prompts::scene_video_prompt(prompt),
            image,
        }],
        parameters: VideoParameters {
            aspect_ratio: STORYBOARD_ASPECT_RATIO.to_string(),
            resolution: VIDEO_RESOLUTION.to_string(),
            number_of_videos: 1,
        },
    })
}

// ---------------------------------------------------------------------------
// Dialogue speech
// ---------------------------------------------------------------------------

pub fn speech_request(dialogue: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![Part::text(prompts::narration_prompt(dialogue))])],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: prompts::NARRATION_VOICE.to_string(),
                    },
                },
            }),
            ..Default::default()
        }),
    }
}

/// Decode the PCM payload and wrap it in a WAV container.
pub fn extract_speech_wav(response: &GenerateContentResponse) -> Result<MediaBlob, ProviderError> {
    let data = response
        .inline_data()
        .ok_or(ProviderError::MissingData("no audio data"))?;
    let pcm = media::decode_base64(&data.data).map_err(|e| ProviderError::Parse(e.to_string()))?;
    Ok(MediaBlob::new(wav::WAV_MIME_TYPE, wav::encode_pcm16_mono(&pcm)))
}

// ---------------------------------------------------------------------------
// Transcription
// ---------------------------------------------------------------------------

pub fn transcription_request(base64_audio: &str, mime_type: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::inline(mime_type, base64_audio),
            Part::text(prompts::TRANSCRIPTION_INSTRUCTION),
        ])],
        system_instruction: None,
        generation_config: None,
    }
}

/// Transcribed text; missing text is an empty transcript.
pub fn extract_transcript(response: &GenerateContentResponse) -> String {
    response.text().map(|t| t.trim().to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Single-turn chat request carrying only the latest user message.
pub fn chat_request(history: &[ChatMessage]) -> Result<GenerateContentRequest, ProviderError> {
    let latest = last_user_message(history)
        .ok_or_else(|| ProviderError::InvalidInput("chat history has no user message".to_string()))?;

    Ok(GenerateContentRequest {
        contents: vec![Content::user(vec![Part::text(latest.text.clone())])],
        system_instruction: Some(Content::text(prompts::CHAT_SYSTEM_INSTRUCTION)),
        generation_config: None,
    })
}

/// Reply text, or the fixed fallback when the model returned none.
pub fn extract_chat_reply(response: &GenerateContentResponse) -> String {
    response
        .text()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| prompts::CHAT_FALLBACK_REPLY.to_string())
}
