//! Prompt templates for every provider capability.
//!
//! Kept provider-agnostic: these functions only shape text. The adapter
//! crate decides how the text is placed into a request.

// ---------------------------------------------------------------------------
// Fixed instructions
// ---------------------------------------------------------------------------

/// Visual style shared by storyboard frames and animated clips.
pub const STORYBOARD_STYLE: &str = "Cinematic storyboard illustration, hand-drawn pencil and ink \
     sketch with soft grey wash shading, clear composition, dramatic lighting, 16:9 frame.";

/// Motion guidance appended to every video prompt.
pub const ANIMATION_STYLE: &str = "Animate this storyboard frame with subtle, natural character \
     motion and a slow cinematic camera move. Keep the hand-drawn sketch look consistent \
     throughout the clip.";

/// Instruction sent with recorded audio.
pub const TRANSCRIPTION_INSTRUCTION: &str =
    "Transcribe this audio accurately. Return only the transcribed text, without commentary.";

/// System instruction for the assistant chat.
pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are a creative assistant for screenwriters and \
     storyboard artists. Help the user develop scripts, scenes, dialogue, shot ideas and visual \
     direction. Keep answers concise and practical.";

/// Reply used when the chat model returns no text.
pub const CHAT_FALLBACK_REPLY: &str = "I'm sorry, I couldn't generate a response.";

/// Prebuilt voice used for dialogue narration.
pub const NARRATION_VOICE: &str = "Kore";

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Instruction asking the model to split a script into ordered scenes.
pub fn script_analysis_prompt(script: &str) -> String {
    format!(
        "Analyze the following script and break it down into sequential scenes. \
         For each scene return its order (starting at 1), a detailed visual description \
         of the setting, characters and action suitable for a storyboard illustration, \
         and the dialogue spoken in the scene (use an empty string when there is none).\n\n\
         SCRIPT:\n{script}"
    )
}

/// Storyboard image prompt: fixed style followed by the scene prompt.
pub fn storyboard_image_prompt(prompt: &str) -> String {
    format!("{STORYBOARD_STYLE} {}", prompt.trim())
}

/// Video prompt: fixed style, animation guidance, then the scene prompt.
pub fn scene_video_prompt(prompt: &str) -> String {
    format!("{STORYBOARD_STYLE} {ANIMATION_STYLE} Scene: {}", prompt.trim())
}

/// Narration instruction wrapping the scene dialogue.
pub fn narration_prompt(dialogue: &str) -> String {
    format!(
        "Read the following dialogue aloud with clear, expressive narration: {}",
        dialogue.trim()
    )
}
