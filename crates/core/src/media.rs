//! Media payload types: resolution tiers, binary blobs and data URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Storyboard frames are always widescreen.
pub const STORYBOARD_ASPECT_RATIO: &str = "16:9";

/// Fallback MIME type when a data URI omits one.
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

// ---------------------------------------------------------------------------
// Resolution tiers
// ---------------------------------------------------------------------------

/// Resolution tier requested for a storyboard image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    /// All tiers, smallest first.
    pub const ALL: [ImageSize; 3] = [ImageSize::OneK, ImageSize::TwoK, ImageSize::FourK];

    /// Wire value understood by the image endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }

    /// Parse a tier label (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid image size '{value}'. Must be one of: 1K, 2K, 4K"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Blobs
// ---------------------------------------------------------------------------

/// A binary media payload with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MediaBlob {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Standard base64 encoding of the payload.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

// ---------------------------------------------------------------------------
// Data URIs
// ---------------------------------------------------------------------------

/// Build a `data:<mime>;base64,<payload>` URI from an already-encoded payload.
pub fn data_uri(mime_type: &str, base64_data: &str) -> String {
    format!("data:{mime_type};base64,{base64_data}")
}

/// Decode a base64 data URI into its MIME type and bytes.
///
/// Only base64 data URIs are accepted; percent-encoded ones are rejected.
pub fn parse_data_uri(uri: &str) -> Result<MediaBlob, CoreError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::Validation("Not a data URI".to_string()))?;

    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::Validation("Data URI has no payload".to_string()))?;

    let mime_type = meta.strip_suffix(";base64").ok_or_else(|| {
        CoreError::Validation("Only base64 data URIs are supported".to_string())
    })?;
    let mime_type = if mime_type.is_empty() {
        DEFAULT_MIME_TYPE
    } else {
        mime_type
    };

    let bytes = decode_base64(payload)?;
    Ok(MediaBlob::new(mime_type, bytes))
}

/// Decode a standard base64 payload.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, CoreError> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| CoreError::Validation(format!("Invalid base64 payload: {e}")))
}
