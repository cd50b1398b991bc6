//! Minimal WAV container for raw speech PCM (mono, 16-bit, 24 kHz).
//!
//! The speech endpoint returns headerless little-endian PCM. Browsers
//! cannot play that directly, so [`encode_pcm16_mono`] prepends the
//! canonical 44-byte RIFF/WAVE header and copies the samples verbatim.

// ---------------------------------------------------------------------------
// Format constants
// ---------------------------------------------------------------------------

/// Sample rate of the provider's speech output.
pub const SAMPLE_RATE: u32 = 24_000;

/// Speech output is single channel.
pub const CHANNELS: u16 = 1;

/// Bits per PCM sample.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Size of the RIFF + fmt + data chunk headers.
pub const HEADER_LEN: usize = 44;

/// MIME type of the encoded container.
pub const WAV_MIME_TYPE: &str = "audio/wav";

/// `WAVE_FORMAT_PCM`.
const FORMAT_PCM: u16 = 1;

/// Length of the PCM `fmt ` chunk body.
const FMT_CHUNK_LEN: u32 = 16;

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Wrap raw PCM bytes in a WAV header.
///
/// The output is always `HEADER_LEN + pcm.len()` bytes. Integer fields are
/// little-endian; chunk tags are written as plain ASCII. Odd-length input is
/// copied as-is, the header simply declares the byte count it was given.
pub fn encode_pcm16_mono(pcm: &[u8]) -> Vec<u8> {
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
    let byte_rate = SAMPLE_RATE * u32::from(block_align);
    // Chunk sizes are u32 in the format; clamp rather than wrap.
    let data_len = u32::try_from(pcm.len()).unwrap_or(u32::MAX);
    let riff_len = data_len.saturating_add(HEADER_LEN as u32 - 8);

    let mut out = Vec::with_capacity(HEADER_LEN + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_len.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    out.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
