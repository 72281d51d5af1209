//! Speech synthesis and playback.
//!
//! # Pipeline
//!
//! ```text
//! reply text → Synthesizer (hosted API) → MP3 bytes → reply file
//!            → PlaybackPath:
//!                direct   — decode → AudioSink            (default)
//!                filtered — decode → 4 s windows → NotchChain → AudioSink
//! ```
//!
//! Exactly one playback path is active per player; the filtered path exists
//! for the robotic timbre and must be selected explicitly in configuration.

pub mod decode;
pub mod player;
pub mod sink;
pub mod synthesizer;

use thiserror::Error;

pub use decode::decode_mp3_mono;
pub use player::{DirectPlayback, FilteredPlayback, PlaybackPath, SpeechPlayer};
pub use sink::{AudioSink, CpalSink};
pub use synthesizer::{SpeechApiSynthesizer, Synthesizer};

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors across synthesis, decoding and playback.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("synthesis request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("synthesis service error {status}: {body}")]
    Api { status: u16, body: String },

    /// The reply file could not be written.
    #[error("failed to persist synthesized audio: {0}")]
    Io(#[from] std::io::Error),

    /// The encoded stream could not be decoded to PCM.
    #[error("failed to decode synthesized audio: {0}")]
    Decode(String),

    #[error("no output device available on the default audio host")]
    NoOutputDevice,

    /// The output device rejected the stream.
    #[error("audio output error: {0}")]
    Output(String),

    /// Unexpected runtime failure (e.g. a playback task panicked).
    #[error("internal speech error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Request(e.to_string())
        }
    }
}
