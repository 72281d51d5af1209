//! Audio pipeline — microphone capture → chunked end-of-speech detection →
//! finalized WAV recording.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → mono f32 (native rate) → resample → i16
//!           → AudioChunk → VoiceRecorder (amplitude endpointing) → WAV file
//! ```
//!
//! The microphone sits behind the [`ChunkSource`] trait so the recorder can
//! be exercised with scripted chunks in tests.

pub mod capture;
pub mod chunk;
pub mod recorder;
pub mod resample;

pub use capture::{CaptureError, ChunkSource, CpalChunkSource};
pub use chunk::AudioChunk;
pub use recorder::{Recording, VoiceRecorder};
pub use resample::{downmix_mono, quantize_i16, resample, samples_to_f32};
