//! Transcription collaborator boundary.
//!
//! The voice loop hands a finalized WAV recording to a hosted
//! speech-to-text service and gets a UTF-8 transcript back. The service
//! sits behind the [`Transcriber`] trait so tests can script transcripts
//! without a network.

pub mod transcriber;

pub use transcriber::{TranscribeError, Transcriber, WhisperApiTranscriber};
