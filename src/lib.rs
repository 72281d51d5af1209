//! robovoice — voice-interaction daemon for a desktop robot companion.
//!
//! Three control loops run concurrently for the lifetime of the process,
//! each owning one hardware resource exclusively:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ voice loop                                                      │
//! │   microphone → VoiceRecorder (amplitude endpointing) → WAV      │
//! │     → Transcriber (hosted STT)                                  │
//! │     → Responder (hosted chat, bounded ConversationHistory)      │
//! │     → SpeechPlayer (hosted TTS → reply file → playback path)    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ camera loop      still image every 5 s                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ eye loop         random pan preset → hold → neutral → pause     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No state crosses loop boundaries, so there is no locking between them;
//! all loops poll a shared [`robot::ShutdownToken`] once per iteration.
//!
//! Playback is direct by default. Setting `speech.filtered_playback` routes
//! decoded replies through the [`dsp`] notch chain in streaming windows for
//! a robotic timbre.

pub mod audio;
pub mod chat;
pub mod config;
pub mod dialogue;
pub mod dsp;
pub mod hardware;
pub mod robot;
pub mod speech;
pub mod transcribe;
