//! The voice interaction loop.
//!
//! Each round is strictly sequential:
//!
//! ```text
//! capture → transcribe → generate reply (history snapshot) → commit turns → speak
//! ```
//!
//! Failure handling follows three rules:
//!
//! * a capture failure (or no audio) is a no-op round — log, pause briefly
//!   so a dead microphone cannot spin the loop hot, retry;
//! * a collaborator failure abandons the round before anything was
//!   committed — the history never holds a partial exchange;
//! * a playback failure after the turns were committed is only logged; the
//!   exchange happened, the robot just failed to say it out loud.
//!
//! The reply request receives the history as it stood *before* this round;
//! both turns are appended together only once the reply exists.

use std::sync::Arc;
use std::time::Duration;

use crate::audio::VoiceRecorder;
use crate::chat::Responder;
use crate::dialogue::{ConversationHistory, ConversationTurn};
use crate::robot::shutdown::ShutdownToken;
use crate::speech::SpeechPlayer;
use crate::transcribe::Transcriber;

// ---------------------------------------------------------------------------
// VoiceLoop
// ---------------------------------------------------------------------------

/// Owns the microphone, the conversation memory and the speaker output for
/// the lifetime of the process. Nothing is shared with the other loops.
pub struct VoiceLoop {
    /// Taken out while a capture runs on the blocking pool, then put back.
    recorder: Option<VoiceRecorder>,
    transcriber: Arc<dyn Transcriber>,
    responder: Arc<dyn Responder>,
    player: SpeechPlayer,
    history: ConversationHistory,
    /// Pause after a no-input round before the next capture attempt.
    retry_pause: Duration,
}

impl VoiceLoop {
    pub fn new(
        recorder: VoiceRecorder,
        transcriber: Arc<dyn Transcriber>,
        responder: Arc<dyn Responder>,
        player: SpeechPlayer,
        history: ConversationHistory,
    ) -> Self {
        Self {
            recorder: Some(recorder),
            transcriber,
            responder,
            player,
            history,
            retry_pause: Duration::from_secs(1),
        }
    }

    /// Override the no-input pause (tests use a near-zero pause).
    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }

    /// Run rounds until the token flips.
    pub async fn run(mut self, token: ShutdownToken) {
        log::info!("voice loop started");
        while !token.is_shutdown() {
            self.run_round().await;
        }
        log::info!("voice loop stopped");
    }

    /// One complete interaction round.
    async fn run_round(&mut self) {
        // ── 1. Capture (blocking → thread pool) ──────────────────────────
        let Some(mut recorder) = self.recorder.take() else {
            log::error!("recorder unavailable; voice loop idle");
            tokio::time::sleep(self.retry_pause).await;
            return;
        };

        let (recorder, captured) = match tokio::task::spawn_blocking(move || {
            let result = recorder.capture_to_wav();
            (recorder, result)
        })
        .await
        {
            Ok(pair) => pair,
            Err(e) => {
                log::error!("capture task failed: {e}");
                tokio::time::sleep(self.retry_pause).await;
                return;
            }
        };
        self.recorder = Some(recorder);

        let recording_path = match captured {
            Ok(path) => path,
            Err(e) => {
                log::warn!("no audio input ({e})");
                tokio::time::sleep(self.retry_pause).await;
                return;
            }
        };

        // ── 2. Transcribe ────────────────────────────────────────────────
        let transcript = match self.transcriber.transcribe(&recording_path).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("transcription failed, abandoning round: {e}");
                return;
            }
        };

        if transcript.is_empty() {
            log::debug!("empty transcript, skipping round");
            return;
        }
        log::info!("heard: {transcript}");

        // ── 3. Generate the reply from the pre-round history ─────────────
        let snapshot = self.history.snapshot();
        let reply = match self.responder.respond(&transcript, &snapshot).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("reply generation failed, abandoning round: {e}");
                return;
            }
        };
        log::info!("replying: {reply}");

        // ── 4. Commit the exchange ───────────────────────────────────────
        self.history.push(ConversationTurn::user(transcript));
        self.history.push(ConversationTurn::assistant(reply.clone()));

        // ── 5. Speak ─────────────────────────────────────────────────────
        if let Err(e) = self.player.speak(&reply).await {
            log::warn!("speech playback failed: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
