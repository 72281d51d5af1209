//! Speech playback orchestration.
//!
//! [`SpeechPlayer::speak`] is the voice loop's single entry point: it asks
//! the synthesizer for encoded audio, persists the bytes to the well-known
//! reply file, then hands them to the one active [`PlaybackPath`].
//!
//! Two paths exist and exactly one is wired in at construction time:
//!
//! * [`DirectPlayback`] — decode and play as-is. Production default.
//! * [`FilteredPlayback`] — decode, then stream through the notch chain in
//!   fixed windows (read a window, filter it, play it, repeat until the
//!   buffer is exhausted). Selected via `speech.filtered_playback`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::dsp::NotchChain;
use crate::speech::decode::decode_mp3_mono;
use crate::speech::sink::AudioSink;
use crate::speech::{SpeechError, Synthesizer};

// ---------------------------------------------------------------------------
// PlaybackPath
// ---------------------------------------------------------------------------

/// Consumes one synthesized utterance. Blocking; runs on the blocking pool.
pub trait PlaybackPath: Send {
    fn play_encoded(&mut self, encoded: &[u8]) -> Result<(), SpeechError>;
}

// ---------------------------------------------------------------------------
// DirectPlayback
// ---------------------------------------------------------------------------

/// Decode the utterance and play it unmodified.
pub struct DirectPlayback<K: AudioSink> {
    sink: K,
}

impl<K: AudioSink> DirectPlayback<K> {
    pub fn new(sink: K) -> Self {
        Self { sink }
    }

    fn play_pcm(&mut self, samples: &[i16], sample_rate: u32) -> Result<(), SpeechError> {
        self.sink.play(samples, sample_rate)
    }
}

impl<K: AudioSink> PlaybackPath for DirectPlayback<K> {
    fn play_encoded(&mut self, encoded: &[u8]) -> Result<(), SpeechError> {
        let (samples, sample_rate) = decode_mp3_mono(encoded)?;
        self.play_pcm(&samples, sample_rate)
    }
}

// ---------------------------------------------------------------------------
// FilteredPlayback
// ---------------------------------------------------------------------------

/// Decode the utterance and stream it through the notch chain in windows.
pub struct FilteredPlayback<K: AudioSink> {
    sink: K,
    chain: NotchChain,
    window_secs: u32,
}

impl<K: AudioSink> FilteredPlayback<K> {
    pub fn new(sink: K, chain: NotchChain, window_secs: u32) -> Self {
        Self {
            sink,
            chain,
            window_secs: window_secs.max(1),
        }
    }

    fn play_pcm(&mut self, samples: &[i16], sample_rate: u32) -> Result<(), SpeechError> {
        let window = (sample_rate as usize * self.window_secs as usize).max(1);
        for chunk in samples.chunks(window) {
            let filtered = self.chain.apply(chunk, sample_rate);
            self.sink.play(&filtered, sample_rate)?;
        }
        Ok(())
    }
}

impl<K: AudioSink> PlaybackPath for FilteredPlayback<K> {
    fn play_encoded(&mut self, encoded: &[u8]) -> Result<(), SpeechError> {
        let (samples, sample_rate) = decode_mp3_mono(encoded)?;
        self.play_pcm(&samples, sample_rate)
    }
}

// ---------------------------------------------------------------------------
// SpeechPlayer
// ---------------------------------------------------------------------------

/// Synthesize → persist → play, with exactly one playback path.
pub struct SpeechPlayer {
    synthesizer: Arc<dyn Synthesizer>,
    /// Taken out while a playback task runs on the blocking pool, then put
    /// back; `None` only during that window.
    playback: Option<Box<dyn PlaybackPath>>,
    output_path: PathBuf,
}

impl SpeechPlayer {
    pub fn new(
        synthesizer: Arc<dyn Synthesizer>,
        playback: Box<dyn PlaybackPath>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            synthesizer,
            playback: Some(playback),
            output_path: output_path.into(),
        }
    }

    /// Speak `text`: synthesize it, overwrite the reply file with the
    /// encoded bytes, then play through the active path.
    pub async fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        let encoded = self.synthesizer.synthesize(text).await?;

        if let Some(parent) = self.output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.output_path, &encoded).await?;
        log::debug!(
            "persisted {} bytes to {}",
            encoded.len(),
            self.output_path.display()
        );

        let mut playback = self
            .playback
            .take()
            .ok_or_else(|| SpeechError::Internal("playback path missing".into()))?;

        let joined = tokio::task::spawn_blocking(move || {
            let result = playback.play_encoded(&encoded);
            (playback, result)
        })
        .await;

        match joined {
            Ok((playback, result)) => {
                self.playback = Some(playback);
                result
            }
            Err(e) => Err(SpeechError::Internal(e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
