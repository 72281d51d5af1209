//! Voice-activity capture with amplitude endpointing.
//!
//! [`VoiceRecorder`] records audio one chunk at a time and decides when the
//! speaker has stopped by comparing amplitudes:
//!
//! * The first chunk is always kept — there is nothing to compare it against,
//!   so an entirely silent room still records to the maximum length.
//! * Each later chunk is compared against the mean absolute amplitude of
//!   everything accumulated so far. A chunk quieter than that average divided
//!   by the configured divisor (default 3) marks the trailing edge of speech:
//!   the quiet chunk is discarded and the cycle ends.
//! * The cycle always ends once the maximum chunk count is reached.
//!
//! Detection granularity is one chunk — a loud-to-quiet transition inside a
//! single chunk is not seen until the next chunk boundary.
//!
//! The finalized recording is written to a single well-known WAV path that
//! is overwritten on every cycle.

use std::path::{Path, PathBuf};

use crate::audio::capture::{CaptureError, ChunkSource};
use crate::audio::chunk::mean_abs;
use crate::config::CaptureSettings;

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// A finalized capture cycle: 1–`max_chunks` chunks of contiguous mono PCM.
#[derive(Debug, Clone)]
pub struct Recording {
    /// Contiguous mono samples, in capture order.
    pub samples: Vec<i16>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Recording {
    /// Duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// VoiceRecorder
// ---------------------------------------------------------------------------

/// Records one utterance per [`capture`](Self::capture) call.
///
/// Owns its [`ChunkSource`] exclusively; nothing else touches the microphone
/// while the voice loop is alive.
pub struct VoiceRecorder {
    source: Box<dyn ChunkSource>,
    settings: CaptureSettings,
    output_path: PathBuf,
}

impl VoiceRecorder {
    /// Create a recorder that finalizes each cycle to `output_path`.
    pub fn new(
        source: Box<dyn ChunkSource>,
        settings: CaptureSettings,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            settings,
            output_path: output_path.into(),
        }
    }

    /// Path of the finalized recording file.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Run one capture cycle and return the finalized recording.
    ///
    /// # Errors
    ///
    /// Propagates source failures, and returns [`CaptureError::Empty`] when
    /// the cycle accumulated no samples at all.
    pub fn capture(&mut self) -> Result<Recording, CaptureError> {
        self.source.flush();

        let mut samples: Vec<i16> =
            Vec::with_capacity(self.settings.max_chunks * self.settings.chunk_samples());

        for taken in 0..self.settings.max_chunks {
            let chunk = self.source.record_chunk()?;

            if !samples.is_empty() {
                let prev_avg = mean_abs(&samples);
                let cur_avg = chunk.mean_abs_amplitude();
                log::debug!(
                    "chunk {}: amplitude {cur_avg:.1} vs accumulated {prev_avg:.1}",
                    taken + 1
                );

                if cur_avg < prev_avg / self.settings.silence_divisor {
                    log::debug!("end of speech after {} chunks", taken + 1);
                    break;
                }
            }

            samples.extend_from_slice(&chunk.samples);
        }

        if samples.is_empty() {
            return Err(CaptureError::Empty);
        }

        Ok(Recording {
            samples,
            sample_rate: self.settings.sample_rate,
        })
    }

    /// Run one capture cycle and overwrite the well-known WAV file with the
    /// result, returning the path on success.
    pub fn capture_to_wav(&mut self) -> Result<PathBuf, CaptureError> {
        let recording = self.capture()?;
        write_mono_wav(&self.output_path, &recording.samples, recording.sample_rate)?;
        log::info!(
            "recorded {:.1} s to {}",
            recording.duration_secs(),
            self.output_path.display()
        );
        Ok(self.output_path.clone())
    }
}

/// Write mono 16-bit PCM to `path` as a WAV file, creating parent
/// directories as needed.
pub fn write_mono_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<(), CaptureError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
