//! Fixed-duration blocks of signed 16-bit PCM audio.

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One fixed-duration block of mono PCM samples, immutable once captured.
///
/// Chunks are the unit of end-of-speech detection: the recorder compares the
/// mean absolute amplitude of each new chunk against the running average of
/// everything captured so far.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Signed 16-bit PCM samples.
    pub samples: Vec<i16>,
    /// Sample rate of this chunk in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels (the capture pipeline produces mono).
    pub channels: u16,
}

impl AudioChunk {
    /// Mean absolute amplitude of the chunk, `0.0` for an empty chunk.
    pub fn mean_abs_amplitude(&self) -> f64 {
        mean_abs(&self.samples)
    }

    /// Duration of the chunk in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }
}

/// Mean absolute amplitude of a PCM buffer, `0.0` when empty.
pub fn mean_abs(samples: &[i16]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s).abs()).sum();
    sum / samples.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
