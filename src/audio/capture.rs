//! Microphone capture via `cpal`.
//!
//! [`CpalChunkSource`] owns the microphone for the lifetime of the voice
//! loop and hands out fixed-duration [`AudioChunk`]s on demand. The cpal
//! stream itself is not `Send`, so it lives on a dedicated capture thread;
//! the source only holds the receiving end of the sample channel and is
//! therefore safe to move into a blocking task.
//!
//! The hardware seam is the [`ChunkSource`] trait — tests script a sequence
//! of chunks instead of opening a device.

use std::sync::mpsc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::audio::chunk::AudioChunk;
use crate::audio::resample::{downmix_mono, quantize_i16, resample};
use crate::config::CaptureSettings;

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running audio capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    /// The capture thread stopped delivering samples.
    #[error("audio capture stalled: no samples from the device")]
    Stalled,

    /// A capture cycle finished without accumulating any samples.
    #[error("capture produced no audio")]
    Empty,

    #[error("audio I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write recording: {0}")]
    Wav(#[from] hound::Error),
}

// ---------------------------------------------------------------------------
// ChunkSource
// ---------------------------------------------------------------------------

/// Source of fixed-duration audio chunks.
///
/// Implementors own their hardware resource exclusively; the recorder never
/// shares a source between loops.
pub trait ChunkSource: Send {
    /// Discard any audio buffered since the last chunk was taken, so a new
    /// capture cycle starts from "now" rather than replaying stale samples.
    fn flush(&mut self) {}

    /// Record the next chunk. Blocks for roughly one chunk duration.
    fn record_chunk(&mut self) -> Result<AudioChunk, CaptureError>;
}

// ---------------------------------------------------------------------------
// CpalChunkSource
// ---------------------------------------------------------------------------

/// Microphone-backed [`ChunkSource`].
///
/// Captures at the device's native rate and channel count, then downmixes,
/// resamples and quantizes each chunk to the configured mono i16 format.
pub struct CpalChunkSource {
    data_rx: mpsc::Receiver<Vec<f32>>,
    /// Dropping this ends the capture thread (and with it the cpal stream).
    _stop_tx: mpsc::Sender<()>,
    native_rate: u32,
    native_channels: u16,
    target_rate: u32,
    /// Samples (mono, native rate) needed for one chunk.
    native_chunk_samples: usize,
    /// Mono native-rate samples carried over from the previous chunk.
    pending: Vec<f32>,
    /// How long to wait for the device before declaring the stream stalled.
    recv_timeout: Duration,
}

impl CpalChunkSource {
    /// Open the system default input device and start streaming.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::NoDevice`] when no input device is available,
    /// or the underlying cpal error when the stream cannot be configured.
    pub fn open(settings: &CaptureSettings) -> Result<Self, CaptureError> {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (data_tx, data_rx) = mpsc::channel::<Vec<f32>>();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        // The cpal stream is !Send, so it must be created and kept alive on
        // its own thread. The thread reports the negotiated device format
        // back once, then parks until the source is dropped.
        std::thread::Builder::new()
            .name("mic-capture".into())
            .spawn(move || match build_input_stream(data_tx) {
                Ok((stream, rate, channels)) => {
                    let _ = ready_tx.send(Ok((rate, channels)));
                    let _stream = stream;
                    // Blocks until the paired sender is dropped.
                    let _ = stop_rx.recv();
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })?;

        let (native_rate, native_channels) =
            ready_rx.recv().map_err(|_| CaptureError::Stalled)??;

        log::info!(
            "microphone open: {native_rate} Hz, {native_channels} ch (recording at {} Hz mono)",
            settings.sample_rate
        );

        let native_chunk_samples = (native_rate as f32 * settings.chunk_secs) as usize;
        let recv_timeout =
            Duration::from_secs_f32(settings.chunk_secs * 2.0) + Duration::from_secs(1);

        Ok(Self {
            data_rx,
            _stop_tx: stop_tx,
            native_rate,
            native_channels,
            target_rate: settings.sample_rate,
            native_chunk_samples,
            pending: Vec::new(),
            recv_timeout,
        })
    }
}

impl ChunkSource for CpalChunkSource {
    fn flush(&mut self) {
        self.pending.clear();
        while self.data_rx.try_recv().is_ok() {}
    }

    fn record_chunk(&mut self) -> Result<AudioChunk, CaptureError> {
        while self.pending.len() < self.native_chunk_samples {
            let data = self
                .data_rx
                .recv_timeout(self.recv_timeout)
                .map_err(|_| CaptureError::Stalled)?;
            let mono = downmix_mono(&data, self.native_channels);
            self.pending.extend_from_slice(&mono);
        }

        let block: Vec<f32> = self.pending.drain(..self.native_chunk_samples).collect();
        let resampled = resample(&block, self.native_rate, self.target_rate);

        Ok(AudioChunk {
            samples: quantize_i16(&resampled),
            sample_rate: self.target_rate,
            channels: 1,
        })
    }
}

/// Build and start the input stream on the current thread.
///
/// Returns the live stream plus the negotiated native rate and channel count.
fn build_input_stream(
    data_tx: mpsc::Sender<Vec<f32>>,
) -> Result<(cpal::Stream, u32, u16), CaptureError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

    let supported = device.default_input_config()?;
    let channels = supported.channels();
    let sample_rate = supported.sample_rate().0;
    let config: cpal::StreamConfig = supported.into();

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            // Ignore send errors; the receiver may have been dropped.
            let _ = data_tx.send(data.to_vec());
        },
        |err: cpal::StreamError| {
            log::error!("cpal stream error: {err}");
        },
        None,
    )?;

    stream.play()?;
    Ok((stream, sample_rate, channels))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
