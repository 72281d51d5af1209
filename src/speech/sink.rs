//! Audio output via `cpal`.
//!
//! [`CpalSink`] plays PCM buffers through the default output device,
//! blocking until playback finishes. The [`AudioSink`] trait is the seam
//! that lets playback-path tests capture what would have been played
//! without touching real hardware.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio::resample::{resample, samples_to_f32};
use crate::speech::SpeechError;

// ---------------------------------------------------------------------------
// AudioSink
// ---------------------------------------------------------------------------

/// Destination for decoded PCM.
pub trait AudioSink: Send {
    /// Play mono samples at `sample_rate`, blocking until done.
    fn play(&mut self, samples: &[i16], sample_rate: u32) -> Result<(), SpeechError>;
}

// ---------------------------------------------------------------------------
// CpalSink
// ---------------------------------------------------------------------------

/// Plays through the system default output device.
///
/// The device is opened per call: playback happens at most once every few
/// seconds, and re-opening keeps the sink robust against the default device
/// changing between utterances.
#[derive(Debug, Default)]
pub struct CpalSink;

impl CpalSink {
    pub fn new() -> Self {
        Self
    }
}

impl AudioSink for CpalSink {
    fn play(&mut self, samples: &[i16], sample_rate: u32) -> Result<(), SpeechError> {
        if samples.is_empty() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(SpeechError::NoOutputDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| SpeechError::Output(e.to_string()))?;
        let device_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.into();

        // Match the device's native rate so any output config works.
        let playable: Arc<Vec<f32>> =
            Arc::new(resample(&samples_to_f32(samples), sample_rate, device_rate));
        let total = playable.len();

        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let cb_samples = Arc::clone(&playable);
        let cb_position = Arc::clone(&position);
        let cb_finished = Arc::clone(&finished);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let pos = cb_position.load(Ordering::Relaxed);
                        let sample = if pos < cb_samples.len() {
                            cb_position.store(pos + 1, Ordering::Relaxed);
                            cb_samples[pos]
                        } else {
                            cb_finished.store(true, Ordering::Release);
                            0.0
                        };
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }
                },
                |err: cpal::StreamError| {
                    log::error!("audio output error: {err}");
                },
                None,
            )
            .map_err(|e| SpeechError::Output(e.to_string()))?;

        stream
            .play()
            .map_err(|e| SpeechError::Output(e.to_string()))?;

        // Block until the callback has consumed every sample, with a margin
        // on top of the nominal duration in case the device runs slow.
        let nominal = Duration::from_millis(total as u64 * 1000 / u64::from(device_rate.max(1)));
        let deadline = Instant::now() + nominal + Duration::from_millis(500);

        while !finished.load(Ordering::Acquire) {
            if Instant::now() > deadline {
                log::warn!("playback did not signal completion before its deadline");
                break;
            }
            std::thread::sleep(Duration::from_millis(25));
        }

        drop(stream);
        log::debug!("played {total} samples at {device_rate} Hz");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
