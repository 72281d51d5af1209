//! Sample-rate conversion and PCM format utilities.
//!
//! Capture devices rarely run natively at the recording rate this pipeline
//! uses (11 025 Hz), so every captured buffer goes through:
//!
//! 1. [`downmix_mono`] — average interleaved channels down to one.
//! 2. [`resample`] — linear-interpolation rate conversion.
//! 3. [`quantize_i16`] — clamp and scale `f32` samples to signed 16-bit PCM.
//!
//! Playback runs the same steps in reverse via [`samples_to_f32`].

// ---------------------------------------------------------------------------
// downmix_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging channels.
///
/// The output length is `samples.len() / channels`. Mono input is returned
/// as an owned copy; zero channels yields an empty vector.
pub fn downmix_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` Hz to `target_rate` Hz using
/// linear interpolation.
///
/// Equal rates return the input unchanged (as an owned copy); empty input
/// yields an empty vector. The output length is approximately
/// `samples.len() * target_rate / source_rate`.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate {
        return samples.to_vec();
    }

    if samples.is_empty() || source_rate == 0 || target_rate == 0 {
        return Vec::new();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = src_pos - idx as f64;

        let sample = if idx + 1 < samples.len() {
            samples[idx] * (1.0 - frac as f32) + samples[idx + 1] * frac as f32
        } else if idx < samples.len() {
            samples[idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

// ---------------------------------------------------------------------------
// PCM format conversion
// ---------------------------------------------------------------------------

/// Convert normalized `f32` samples in `[-1.0, 1.0]` to signed 16-bit PCM,
/// clamping out-of-range values.
pub fn quantize_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16)
        .collect()
}

/// Convert signed 16-bit PCM to normalized `f32` samples in `[-1.0, 1.0]`.
pub fn samples_to_f32(samples: &[i16]) -> Vec<f32> {
    samples
        .iter()
        .map(|&s| f32::from(s) / -f32::from(i16::MIN))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- downmix_mono ------------------------------------------------------

    #[test]
    fn downmix_already_mono() {
        let input = vec![0.1_f32, 0.2, 0.3];
        assert_eq!(downmix_mono(&input, 1), input);
    }

    #[test]
    fn downmix_two_channel() {
        let input = vec![1.0_f32, -1.0, 0.5, 0.5];
        let out = downmix_mono(&input, 2);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn downmix_zero_channels() {
        assert!(downmix_mono(&[1.0_f32, 2.0], 0).is_empty());
    }

    // ---- resample ----------------------------------------------------------

    #[test]
    fn resample_equal_rates_is_noop() {
        let input: Vec<f32> = (0..110).map(|i| i as f32 / 110.0).collect();
        let out = resample(&input, 11_025, 11_025);
        assert_eq!(out, input);
    }

    #[test]
    fn resample_empty_input() {
        assert!(resample(&[], 48_000, 11_025).is_empty());
    }

    #[test]
    fn resample_48k_to_11025_output_length() {
        // 4800 samples @ 48 kHz = 100 ms → ~1102 samples @ 11 025 Hz
        let input = vec![0.5_f32; 4_800];
        let out = resample(&input, 48_000, 11_025);
        assert!(out.len().abs_diff(1_103) <= 1, "got {}", out.len());
    }

    #[test]
    fn resample_constant_signal_preserves_amplitude() {
        let input = vec![0.5_f32; 4_800];
        let out = resample(&input, 48_000, 11_025);
        for &s in &out {
            assert!((s - 0.5).abs() < 1e-5, "amplitude drift: {s}");
        }
    }

    #[test]
    fn resample_upsamples() {
        // 11 025 Hz → 22 050 Hz doubles the sample count
        let input = vec![0.0_f32; 1_000];
        let out = resample(&input, 11_025, 22_050);
        assert_eq!(out.len(), 2_000);
    }

    // ---- quantize / widen --------------------------------------------------

    #[test]
    fn quantize_clamps_out_of_range() {
        let out = quantize_i16(&[2.0, -2.0]);
        assert_eq!(out, vec![i16::MAX, -i16::MAX]);
    }

    #[test]
    fn quantize_zero_stays_zero() {
        assert_eq!(quantize_i16(&[0.0]), vec![0]);
    }

    #[test]
    fn f32_round_trip_is_close() {
        let original: Vec<i16> = vec![0, 100, -100, 16_000, -16_000, i16::MAX];
        let back = quantize_i16(&samples_to_f32(&original));
        for (a, b) in original.iter().zip(back.iter()) {
            assert!((i32::from(*a) - i32::from(*b)).abs() <= 1, "{a} vs {b}");
        }
    }
}
