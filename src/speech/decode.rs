//! MP3 → mono i16 PCM decoding via `minimp3`.

use std::io::Cursor;

use crate::speech::SpeechError;

/// Decode an MP3 byte stream to mono 16-bit PCM.
///
/// Multi-channel frames are downmixed by averaging. Returns the samples and
/// the stream's sample rate.
///
/// # Errors
///
/// Returns [`SpeechError::Decode`] when the stream is malformed or contains
/// no audio frames.
pub fn decode_mp3_mono(data: &[u8]) -> Result<(Vec<i16>, u32), SpeechError> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(data));
    let mut samples: Vec<i16> = Vec::new();
    let mut sample_rate: u32 = 0;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                sample_rate = frame.sample_rate as u32;
                let channels = frame.channels.max(1);
                if channels == 1 {
                    samples.extend_from_slice(&frame.data);
                } else {
                    samples.extend(frame.data.chunks(channels).map(|frame_samples| {
                        let sum: i32 = frame_samples.iter().map(|&s| i32::from(s)).sum();
                        (sum / frame_samples.len() as i32) as i16
                    }));
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(SpeechError::Decode(e.to_string())),
        }
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(SpeechError::Decode("stream contained no audio frames".into()));
    }

    Ok((samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stream_is_an_error() {
        assert!(matches!(
            decode_mp3_mono(&[]),
            Err(SpeechError::Decode(_))
        ));
    }

    #[test]
    fn garbage_stream_is_an_error() {
        // Arbitrary non-MP3 bytes: the decoder finds no sync word and
        // reaches EOF with no frames.
        let garbage = vec![0x42_u8; 512];
        assert!(decode_mp3_mono(&garbage).is_err());
    }
}
