//! `Synthesizer` trait and hosted TTS API implementation.
//!
//! `SpeechApiSynthesizer` calls any OpenAI-compatible `/v1/audio/speech`
//! endpoint and returns the encoded (MP3) byte stream unmodified; decoding
//! and playback are the player's concern.

use async_trait::async_trait;

use crate::config::SpeechSettings;
use crate::speech::SpeechError;

// ---------------------------------------------------------------------------
// Synthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for text-to-speech backends.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` into an encoded audio byte stream.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

// ---------------------------------------------------------------------------
// SpeechApiSynthesizer
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible speech endpoint.
pub struct SpeechApiSynthesizer {
    client: reqwest::Client,
    settings: SpeechSettings,
    api_key: String,
}

impl SpeechApiSynthesizer {
    /// Build a synthesizer from settings and the shared API key.
    pub fn new(settings: &SpeechSettings, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            settings: settings.clone(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Synthesizer for SpeechApiSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let url = format!("{}/v1/audio/speech", self.settings.base_url);
        let body = serde_json::json!({
            "model":           self.settings.model,
            "input":           text,
            "voice":           self.settings.voice,
            "speed":           self.settings.speed,
            "response_format": "mp3",
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?;
        log::debug!("synthesized {} bytes for {} chars of text", audio.len(), text.len());
        Ok(audio.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_without_panic() {
        let _synth = SpeechApiSynthesizer::new(&SpeechSettings::default(), "sk-test");
    }

    #[test]
    fn synthesizer_is_object_safe() {
        let synth: Box<dyn Synthesizer> =
            Box::new(SpeechApiSynthesizer::new(&SpeechSettings::default(), "sk-test"));
        drop(synth);
    }
}
