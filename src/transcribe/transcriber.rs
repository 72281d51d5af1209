//! `Transcriber` trait and hosted Whisper-style API implementation.
//!
//! `WhisperApiTranscriber` talks to any OpenAI-compatible
//! `/v1/audio/transcriptions` endpoint. All connection details come from
//! [`TranscribeSettings`]; nothing is hardcoded.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranscribeSettings;

// ---------------------------------------------------------------------------
// TranscribeError
// ---------------------------------------------------------------------------

/// Errors that can occur while transcribing a recording.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// The recording file could not be read.
    #[error("failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("transcription request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("transcription service error {status}: {body}")]
    Api { status: u16, body: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse transcription response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TranscribeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscribeError::Timeout
        } else {
            TranscribeError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Async trait for speech-to-text backends.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn Transcriber>`).
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the mono PCM recording at `recording` into UTF-8 text.
    async fn transcribe(&self, recording: &Path) -> Result<String, TranscribeError>;
}

// ---------------------------------------------------------------------------
// WhisperApiTranscriber
// ---------------------------------------------------------------------------

/// Uploads recordings to an OpenAI-compatible transcription endpoint.
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    settings: TranscribeSettings,
    api_key: String,
}

impl WhisperApiTranscriber {
    /// Build a transcriber from settings and the shared API key.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `settings.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails.
    pub fn new(settings: &TranscribeSettings, api_key: impl Into<String>) -> Self {
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
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(&self, recording: &Path) -> Result<String, TranscribeError> {
        let bytes = tokio::fs::read(recording).await?;
        log::debug!("uploading {} byte recording for transcription", bytes.len());

        let file_part = reqwest::multipart::Part::bytes(bytes)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscribeError::Request(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.settings.model.clone());

        if let Some(language) = &self.settings.language {
            form = form.text("language", language.clone());
        }

        let url = format!("{}/v1/audio/transcriptions", self.settings.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscribeError::Parse(e.to_string()))?;

        let text = json["text"]
            .as_str()
            .ok_or_else(|| TranscribeError::Parse("missing `text` field".into()))?
            .trim()
            .to_string();

        Ok(text)
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
        let settings = TranscribeSettings::default();
        let _transcriber = WhisperApiTranscriber::new(&settings, "sk-test");
    }

    /// `WhisperApiTranscriber` must be usable as `dyn Transcriber`.
    #[test]
    fn transcriber_is_object_safe() {
        let settings = TranscribeSettings::default();
        let transcriber: Box<dyn Transcriber> =
            Box::new(WhisperApiTranscriber::new(&settings, "sk-test"));
        drop(transcriber);
    }

    #[tokio::test]
    async fn missing_file_maps_to_io_error() {
        let settings = TranscribeSettings::default();
        let transcriber = WhisperApiTranscriber::new(&settings, "sk-test");
        let result = transcriber
            .transcribe(Path::new("/nonexistent/recording.wav"))
            .await;
        assert!(matches!(result, Err(TranscribeError::Io(_))));
    }

    #[test]
    fn timeout_errors_are_distinguished() {
        // The From impl routes timeouts to their own variant so the voice
        // loop can log them distinctly.
        let e = TranscribeError::Timeout;
        assert!(e.to_string().contains("timed out"));
    }
}
