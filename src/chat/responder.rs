//! Core `Responder` trait and `ChatApiResponder` implementation.
//!
//! `ChatApiResponder` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint. The request carries an optional persona (system message), the
//! conversation history snapshot in order, and finally the current user
//! utterance. All connection details come from [`ChatSettings`]; nothing is
//! hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ChatSettings;
use crate::dialogue::{ConversationTurn, Role};

// ---------------------------------------------------------------------------
// ChatError
// ---------------------------------------------------------------------------

/// Errors that can occur during reply generation.
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("chat request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("chat service error {status}: {body}")]
    Api { status: u16, body: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse chat response: {0}")]
    Parse(String),

    /// The service returned a response with no usable text content.
    #[error("chat service returned an empty reply")]
    EmptyReply,
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ChatError::Timeout
        } else {
            ChatError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Responder trait
// ---------------------------------------------------------------------------

/// Async trait for reply-generation backends.
///
/// `history` is an immutable snapshot and must not include the in-flight
/// user utterance — `transcript` is appended as the final message by the
/// implementation.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(
        &self,
        transcript: &str,
        history: &[ConversationTurn],
    ) -> Result<String, ChatError>;
}

// ---------------------------------------------------------------------------
// ChatApiResponder
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ChatApiResponder {
    client: reqwest::Client,
    settings: ChatSettings,
    api_key: String,
}

impl ChatApiResponder {
    /// Build a responder from settings and the shared API key.
    pub fn new(settings: &ChatSettings, api_key: impl Into<String>) -> Self {
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

/// Assemble the wire-format message list: persona, history, current turn.
fn build_messages(
    persona: Option<&str>,
    history: &[ConversationTurn],
    transcript: &str,
) -> Vec<serde_json::Value> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    if let Some(persona) = persona {
        messages.push(serde_json::json!({ "role": "system", "content": persona }));
    }

    for turn in history {
        let role = match turn.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        messages.push(serde_json::json!({ "role": role, "content": turn.content }));
    }

    messages.push(serde_json::json!({ "role": "user", "content": transcript }));
    messages
}

#[async_trait]
impl Responder for ChatApiResponder {
    async fn respond(
        &self,
        transcript: &str,
        history: &[ConversationTurn],
    ) -> Result<String, ChatError> {
        let messages = build_messages(self.settings.persona.as_deref(), history, transcript);

        let url = format!("{}/v1/chat/completions", self.settings.base_url);
        let body = serde_json::json!({
            "model":       self.settings.model,
            "messages":    messages,
            "stream":      false,
            "temperature": self.settings.temperature,
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
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ChatError::EmptyReply)?
            .trim()
            .to_string();

        if reply.is_empty() {
            return Err(ChatError::EmptyReply);
        }

        Ok(reply)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
