//! Gemini Client
//!
//! Thin client for Google's Generative Language API, used to voice the
//! mirror. The base URL is injectable so tests can point it at a local
//! mock server.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

/// Errors from the mirror's language backend.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Cooldown active: {remaining_secs}s remaining")]
    Cooldown { remaining_secs: u64 },
}

pub type MirrorResult<T> = Result<T, MirrorError>;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Mirror,
}

/// One turn in a mirror conversation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn mirror(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Mirror,
            content: content.into(),
        }
    }
}

/// Client for Gemini `generateContent` calls.
pub struct GeminiClient {
    api_key: String,
    model: String,
    api_base: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, api_base: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        // Trim the API key at construction to ensure consistency
        Self {
            api_key: api_key.trim().to_string(),
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_contents(messages: &[ChatMessage]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    ChatRole::User => "user",
                    ChatRole::Mirror => "model",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": msg.content }]
                })
            })
            .collect()
    }

    /// Generate one response for the given system prompt and turns.
    pub async fn generate(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> MirrorResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        );

        let body = serde_json::json!({
            "contents": Self::build_contents(messages),
            "systemInstruction": {
                "parts": [{ "text": system_prompt }]
            },
            "generationConfig": {
                "maxOutputTokens": 1024
            }
        });

        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(MirrorError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let json: serde_json::Value = resp.json().await?;

        let content = json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .and_then(|parts| parts.first())
            .and_then(|p| p["text"].as_str())
            .ok_or_else(|| MirrorError::InvalidResponse("Missing content".to_string()))?
            .to_string();

        Ok(content)
    }
}
