//! Discord REST Client
//!
//! Thin wrapper over the Discord v10 HTTP API, limited to the endpoints
//! this bot touches: OAuth token exchange, role-connection publishing,
//! command/metadata registration, interaction webhook edits, and direct
//! messages. Every request carries a bounded timeout; non-2xx responses
//! surface as [`DiscordError::Api`] values.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use super::types::{self, DiscordUser};
use crate::config::DiscordConfig;
use crate::core::progression::Notifier;

/// Production API base; tests point this at a local mock server.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

const HTTP_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum DiscordError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Discord API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type DiscordResult<T> = Result<T, DiscordError>;

// ============================================================================
// Response Models
// ============================================================================

/// OAuth token grant response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DmChannel {
    id: String,
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Discord endpoints the bot uses.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: String,
    application_id: String,
    client_secret: String,
    bot_token: String,
    redirect_uri: String,
}

impl DiscordClient {
    pub fn new(config: &DiscordConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            application_id: config.application_id.clone(),
            client_secret: config.client_secret.clone(),
            bot_token: config.bot_token.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn bot_auth(&self) -> String {
        format!("Bot {}", self.bot_token)
    }

    async fn checked(response: reqwest::Response) -> DiscordResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DiscordError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    // ========================================================================
    // OAuth
    // ========================================================================

    /// Authorization URL the linked-role flow redirects the browser to.
    pub fn authorize_url(&self, state: &str) -> String {
        let params = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.application_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("state", state)
            .append_pair("scope", "identify role_connections.write")
            .append_pair("prompt", "consent")
            .finish();
        format!("{}/oauth2/authorize?{}", self.api_base, params)
    }

    /// Exchange an OAuth authorization code for user tokens.
    pub async fn exchange_code(&self, code: &str) -> DiscordResult<TokenResponse> {
        let response = self
            .http
            .post(self.url("/oauth2/token"))
            .form(&[
                ("client_id", self.application_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// Fetch the user a bearer token belongs to.
    pub async fn fetch_user(&self, access_token: &str) -> DiscordResult<DiscordUser> {
        let response = self
            .http
            .get(self.url("/users/@me"))
            .bearer_auth(access_token)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// Publish a user's role-connection metadata. Requires the user's own
    /// access token, not the bot token.
    pub async fn push_role_connection(
        &self,
        access_token: &str,
        payload: &Value,
    ) -> DiscordResult<()> {
        let path = format!(
            "/users/@me/applications/{}/role-connection",
            self.application_id
        );
        let response = self
            .http
            .put(self.url(&path))
            .bearer_auth(access_token)
            .json(payload)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    // ========================================================================
    // Application Setup
    // ========================================================================

    /// Register the role-connection metadata schema.
    pub async fn register_metadata(&self) -> DiscordResult<()> {
        let path = format!(
            "/applications/{}/role-connections/metadata",
            self.application_id
        );
        let response = self
            .http
            .put(self.url(&path))
            .header("Authorization", self.bot_auth())
            .json(&types::metadata_schema())
            .send()
            .await?;
        Self::checked(response).await?;
        debug!("Registered role-connection metadata schema");
        Ok(())
    }

    /// Bulk-register the global slash commands. Returns how many Discord
    /// accepted.
    pub async fn register_commands(&self) -> DiscordResult<usize> {
        let path = format!("/applications/{}/commands", self.application_id);
        let response = self
            .http
            .put(self.url(&path))
            .header("Authorization", self.bot_auth())
            .json(&types::command_definitions())
            .send()
            .await?;
        let body: Value = Self::checked(response).await?.json().await?;
        let count = body.as_array().map(Vec::len).unwrap_or(0);
        debug!(count, "Registered slash commands");
        Ok(count)
    }

    // ========================================================================
    // Interaction Followups
    // ========================================================================

    /// Replace the deferred original response.
    pub async fn edit_original_response(
        &self,
        interaction_token: &str,
        body: &Value,
    ) -> DiscordResult<()> {
        let path = format!(
            "/webhooks/{}/{}/messages/@original",
            self.application_id, interaction_token
        );
        let response = self.http.patch(self.url(&path)).json(body).send().await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// Post an additional followup message for an interaction.
    pub async fn create_followup(&self, interaction_token: &str, body: &Value) -> DiscordResult<()> {
        let path = format!("/webhooks/{}/{}", self.application_id, interaction_token);
        let response = self.http.post(self.url(&path)).json(body).send().await?;
        Self::checked(response).await?;
        Ok(())
    }

    // ========================================================================
    // Direct Messages
    // ========================================================================

    /// Open (or reuse) the DM channel with a user and send a message.
    pub async fn send_direct_message(&self, user_id: &str, content: &str) -> DiscordResult<()> {
        let response = self
            .http
            .post(self.url("/users/@me/channels"))
            .header("Authorization", self.bot_auth())
            .json(&json!({ "recipient_id": user_id }))
            .send()
            .await?;
        let channel: DmChannel = Self::checked(response).await?.json().await?;

        let response = self
            .http
            .post(self.url(&format!("/channels/{}/messages", channel.id)))
            .header("Authorization", self.bot_auth())
            .json(&json!({ "content": content }))
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordClient {
    async fn notify(
        &self,
        user_id: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.send_direct_message(user_id, message).await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
