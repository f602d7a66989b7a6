//! Interaction Webhook
//!
//! Receives Discord interaction callbacks over HTTP. Every request must
//! carry a valid ed25519 signature over timestamp+body; anything else is
//! rejected with 401 so Discord's endpoint verification passes. Commands
//! are acknowledged with a deferral and completed in a spawned task via
//! the webhook edit endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde_json::json;
use tracing::{debug, error, warn};

use super::AppState;
use crate::discord::commands::{self, Command, CommandContext};
use crate::discord::types::{
    Interaction, FLAG_EPHEMERAL, INTERACTION_APPLICATION_COMMAND, INTERACTION_PING,
    RESPONSE_CHANNEL_MESSAGE, RESPONSE_DEFERRED_CHANNEL_MESSAGE, RESPONSE_PONG,
};

/// Parse the hex public key from the developer portal.
pub fn parse_public_key(hex_key: &str) -> Option<VerifyingKey> {
    let bytes = hex::decode(hex_key.trim()).ok()?;
    let array: [u8; 32] = bytes.try_into().ok()?;
    VerifyingKey::from_bytes(&array).ok()
}

/// Check the detached signature Discord attaches to every interaction.
fn verify_signature(key: &VerifyingKey, headers: &HeaderMap, body: &[u8]) -> bool {
    let Some(signature) = headers
        .get("x-signature-ed25519")
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let Some(timestamp) = headers
        .get("x-signature-timestamp")
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let Ok(bytes) = hex::decode(signature) else {
        return false;
    };
    let Ok(array) = <[u8; 64]>::try_from(bytes) else {
        return false;
    };
    let signature = Signature::from_bytes(&array);

    // Discord signs the concatenation of the timestamp and the raw body.
    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);
    key.verify(&message, &signature).is_ok()
}

pub async fn handle_interaction(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(key) = state.verifying_key.as_ref() else {
        error!("Interaction received but no valid public key is configured");
        return StatusCode::UNAUTHORIZED.into_response();
    };
    if !verify_signature(key, &headers, &body) {
        warn!("Rejected interaction with invalid signature");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(e) => {
            warn!("Undecodable interaction payload: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match interaction.kind {
        INTERACTION_PING => Json(json!({ "type": RESPONSE_PONG })).into_response(),
        INTERACTION_APPLICATION_COMMAND => command_response(state, interaction),
        other => {
            debug!("Ignoring interaction type {}", other);
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// Acknowledge the command with a deferral, then finish it off-thread.
/// The ephemeral flag only takes effect on the deferral itself.
fn command_response(state: Arc<AppState>, interaction: Interaction) -> Response {
    let parsed = Command::parse(&interaction);
    let invoker = interaction.invoker().cloned();
    let (Some(command), Some(invoker)) = (parsed, invoker) else {
        warn!(
            "Unrecognized command payload: {:?}",
            interaction.data.as_ref().map(|data| &data.name)
        );
        return Json(json!({
            "type": RESPONSE_CHANNEL_MESSAGE,
            "data": { "content": "❌ Unknown command", "flags": FLAG_EPHEMERAL }
        }))
        .into_response();
    };

    let data = if command.is_ephemeral() {
        json!({ "flags": FLAG_EPHEMERAL })
    } else {
        json!({})
    };
    let deferral = json!({ "type": RESPONSE_DEFERRED_CHANNEL_MESSAGE, "data": data });

    let token = interaction.token.clone();
    let ctx = CommandContext {
        engine: state.engine.clone(),
        mirror: state.mirror.clone(),
    };
    let discord = state.discord.clone();
    tokio::spawn(async move {
        let reply = commands::dispatch(&ctx, command, &invoker).await;
        if let Err(e) = discord
            .edit_original_response(&token, &reply.message_body())
            .await
        {
            error!("Failed to edit deferred response: {}", e);
            return;
        }
        for followup in &reply.followups {
            let body = json!({ "embeds": [followup] });
            if let Err(e) = discord.create_followup(&token, &body).await {
                error!("Failed to post followup: {}", e);
            }
        }
    });

    Json(deferral).into_response()
}

// ============================================================================
// Tests
// ============================================================================
