//! Web Surface
//!
//! axum server fronting the bot: a landing page, a health probe, the
//! linked-role OAuth flow, a small session-authenticated API, and the
//! signed interaction webhook.

pub mod interactions;
pub mod oauth;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ed25519_dalek::VerifyingKey;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::DiscordConfig;
use crate::core::mirror::MirrorChat;
use crate::core::pathway::catalog;
use crate::core::progression::ProgressionEngine;
use crate::discord::DiscordClient;

pub use oauth::{Session, SessionStore, StateStore, SESSION_TTL, STATE_TTL};

// ============================================================================
// Application State
// ============================================================================

/// Shared state behind every handler.
pub struct AppState {
    pub engine: Arc<ProgressionEngine>,
    pub mirror: Arc<MirrorChat>,
    pub discord: Arc<DiscordClient>,
    pub sessions: SessionStore,
    pub oauth_states: StateStore,
    pub verifying_key: Option<VerifyingKey>,
}

impl AppState {
    pub fn new(
        engine: Arc<ProgressionEngine>,
        mirror: Arc<MirrorChat>,
        discord: Arc<DiscordClient>,
        config: &DiscordConfig,
    ) -> Self {
        let verifying_key = interactions::parse_public_key(&config.public_key);
        if verifying_key.is_none() {
            warn!("No valid Discord public key configured; /interactions will reject everything");
        }
        Self {
            engine,
            mirror,
            discord,
            sessions: SessionStore::new(SESSION_TTL),
            oauth_states: StateStore::new(STATE_TTL),
            verifying_key,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/health", get(health))
        .route("/linked-role", get(oauth::linked_role))
        .route("/linked-role-callback", get(oauth::linked_role_callback))
        .route("/api/me", get(oauth::me))
        .route("/api/select-pathway", post(oauth::select_pathway))
        .route("/interactions", post(interactions::handle_interaction))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> std::io::Result<()> {
    let app = router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

// ============================================================================
// Basic Handlers
// ============================================================================

async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "pathways": catalog().len(),
    }))
}

/// Uniform JSON error body for the web API.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "message": message,
                "type": "request_error"
            }
        })),
    )
        .into_response()
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Aroodes</title>
  <style>
    body { background: #1a1a2e; color: #d4af37; font-family: Georgia, serif;
           display: flex; align-items: center; justify-content: center;
           height: 100vh; margin: 0; text-align: center; }
    .card { max-width: 28rem; }
    p { color: #cccccc; }
    a { color: #d4af37; }
  </style>
</head>
<body>
  <div class="card">
    <h1>🪞 Aroodes</h1>
    <p>The magic mirror watches over the Beyonders of this server.</p>
    <p><a href="/linked-role">Link your Beyonder profile</a></p>
  </div>
</body>
</html>
"#;

// ============================================================================
// Tests
// ============================================================================
