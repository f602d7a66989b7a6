//! Linked-Role OAuth Flow
//!
//! Implements the Discord linked-role handshake: a one-time state token
//! guards the redirect, the callback exchanges the code, publishes the
//! user's role-connection metadata, and issues an opaque session cookie.
//! Sessions and pending states live in bounded in-memory stores; restarts
//! simply require users to link again.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use lru::LruCache;
use rand::RngCore;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::{error_response, AppState};
use crate::core::pathway::PathwayId;
use crate::core::progression::ProgressionError;
use crate::discord::types::role_connection_payload;

/// One-time OAuth states expire after this long.
pub const STATE_TTL: Duration = Duration::from_secs(5 * 60);

/// Sessions expire after this long.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "aroodes_session";

const STATE_CAPACITY: usize = 1024;
const SESSION_CAPACITY: usize = 4096;

// ============================================================================
// State Store
// ============================================================================

/// Bounded store of pending OAuth state tokens. Each token is single-use
/// and expires after the configured TTL.
pub struct StateStore {
    states: Mutex<LruCache<String, Instant>>,
    ttl: Duration,
}

impl StateStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            states: Mutex::new(LruCache::new(
                NonZeroUsize::new(STATE_CAPACITY).expect("capacity must be > 0"),
            )),
            ttl,
        }
    }

    /// Issue a fresh one-time state token.
    pub fn issue(&self) -> String {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);
        let mut states = self.lock();
        states.push(token.clone(), Instant::now() + self.ttl);
        token
    }

    /// Consume a state token. Returns false when unknown or expired.
    pub fn consume(&self, token: &str) -> bool {
        let mut states = self.lock();
        match states.pop(token) {
            Some(expires_at) => expires_at > Instant::now(),
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, Instant>> {
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ============================================================================
// Session Store
// ============================================================================

/// Identity attached to a browser session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub username: String,
}

struct SessionEntry {
    session: Session,
    expires_at: Instant,
}

/// Bounded store of opaque session tokens.
pub struct SessionStore {
    sessions: Mutex<LruCache<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(LruCache::new(
                NonZeroUsize::new(SESSION_CAPACITY).expect("capacity must be > 0"),
            )),
            ttl,
        }
    }

    /// Create a session and return its opaque token.
    pub fn create(&self, user_id: &str, username: &str) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);
        let entry = SessionEntry {
            session: Session {
                user_id: user_id.to_string(),
                username: username.to_string(),
            },
            expires_at: Instant::now() + self.ttl,
        };
        let mut sessions = self.lock();
        sessions.push(token.clone(), entry);
        token
    }

    /// Look up a live session, evicting it if expired.
    pub fn get(&self, token: &str) -> Option<Session> {
        let mut sessions = self.lock();
        if let Some(entry) = sessions.get(token) {
            if entry.expires_at > Instant::now() {
                return Some(entry.session.clone());
            }
        }
        sessions.pop(token);
        None
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Entry point for the linked-role flow: park a state token and bounce the
/// browser to Discord's consent screen.
pub async fn linked_role(State(state): State<Arc<AppState>>) -> Response {
    let token = state.oauth_states.issue();
    let url = state.discord.authorize_url(&token);
    Redirect::temporary(&url).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

/// OAuth callback: validate state, trade the code for tokens, publish the
/// role-connection snapshot, and hand the browser a session cookie.
pub async fn linked_role_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    if params.code.is_empty() || !state.oauth_states.consume(&params.state) {
        return error_response(StatusCode::FORBIDDEN, "State verification failed");
    }

    let tokens = match state.discord.exchange_code(&params.code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            error!("OAuth code exchange failed: {}", e);
            return error_response(StatusCode::BAD_GATEWAY, "Token exchange failed");
        }
    };
    let user = match state.discord.fetch_user(&tokens.access_token).await {
        Ok(user) => user,
        Err(e) => {
            error!("Failed to fetch OAuth user: {}", e);
            return error_response(StatusCode::BAD_GATEWAY, "Failed to fetch user");
        }
    };

    let snapshot = match state.engine.metadata_for(&user.id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Metadata lookup failed for {}: {}", user.id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Profile lookup failed");
        }
    };
    let payload = role_connection_payload(&user.username, &snapshot);
    if let Err(e) = state
        .discord
        .push_role_connection(&tokens.access_token, &payload)
        .await
    {
        error!("Failed to push role connection for {}: {}", user.id, e);
        return error_response(StatusCode::BAD_GATEWAY, "Failed to update role connection");
    }

    let session = state.sessions.create(&user.id, &user.username);
    let cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        session,
        SESSION_TTL.as_secs()
    );
    ([(header::SET_COOKIE, cookie)], Html(SUCCESS_PAGE)).into_response()
}

/// Profile of the session's user, including the current metadata snapshot.
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Response {
    let Some(session) = session_from_headers(&state, &headers) else {
        return error_response(StatusCode::UNAUTHORIZED, "Not logged in");
    };
    match state.engine.metadata_for(&session.user_id).await {
        Ok(snapshot) => Json(json!({
            "user_id": session.user_id,
            "username": session.username,
            "metadata": snapshot,
        }))
        .into_response(),
        Err(e) => {
            error!("Profile lookup failed for {}: {}", session.user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Profile lookup failed")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectPathwayRequest {
    pub pathway: String,
}

/// Self-service pathway selection. One shot per user; admins handle changes.
pub async fn select_pathway(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Json(request): Json<SelectPathwayRequest>,
) -> Response {
    let Some(session) = session_from_headers(&state, &headers) else {
        return error_response(StatusCode::UNAUTHORIZED, "Not logged in");
    };
    let Some(pathway) = PathwayId::parse(&request.pathway) else {
        return error_response(StatusCode::BAD_REQUEST, "Unknown pathway");
    };
    match state
        .engine
        .assign_pathway(&session.user_id, &session.username, pathway)
        .await
    {
        Ok(record) => Json(json!({
            "pathway": pathway.as_str(),
            "sequence": record.sequence,
        }))
        .into_response(),
        Err(ProgressionError::AlreadyAssigned { .. }) => {
            error_response(StatusCode::BAD_REQUEST, "Pathway already selected")
        }
        Err(e) => {
            error!("Self-service assignment failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Assignment failed")
        }
    }
}

/// Extract and validate the session cookie.
fn session_from_headers(state: &AppState, headers: &axum::http::HeaderMap) -> Option<Session> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let token = cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })?;
    state.sessions.get(&token)
}

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
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
  </style>
</head>
<body>
  <div class="card">
    <h1>🪞 Connected</h1>
    <p>Your Beyonder profile is now linked to Discord.
       You can close this window and return to the server.</p>
  </div>
</body>
</html>
"#;

// ============================================================================
// Tests
// ============================================================================
