//! Mirror Conversation Layer
//!
//! Orchestrates the persona over the Gemini client: one-shot questions with
//! cooldown and punishment draws, ongoing per-user conversations with
//! bounded history, and the offline divination draw.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;

use lru::LruCache;
use tracing::debug;

use super::cooldown::{CooldownState, CooldownTracker};
use super::gemini::{ChatMessage, GeminiClient, MirrorError, MirrorResult};
use super::persona;

/// Bound on concurrently remembered conversations.
pub const CONVERSATION_CAPACITY: usize = 256;

/// Default retained conversation turns (two per exchange).
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Answer to a one-shot question.
#[derive(Debug, Clone)]
pub struct AskReply {
    pub response: String,
    /// Flavor line when the question drew the mirror's ire.
    pub punishment: Option<&'static str>,
}

/// Answer within an ongoing conversation.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    /// Completed exchanges currently remembered.
    pub exchanges: usize,
}

/// The talking mirror: persona plus conversation state.
pub struct MirrorChat {
    client: GeminiClient,
    ask_cooldowns: CooldownTracker,
    conversations: Mutex<LruCache<String, Vec<ChatMessage>>>,
    history_limit: usize,
}

impl MirrorChat {
    pub fn new(client: GeminiClient, ask_cooldown: Duration, history_limit: usize) -> Self {
        Self {
            client,
            ask_cooldowns: CooldownTracker::new(ask_cooldown),
            conversations: Mutex::new(LruCache::new(
                NonZeroUsize::new(CONVERSATION_CAPACITY).expect("capacity must be > 0"),
            )),
            history_limit: history_limit.max(2),
        }
    }

    /// One-shot question with the asker's progression context woven into the
    /// prompt. Throttled per user; roughly a third of answers carry a
    /// punishment line.
    pub async fn ask(&self, user_id: &str, question: &str, context: &str) -> MirrorResult<AskReply> {
        match self.ask_cooldowns.try_acquire(user_id) {
            CooldownState::Cooling { remaining } => {
                return Err(MirrorError::Cooldown {
                    remaining_secs: remaining.as_secs().max(1),
                });
            }
            CooldownState::Ready => {}
        }

        let system = format!("{}{}", persona::ASK_PERSONALITY, context);
        let messages = [ChatMessage::user(question)];
        let response = self.client.generate(&system, &messages).await?;

        let punishment = persona::draw_punishment(&mut rand::thread_rng());
        debug!(user_id = %user_id, punished = punishment.is_some(), "Mirror answered a question");

        Ok(AskReply {
            response,
            punishment,
        })
    }

    /// One turn of an ongoing conversation. History is kept per user and
    /// trimmed to the most recent turns.
    pub async fn converse(&self, user_id: &str, message: &str) -> MirrorResult<ChatReply> {
        // Clone the history out; the lock is never held across an await.
        let mut turns = {
            let mut conversations = self.conversations.lock().unwrap_or_else(|e| e.into_inner());
            conversations.get(user_id).cloned().unwrap_or_default()
        };
        turns.push(ChatMessage::user(message));

        let response = self.client.generate(persona::CHAT_PERSONALITY, &turns).await?;

        turns.push(ChatMessage::mirror(response.clone()));
        if turns.len() > self.history_limit {
            turns.drain(..turns.len() - self.history_limit);
        }
        let exchanges = turns.len() / 2;

        {
            let mut conversations = self.conversations.lock().unwrap_or_else(|e| e.into_inner());
            conversations.put(user_id.to_string(), turns);
        }

        debug!(user_id = %user_id, exchanges, "Mirror conversation turn");
        Ok(ChatReply {
            response,
            exchanges,
        })
    }

    /// Forget a user's conversation. Returns whether one existed.
    pub fn reset_conversation(&self, user_id: &str) -> bool {
        let mut conversations = self.conversations.lock().unwrap_or_else(|e| e.into_inner());
        conversations.pop(user_id).is_some()
    }

    /// Offline divination draw; no cooldown, no API call.
    pub fn divine(&self) -> &'static str {
        persona::draw_divination(&mut rand::thread_rng())
    }
}
