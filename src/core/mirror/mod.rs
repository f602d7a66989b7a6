//! The Mirror
//!
//! Aroodes' voice: the Gemini-backed persona behind `/ask` and `/chat`,
//! canned divination, per-user cooldowns, and bounded conversation memory.

pub mod chat;
pub mod cooldown;
pub mod gemini;
pub mod persona;

// Re-exports for convenience
pub use chat::{AskReply, ChatReply, MirrorChat};
pub use cooldown::{CooldownState, CooldownTracker};
pub use gemini::{ChatMessage, ChatRole, GeminiClient, MirrorError, MirrorResult};
