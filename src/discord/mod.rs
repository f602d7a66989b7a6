//! Discord Surface
//!
//! Everything that speaks Discord: the wire types for interactions and
//! embeds, the REST client for OAuth, registration, and webhook followups,
//! and the slash-command parser and dispatcher.

pub mod api;
pub mod commands;
pub mod types;

pub use api::{DiscordClient, DiscordError, DiscordResult, TokenResponse, DEFAULT_API_BASE};
pub use commands::{dispatch, Command, CommandContext};
pub use types::{DiscordUser, Embed, Interaction, Reply};
