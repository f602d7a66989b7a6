//! Discord Wire Types
//!
//! Serde models for interaction webhook payloads, the embed and reply
//! builders every command renders through, and the static JSON bodies
//! registered with Discord on startup (slash commands and the
//! role-connection metadata schema).

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::pathway::catalog;
use crate::core::progression::MetadataSnapshot;

// ============================================================================
// Wire Constants
// ============================================================================

/// Interaction types (incoming).
pub const INTERACTION_PING: u8 = 1;
pub const INTERACTION_APPLICATION_COMMAND: u8 = 2;

/// Interaction callback types (outgoing).
pub const RESPONSE_PONG: u8 = 1;
pub const RESPONSE_CHANNEL_MESSAGE: u8 = 4;
pub const RESPONSE_DEFERRED_CHANNEL_MESSAGE: u8 = 5;

/// Message flag marking a reply visible only to the invoker.
pub const FLAG_EPHEMERAL: u64 = 64;

/// Application command option types.
pub const OPTION_SUB_COMMAND: u8 = 1;
pub const OPTION_STRING: u8 = 3;
pub const OPTION_INTEGER: u8 = 4;
pub const OPTION_BOOLEAN: u8 = 5;
pub const OPTION_USER: u8 = 6;

/// Role-connection metadata comparison types.
pub const METADATA_INTEGER_LTE: u8 = 1;
pub const METADATA_INTEGER_GTE: u8 = 2;
pub const METADATA_BOOLEAN_EQUAL: u8 = 7;

/// Embed palette.
pub const COLOR_GOLD: u32 = 0xd4af37;
pub const COLOR_RED: u32 = 0xff0000;
pub const COLOR_GREEN: u32 = 0x43b581;

/// Platform name shown on the Discord profile connection.
pub const PLATFORM_NAME: &str = "Aroodes";

// ============================================================================
// Interaction Payloads
// ============================================================================

/// An incoming interaction, as POSTed to the interactions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub id: String,
    /// See the `INTERACTION_*` constants.
    #[serde(rename = "type")]
    pub kind: u8,
    pub token: String,
    #[serde(default)]
    pub data: Option<InteractionData>,
    #[serde(default)]
    pub member: Option<GuildMember>,
    #[serde(default)]
    pub user: Option<DiscordUser>,
}

impl Interaction {
    /// The invoking user: `member.user` inside a guild, `user` in a DM.
    pub fn invoker(&self) -> Option<&DiscordUser> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }
}

/// Command payload of an application-command interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
    #[serde(default)]
    pub resolved: ResolvedData,
}

impl InteractionData {
    /// Named top-level option.
    pub fn option(&self, name: &str) -> Option<&InteractionOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// The invoked subcommand, for commands that carry one.
    pub fn subcommand(&self) -> Option<&InteractionOption> {
        self.options.iter().find(|o| o.kind == OPTION_SUB_COMMAND)
    }

    /// Username resolved for a USER option value, when the payload carries it.
    pub fn resolved_username(&self, user_id: &str) -> Option<&str> {
        self.resolved
            .users
            .get(user_id)
            .map(|u| u.username.as_str())
    }
}

/// One command option (or subcommand) in an interaction payload.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionOption {
    pub name: String,
    /// See the `OPTION_*` constants.
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
}

impl InteractionOption {
    /// Named nested option (subcommand arguments).
    pub fn option(&self, name: &str) -> Option<&InteractionOption> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_ref().and_then(Value::as_i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_ref().and_then(Value::as_bool)
    }
}

/// Entities Discord resolved for option values (USER options and the like).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolvedData {
    #[serde(default)]
    pub users: HashMap<String, DiscordUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl DiscordUser {
    /// Preferred display name.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuildMember {
    #[serde(default)]
    pub user: Option<DiscordUser>,
    #[serde(default)]
    pub nick: Option<String>,
}

// ============================================================================
// Embeds & Replies
// ============================================================================

/// Outgoing message embed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    /// RFC 3339 instant rendered at the embed's base.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.author = Some(EmbedAuthor { name: name.into() });
        self
    }

    pub fn timestamp_now(mut self) -> Self {
        self.timestamp = Some(Utc::now().to_rfc3339());
        self
    }
}

/// A rendered command reply: the main response plus any public followups
/// (currently only the lose-control alert).
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub ephemeral: bool,
    pub followups: Vec<Embed>,
}

impl Reply {
    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    pub fn with_followup(mut self, embed: Embed) -> Self {
        self.followups.push(embed);
        self
    }

    /// Webhook message body used when editing the deferred response.
    pub fn message_body(&self) -> Value {
        let mut body = json!({ "embeds": self.embeds });
        if let Some(content) = &self.content {
            body["content"] = json!(content);
        }
        body
    }
}

// ============================================================================
// Registered Bodies
// ============================================================================

/// Role-connection metadata schema registered with Discord.
///
/// The keys here and the values published by
/// [`MetadataSnapshot::role_connection_values`] are the same six, so the
/// registered gates and the synced data can never drift apart.
pub fn metadata_schema() -> Value {
    json!([
        {
            "key": "sequence",
            "name": "Sequence Level",
            "description": "Your pathway sequence (0-9, lower is stronger)",
            "type": METADATA_INTEGER_LTE,
        },
        {
            "key": "beyonder_days",
            "name": "Days as Beyonder",
            "description": "Days since becoming a Beyonder",
            "type": METADATA_INTEGER_GTE,
        },
        {
            "key": "advancements",
            "name": "Advancements",
            "description": "Completed sequence advancements",
            "type": METADATA_INTEGER_GTE,
        },
        {
            "key": "lost_control",
            "name": "Lost Control Count",
            "description": "Times lost control",
            "type": METADATA_INTEGER_GTE,
        },
        {
            "key": "is_angel",
            "name": "Angel Status",
            "description": "Reached Angel level (Sequence 1-3)",
            "type": METADATA_BOOLEAN_EQUAL,
        },
        {
            "key": "has_pathway",
            "name": "Has Pathway",
            "description": "Assigned to a pathway",
            "type": METADATA_BOOLEAN_EQUAL,
        },
    ])
}

/// Body for `PUT /users/@me/applications/{id}/role-connection`.
pub fn role_connection_payload(username: &str, snapshot: &MetadataSnapshot) -> Value {
    json!({
        "platform_name": PLATFORM_NAME,
        "platform_username": username,
        "metadata": snapshot.role_connection_values(),
    })
}

/// Global slash-command set, bulk-registered on startup.
pub fn command_definitions() -> Value {
    let pathway_choices: Vec<Value> = catalog()
        .iter()
        .map(|p| {
            json!({
                "name": format!("{} {}", p.emoji, p.display_name),
                "value": p.id.as_str(),
            })
        })
        .collect();
    let user_option = json!({
        "name": "user",
        "description": "Target user",
        "type": OPTION_USER,
        "required": true,
    });

    json!([
        {
            "name": "pathway",
            "description": "Beyonder pathway progression",
            "options": [
                {
                    "name": "status",
                    "description": "View your pathway status",
                    "type": OPTION_SUB_COMMAND,
                },
                {
                    "name": "list",
                    "description": "List all 22 pathways",
                    "type": OPTION_SUB_COMMAND,
                },
                {
                    "name": "info",
                    "description": "Detailed information about a pathway",
                    "type": OPTION_SUB_COMMAND,
                    "options": [{
                        "name": "pathway",
                        "description": "Pathway name",
                        "type": OPTION_STRING,
                        "required": true,
                        "choices": pathway_choices.clone(),
                    }],
                },
                {
                    "name": "stats",
                    "description": "Server pathway statistics",
                    "type": OPTION_SUB_COMMAND,
                },
            ],
        },
        {
            "name": "lose-control",
            "description": "Check your lose control risk and roll for stability",
            "options": [
                {
                    "name": "check",
                    "description": "Roll to see if you maintain control",
                    "type": OPTION_SUB_COMMAND,
                },
                {
                    "name": "history",
                    "description": "View your lose control history",
                    "type": OPTION_SUB_COMMAND,
                },
            ],
        },
        {
            "name": "admin",
            "description": "Admin commands for managing beyonders",
            "default_member_permissions": "8",
            "options": [
                {
                    "name": "setpathway",
                    "description": "Force set a user pathway",
                    "type": OPTION_SUB_COMMAND,
                    "options": [
                        user_option.clone(),
                        {
                            "name": "pathway",
                            "description": "Pathway name",
                            "type": OPTION_STRING,
                            "required": true,
                            "choices": pathway_choices,
                        },
                    ],
                },
                {
                    "name": "setsequence",
                    "description": "Force set sequence level",
                    "type": OPTION_SUB_COMMAND,
                    "options": [
                        user_option.clone(),
                        {
                            "name": "sequence",
                            "description": "Sequence (0-9)",
                            "type": OPTION_INTEGER,
                            "required": true,
                            "min_value": 0,
                            "max_value": 9,
                        },
                    ],
                },
                {
                    "name": "givepoints",
                    "description": "Give spiritual points",
                    "type": OPTION_SUB_COMMAND,
                    "options": [
                        user_option.clone(),
                        {
                            "name": "points",
                            "description": "Amount of points",
                            "type": OPTION_INTEGER,
                            "required": true,
                            "min_value": 1,
                        },
                    ],
                },
                {
                    "name": "reset",
                    "description": "Reset user pathway",
                    "type": OPTION_SUB_COMMAND,
                    "options": [user_option.clone()],
                },
                {
                    "name": "delete",
                    "description": "Delete user from database",
                    "type": OPTION_SUB_COMMAND,
                    "options": [user_option.clone()],
                },
                {
                    "name": "view",
                    "description": "View user profile (admin)",
                    "type": OPTION_SUB_COMMAND,
                    "options": [user_option],
                },
            ],
        },
        {
            "name": "ask",
            "description": "Ask Aroodes the Magic Mirror a question",
            "options": [{
                "name": "question",
                "description": "Your question for the mirror",
                "type": OPTION_STRING,
                "required": true,
            }],
        },
        {
            "name": "chat",
            "description": "Have an ongoing conversation with Aroodes",
            "options": [
                {
                    "name": "message",
                    "description": "Your message to the mirror",
                    "type": OPTION_STRING,
                    "required": true,
                },
                {
                    "name": "reset",
                    "description": "Clear the conversation history",
                    "type": OPTION_BOOLEAN,
                    "required": false,
                },
            ],
        },
        {
            "name": "divine",
            "description": "Perform divination on a question",
            "options": [{
                "name": "question",
                "description": "Your question for the mirror",
                "type": OPTION_STRING,
                "required": true,
            }],
        },
    ])
}

// ============================================================================
// Tests
// ============================================================================
