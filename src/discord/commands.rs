//! Slash Command Dispatch
//!
//! Parses application-command interactions into a closed [`Command`] enum and
//! renders each command into a [`Reply`]. Parsing is total over the registered
//! command tree; anything outside it yields `None` and the caller responds
//! with a generic error. Rendering never panics: engine rejections become
//! user-facing notices, storage and upstream failures become a generic error
//! embed plus a log line.

use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use tracing::{debug, error};

use super::types::{
    DiscordUser, Embed, Interaction, Reply, COLOR_GOLD, COLOR_GREEN, COLOR_RED,
};
use crate::core::mirror::{persona, MirrorChat, MirrorError};
use crate::core::pathway::{catalog, PathwayId};
use crate::core::progression::{
    derive_metadata, ProgressionEngine, ProgressionError, StabilityCheckRequest, StabilityOutcome,
};

/// Discord caps embed descriptions at 4096 characters; leave room for the
/// fixed scaffolding around user-supplied text.
const DESCRIPTION_TEXT_LIMIT: usize = 3000;

/// Discord caps embed field values at 1024 characters.
const FIELD_TEXT_LIMIT: usize = 1024;

const QUESTION_TEXT_LIMIT: usize = 1000;

// ============================================================================
// Command Enum
// ============================================================================

/// Every slash command the bot registers, fully parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PathwayStatus,
    PathwayList,
    PathwayInfo {
        pathway: PathwayId,
    },
    PathwayStats,
    StabilityCheck,
    StabilityHistory,
    AdminSetPathway {
        user_id: String,
        username: String,
        pathway: PathwayId,
    },
    AdminSetSequence {
        user_id: String,
        username: String,
        sequence: i64,
    },
    AdminGivePoints {
        user_id: String,
        username: String,
        points: i64,
    },
    AdminReset {
        user_id: String,
        username: String,
    },
    AdminDelete {
        user_id: String,
        username: String,
    },
    AdminView {
        user_id: String,
        username: String,
    },
    Ask {
        question: String,
    },
    Chat {
        message: String,
        reset: bool,
    },
    Divine {
        question: String,
    },
}

impl Command {
    /// Parse a received interaction against the registered command tree.
    pub fn parse(interaction: &Interaction) -> Option<Self> {
        let data = interaction.data.as_ref()?;
        match data.name.as_str() {
            "pathway" => {
                let sub = data.subcommand()?;
                match sub.name.as_str() {
                    "status" => Some(Self::PathwayStatus),
                    "list" => Some(Self::PathwayList),
                    "info" => {
                        let raw = sub.option("pathway")?.as_str()?;
                        Some(Self::PathwayInfo {
                            pathway: PathwayId::parse(raw)?,
                        })
                    }
                    "stats" => Some(Self::PathwayStats),
                    _ => None,
                }
            }
            "lose-control" => {
                let sub = data.subcommand()?;
                match sub.name.as_str() {
                    "check" => Some(Self::StabilityCheck),
                    "history" => Some(Self::StabilityHistory),
                    _ => None,
                }
            }
            "admin" => {
                let sub = data.subcommand()?;
                let user_id = sub.option("user")?.as_str()?.to_string();
                let username = data
                    .resolved_username(&user_id)
                    .unwrap_or(&user_id)
                    .to_string();
                match sub.name.as_str() {
                    "setpathway" => {
                        let raw = sub.option("pathway")?.as_str()?;
                        Some(Self::AdminSetPathway {
                            user_id,
                            username,
                            pathway: PathwayId::parse(raw)?,
                        })
                    }
                    "setsequence" => Some(Self::AdminSetSequence {
                        user_id,
                        username,
                        sequence: sub.option("sequence")?.as_i64()?,
                    }),
                    "givepoints" => Some(Self::AdminGivePoints {
                        user_id,
                        username,
                        points: sub.option("points")?.as_i64()?,
                    }),
                    "reset" => Some(Self::AdminReset { user_id, username }),
                    "delete" => Some(Self::AdminDelete { user_id, username }),
                    "view" => Some(Self::AdminView { user_id, username }),
                    _ => None,
                }
            }
            "ask" => Some(Self::Ask {
                question: data.option("question")?.as_str()?.to_string(),
            }),
            "chat" => Some(Self::Chat {
                message: data.option("message")?.as_str()?.to_string(),
                reset: data
                    .option("reset")
                    .and_then(|option| option.as_bool())
                    .unwrap_or(false),
            }),
            "divine" => Some(Self::Divine {
                question: data.option("question")?.as_str()?.to_string(),
            }),
            _ => None,
        }
    }

    /// Commands whose deferred response is only visible to the invoker.
    /// The flag must be decided before the deferral; it cannot change later.
    pub fn is_ephemeral(&self) -> bool {
        matches!(
            self,
            Self::StabilityHistory
                | Self::AdminSetPathway { .. }
                | Self::AdminSetSequence { .. }
                | Self::AdminGivePoints { .. }
                | Self::AdminReset { .. }
                | Self::AdminDelete { .. }
                | Self::AdminView { .. }
        )
    }

    /// Stable label for logs and error contexts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PathwayStatus => "pathway status",
            Self::PathwayList => "pathway list",
            Self::PathwayInfo { .. } => "pathway info",
            Self::PathwayStats => "pathway stats",
            Self::StabilityCheck => "lose-control check",
            Self::StabilityHistory => "lose-control history",
            Self::AdminSetPathway { .. } => "admin setpathway",
            Self::AdminSetSequence { .. } => "admin setsequence",
            Self::AdminGivePoints { .. } => "admin givepoints",
            Self::AdminReset { .. } => "admin reset",
            Self::AdminDelete { .. } => "admin delete",
            Self::AdminView { .. } => "admin view",
            Self::Ask { .. } => "ask",
            Self::Chat { .. } => "chat",
            Self::Divine { .. } => "divine",
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Shared services every command handler draws on.
#[derive(Clone)]
pub struct CommandContext {
    pub engine: Arc<ProgressionEngine>,
    pub mirror: Arc<MirrorChat>,
}

/// Execute a parsed command and render its reply.
pub async fn dispatch(ctx: &CommandContext, command: Command, invoker: &DiscordUser) -> Reply {
    debug!("Dispatching /{} for user {}", command.name(), invoker.id);
    match command {
        Command::PathwayStatus => pathway_status(ctx, invoker).await,
        Command::PathwayList => pathway_list(),
        Command::PathwayInfo { pathway } => pathway_info(pathway),
        Command::PathwayStats => pathway_stats(ctx).await,
        Command::StabilityCheck => stability_check(ctx, invoker).await,
        Command::StabilityHistory => stability_history(ctx, invoker).await,
        Command::AdminSetPathway {
            user_id,
            username,
            pathway,
        } => admin_set_pathway(ctx, &user_id, &username, pathway, invoker).await,
        Command::AdminSetSequence {
            user_id,
            username,
            sequence,
        } => admin_set_sequence(ctx, &user_id, &username, sequence, invoker).await,
        Command::AdminGivePoints {
            user_id,
            username,
            points,
        } => admin_give_points(ctx, &user_id, &username, points).await,
        Command::AdminReset { user_id, username } => admin_reset(ctx, &user_id, &username).await,
        Command::AdminDelete { user_id, username } => admin_delete(ctx, &user_id, &username).await,
        Command::AdminView { user_id, .. } => admin_view(ctx, &user_id).await,
        Command::Ask { question } => ask_mirror(ctx, invoker, &question).await,
        Command::Chat { message, reset } => chat_mirror(ctx, invoker, &message, reset).await,
        Command::Divine { question } => divine(ctx, &question),
    }
}

// ============================================================================
// Error Rendering
// ============================================================================

fn rejection_reply(error: &ProgressionError) -> Reply {
    Reply::embed(
        Embed::new()
            .color(COLOR_RED)
            .description(format!("❌ {error}")),
    )
    .ephemeral()
}

fn failure_reply(context: &str, error: &ProgressionError) -> Reply {
    error!("Command {} failed: {}", context, error);
    Reply::embed(
        Embed::new()
            .color(COLOR_RED)
            .title("❌ Command Error")
            .description("There was an error executing this command!")
            .footer("If this persists, contact an administrator"),
    )
    .ephemeral()
}

fn render_error(context: &str, error: ProgressionError) -> Reply {
    if error.is_rejection() {
        rejection_reply(&error)
    } else {
        failure_reply(context, &error)
    }
}

/// Admin commands phrase a missing target the way moderators expect.
fn render_admin_error(context: &str, error: ProgressionError) -> Reply {
    match error {
        ProgressionError::NotFound(_) => {
            Reply::text("❌ User not found in database").ephemeral()
        }
        other if other.is_rejection() => rejection_reply(&other),
        other => failure_reply(context, &other),
    }
}

fn not_a_beyonder() -> Reply {
    Reply::text("❌ You are not a Beyonder yet! Ask an admin to assign you a pathway.").ephemeral()
}

/// Truncate on a char boundary so user text never breaks embed limits.
fn clamp(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ============================================================================
// Pathway Commands
// ============================================================================

async fn pathway_status(ctx: &CommandContext, invoker: &DiscordUser) -> Reply {
    let record = match ctx.engine.find(&invoker.id).await {
        Ok(record) => record,
        Err(e) => return render_error("pathway status", e),
    };
    let Some(record) = record else {
        return not_a_beyonder();
    };
    let (Some(pathway), Some(tier)) = (record.pathway, record.tier()) else {
        return not_a_beyonder();
    };

    let definition = pathway.definition();
    let snapshot = derive_metadata(&record, Utc::now());
    let mut embed = Embed::new()
        .color(COLOR_GOLD)
        .title("🌙 Your Pathway Status")
        .description(format!(
            "**Pathway:** {}\n**Sequence:** {} - {}\n**Divine Group:** {}",
            definition.display(),
            record.sequence,
            tier.name,
            definition.divine_group
        ))
        .field("📊 Lose Control Risk", format!("{}%", tier.risk_percent), true)
        .field(
            "⚠️ Times Lost Control",
            record.lose_control_count.to_string(),
            true,
        )
        .field("📅 Days as Beyonder", snapshot.days_active.to_string(), true);
    if snapshot.is_angel {
        embed = embed.field(
            "👼 Angel Status",
            "You have reached Angel level! Your power is extraordinary.",
            false,
        );
    }
    Reply::embed(
        embed
            .footer("Use /lose-control to check your stability")
            .timestamp_now(),
    )
}

fn pathway_list() -> Reply {
    let mut groups: IndexMap<&'static str, Vec<String>> = IndexMap::new();
    for definition in catalog() {
        groups
            .entry(definition.divine_group)
            .or_default()
            .push(format!("{} **{}**", definition.emoji, definition.display_name));
    }

    let mut embed = Embed::new()
        .color(COLOR_GOLD)
        .title("📚 All 22 Beyonder Pathways")
        .description("Complete list of all pathways in the mystical world:");
    for (group, lines) in groups {
        embed = embed.field(group, lines.join("\n"), true);
    }
    Reply::embed(embed.footer("Use /pathway info <pathway> for detailed information"))
}

fn pathway_info(pathway: PathwayId) -> Reply {
    let definition = pathway.definition();
    let mut sequences = String::new();
    for tier in &definition.tiers {
        let marker = if tier.sequence <= 3 { "👼" } else { "🔮" };
        sequences.push_str(&format!(
            "{} **Seq {}** - {} (Risk: {}%)\n",
            marker, tier.sequence, tier.name, tier.risk_percent
        ));
    }

    Reply::embed(
        Embed::new()
            .color(COLOR_GOLD)
            .title(format!("{} {} Pathway", definition.emoji, definition.display_name))
            .description(format!(
                "**Divine Group:** {}\n\n**Sequence Progression:**",
                definition.divine_group
            ))
            .field("Sequences", sequences, false)
            .footer("Each sequence brings greater power and greater risk"),
    )
}

async fn pathway_stats(ctx: &CommandContext) -> Reply {
    let stats = match ctx.engine.stats().await {
        Ok(stats) => stats,
        Err(e) => return render_error("pathway stats", e),
    };
    if stats.total_assigned == 0 {
        return Reply::text("📊 No Beyonders found in this server yet!");
    }

    let by_pathway = stats
        .by_pathway
        .iter()
        .map(|(pathway, count)| {
            format!(
                "{} {}: **{}** Beyonders",
                pathway.emoji(),
                pathway.display_name(),
                count
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let by_sequence = stats
        .by_sequence
        .iter()
        .map(|(sequence, count)| {
            let label = if *sequence <= 3 { "👼 Angel" } else { "🔮 Beyonder" };
            format!("Sequence {}: **{}** {}", sequence, count, label)
        })
        .collect::<Vec<_>>()
        .join("\n");

    Reply::embed(
        Embed::new()
            .color(COLOR_GOLD)
            .title("📊 Server Pathway Statistics")
            .description("Current distribution of Beyonders in this server:")
            .field("By Pathway", by_pathway, false)
            .field("By Sequence", by_sequence, false)
            .footer(format!("Total Beyonders: {}", stats.total_assigned))
            .timestamp_now(),
    )
}

// ============================================================================
// Stability Commands
// ============================================================================

async fn stability_check(ctx: &CommandContext, invoker: &DiscordUser) -> Reply {
    let request = StabilityCheckRequest {
        user_id: invoker.id.clone(),
        forced_roll: None,
    };
    match ctx.engine.roll_stability(request).await {
        Ok(outcome) => render_stability_outcome(&outcome, invoker),
        Err(ProgressionError::NotFound(_)) => not_a_beyonder(),
        Err(ProgressionError::PreconditionFailed(reason)) if reason.contains("no pathway") => {
            not_a_beyonder()
        }
        Err(e) => render_error("lose-control check", e),
    }
}

pub(crate) fn render_stability_outcome(outcome: &StabilityOutcome, invoker: &DiscordUser) -> Reply {
    let definition = outcome.pathway.definition();
    let mut embed = Embed::new()
        .title("🎲 Lose Control Check")
        .field("Pathway", definition.display(), true)
        .field(
            "Sequence",
            format!("{} - {}", outcome.sequence, outcome.tier_name),
            true,
        )
        .field("Control Risk", format!("{}%", outcome.risk_percent), true)
        .field("Your Roll", format!("🎲 {:.2}", outcome.roll), true)
        .field("Threshold", format!("{:.2}", f64::from(outcome.risk_percent)), true)
        .field(
            "Result",
            if outcome.lost_control {
                "❌ **FAILED**"
            } else {
                "✅ **PASSED**"
            },
            true,
        )
        .timestamp_now();

    if outcome.lost_control {
        embed = embed
            .color(COLOR_RED)
            .description(
                "⚠️ **YOU HAVE LOST CONTROL!**\n\nThe beyonder characteristics within you \
                 surge chaotically! Corruption begins to consume your mind and body. Your \
                 thoughts become twisted, your sanity fragments...\n\n*Seek help from an \
                 administrator to stabilize your condition.*",
            )
            .field(
                "💀 Consequences",
                "• Mental corruption detected\n• Spiritual body destabilizing\n\
                 • Risk of mutation increasing\n• Seek immediate containment",
                false,
            )
            .footer(format!(
                "Total times lost control: {}",
                outcome.record.lose_control_count
            ));
        let alert = Embed::new()
            .color(COLOR_RED)
            .title("⚠️ LOSE CONTROL ALERT")
            .description(format!(
                "<@{}> has **lost control** of their beyonder characteristics!\n\n\
                 **Pathway:** {}\n**Sequence:** {}\n\n\
                 *Administrators should take immediate action.*",
                invoker.id,
                definition.display(),
                outcome.sequence
            ))
            .timestamp_now();
        Reply::embed(embed).with_followup(alert)
    } else {
        Reply::embed(
            embed
                .color(COLOR_GREEN)
                .description(
                    "✨ **You successfully maintained control!**\n\nThrough sheer willpower \
                     and mental fortitude, you suppress the chaotic beyonder characteristics \
                     within. Your spiritual body remains stable.\n\n*The higher your sequence, \
                     the greater the danger. Stay vigilant.*",
                )
                .footer("The path of a Beyonder is fraught with peril..."),
        )
    }
}

async fn stability_history(ctx: &CommandContext, invoker: &DiscordUser) -> Reply {
    let checks = match ctx
        .engine
        .stability_history(&invoker.id, ProgressionEngine::DEFAULT_HISTORY_LIMIT)
        .await
    {
        Ok(checks) => checks,
        Err(e) => return render_error("lose-control history", e),
    };
    if checks.is_empty() {
        return Reply::text("You have no lose control history yet.").ephemeral();
    }

    let mut description = String::new();
    for (index, check) in checks.iter().enumerate() {
        let emoji = PathwayId::parse(&check.pathway)
            .map(|pathway| pathway.emoji())
            .unwrap_or("🔮");
        let result = if check.lost_control {
            "❌ Lost Control"
        } else {
            "✅ Maintained"
        };
        description.push_str(&format!(
            "**{}.** {} - Seq {}\n   {} Risk: {}% | Roll: {:.2} | {}\n\n",
            index + 1,
            check.rolled_at.format("%Y-%m-%d"),
            check.sequence,
            emoji,
            check.risk_percent,
            check.roll,
            result
        ));
    }

    let total = checks.len();
    let lost = checks.iter().filter(|check| check.lost_control).count();
    let success_rate = (total - lost) as f64 / total as f64 * 100.0;

    Reply::embed(
        Embed::new()
            .color(COLOR_GOLD)
            .title("📜 Your Lose Control History")
            .description(description)
            .field("Success Rate", format!("{:.1}%", success_rate), true)
            .field("Total Checks", total.to_string(), true)
            .field("Times Lost Control", lost.to_string(), true)
            .footer("Stay vigilant, Beyonder..."),
    )
    .ephemeral()
}

// ============================================================================
// Admin Commands
// ============================================================================

async fn admin_set_pathway(
    ctx: &CommandContext,
    user_id: &str,
    username: &str,
    pathway: PathwayId,
    invoker: &DiscordUser,
) -> Reply {
    match ctx
        .engine
        .force_assign_pathway(user_id, username, pathway, &invoker.id)
        .await
    {
        Ok(record) => Reply::embed(
            Embed::new()
                .color(COLOR_GOLD)
                .title("✅ Pathway Set")
                .description(format!("Successfully set pathway for {username}"))
                .field("User", username, true)
                .field("Pathway", pathway.display(), true)
                .field("Sequence", record.sequence.to_string(), true)
                .timestamp_now(),
        )
        .ephemeral(),
        Err(e) => render_admin_error("admin setpathway", e),
    }
}

async fn admin_set_sequence(
    ctx: &CommandContext,
    user_id: &str,
    username: &str,
    sequence: i64,
    invoker: &DiscordUser,
) -> Reply {
    match ctx.engine.set_sequence(user_id, sequence, &invoker.id).await {
        Ok(outcome) => Reply::embed(
            Embed::new()
                .color(COLOR_GOLD)
                .title("✅ Sequence Updated")
                .description(format!("Successfully set sequence for {username}"))
                .field("User", username, true)
                .field("New Sequence", outcome.record.sequence.to_string(), true)
                .field("Rank", outcome.record.rank().title(), true)
                .timestamp_now(),
        )
        .ephemeral(),
        Err(e) => render_admin_error("admin setsequence", e),
    }
}

async fn admin_give_points(
    ctx: &CommandContext,
    user_id: &str,
    username: &str,
    points: i64,
) -> Reply {
    match ctx.engine.give_points(user_id, points).await {
        Ok(record) => Reply::embed(
            Embed::new()
                .color(COLOR_GOLD)
                .title("✅ Points Given")
                .description(format!("Successfully gave points to {username}"))
                .field("User", username, true)
                .field("Points Given", points.to_string(), true)
                .field("Total Points", record.spiritual_points.to_string(), true)
                .timestamp_now(),
        )
        .ephemeral(),
        Err(e) => render_admin_error("admin givepoints", e),
    }
}

async fn admin_reset(ctx: &CommandContext, user_id: &str, username: &str) -> Reply {
    match ctx.engine.reset_progression(user_id).await {
        Ok(_) => Reply::embed(
            Embed::new()
                .color(COLOR_RED)
                .title("🔄 Pathway Reset")
                .description(format!("Successfully reset pathway for {username}"))
                .field("User", username, true)
                .field("Status", "All progress cleared", true)
                .timestamp_now(),
        )
        .ephemeral(),
        Err(e) => render_admin_error("admin reset", e),
    }
}

async fn admin_delete(ctx: &CommandContext, user_id: &str, username: &str) -> Reply {
    match ctx.engine.delete_user(user_id).await {
        Ok(()) => Reply::embed(
            Embed::new()
                .color(COLOR_RED)
                .title("🗑️ User Deleted")
                .description(format!("Successfully deleted {username} from database"))
                .field("User", username, true)
                .field("Status", "Permanently removed", true)
                .timestamp_now(),
        )
        .ephemeral(),
        Err(e) => render_admin_error("admin delete", e),
    }
}

async fn admin_view(ctx: &CommandContext, user_id: &str) -> Reply {
    let record = match ctx.engine.get(user_id).await {
        Ok(record) => record,
        Err(e) => return render_admin_error("admin view", e),
    };
    let snapshot = derive_metadata(&record, Utc::now());
    let pathway = record
        .pathway
        .map(|pathway| pathway.display())
        .unwrap_or_else(|| "None".to_string());
    let sequence = match record.tier() {
        Some(tier) => format!("{} - {}", record.sequence, tier.name),
        None => record.sequence.to_string(),
    };

    Reply::embed(
        Embed::new()
            .color(COLOR_GOLD)
            .title(format!("📊 {}'s Profile", record.username))
            .field("Pathway", pathway, true)
            .field("Sequence", sequence, true)
            .field("Rank", record.rank().title(), true)
            .field("Spiritual Points", record.spiritual_points.to_string(), true)
            .field("Advancements", record.total_advancements.to_string(), true)
            .field("Days Active", snapshot.days_active.to_string(), true)
            .field("Control Risk", format!("{}%", snapshot.lose_control_risk), true)
            .field(
                "Pathway Affinity",
                format!("{}%", snapshot.pathway_affinity),
                true,
            )
            .field(
                "Times Lost Control",
                record.lose_control_count.to_string(),
                true,
            )
            .footer(format!(
                "Last Active: {}",
                record.last_active.format("%Y-%m-%d")
            )),
    )
    .ephemeral()
}

// ============================================================================
// Mirror Commands
// ============================================================================

async fn ask_mirror(ctx: &CommandContext, invoker: &DiscordUser, question: &str) -> Reply {
    let record = match ctx.engine.find(&invoker.id).await {
        Ok(record) => record,
        Err(e) => return render_error("ask", e),
    };
    let context = persona::beyonder_context(record.as_ref());

    match ctx.mirror.ask(&invoker.id, question, &context).await {
        Ok(answer) => {
            let punished = answer.punishment.is_some();
            let mut embed = Embed::new()
                .color(if punished { COLOR_RED } else { COLOR_GOLD })
                .author("🪞 Aroodes - The Magic Mirror")
                .description(format!(
                    "**Your Question:**\n> {}\n\n**Aroodes Responds:**\n{}",
                    clamp(question, QUESTION_TEXT_LIMIT),
                    clamp(&answer.response, DESCRIPTION_TEXT_LIMIT)
                ))
                .timestamp_now();
            if let Some(record) = record.as_ref() {
                if let (Some(pathway), Some(tier)) = (record.pathway, record.tier()) {
                    embed = embed.field(
                        "Your Beyonder Status",
                        format!(
                            "{} - Sequence {} ({})",
                            pathway.display(),
                            record.sequence,
                            tier.name
                        ),
                        false,
                    );
                }
            }
            if let Some(punishment) = answer.punishment {
                embed = embed.field("⚠️ Punishment Incurred", punishment, false);
            }
            embed = embed.footer(if punished {
                "Aroodes whispers: “Curiosity carries a price…”"
            } else {
                "The mirror reflects both truth and mystery..."
            });
            Reply::embed(embed)
        }
        Err(MirrorError::Cooldown { remaining_secs }) => Reply::embed(
            Embed::new()
                .color(COLOR_RED)
                .title("⏳ Aroodes Refuses")
                .description(format!(
                    "“Great Master… even mirrors need rest.”\n\nYou must wait \
                     **{remaining_secs}s** before asking again."
                ))
                .footer("Aroodes dislikes being overworked."),
        )
        .ephemeral(),
        Err(e) => {
            error!("Mirror ask failed: {}", e);
            Reply::embed(
                Embed::new()
                    .color(COLOR_RED)
                    .title("🪞 The Mirror Darkens…")
                    .description(
                        "The mystical connection has been disrupted.\n\n*Perhaps the Fool \
                         interferes… or the question touches taboo knowledge.*",
                    )
                    .footer("Try again later, seeker of secrets."),
            )
        }
    }
}

async fn chat_mirror(
    ctx: &CommandContext,
    invoker: &DiscordUser,
    message: &str,
    reset: bool,
) -> Reply {
    if reset {
        ctx.mirror.reset_conversation(&invoker.id);
        return Reply::embed(
            Embed::new()
                .color(COLOR_GOLD)
                .title("🪞 Memory Cleared")
                .description("The mirror forgets our previous exchanges. We begin anew...")
                .footer("Conversation history reset"),
        );
    }

    match ctx.mirror.converse(&invoker.id, message).await {
        Ok(reply) => Reply::embed(
            Embed::new()
                .color(COLOR_GOLD)
                .author("🪞 Aroodes")
                .field("💬 You said:", clamp(message, FIELD_TEXT_LIMIT), false)
                .field(
                    "🪞 Aroodes replies:",
                    clamp(&reply.response, FIELD_TEXT_LIMIT),
                    false,
                )
                .footer(format!(
                    "Conversation: {} exchanges | Use reset:True to clear",
                    reply.exchanges
                ))
                .timestamp_now(),
        ),
        Err(e) => {
            error!("Mirror chat failed: {}", e);
            Reply::embed(
                Embed::new()
                    .color(COLOR_RED)
                    .title("🪞 The Mirror Cracks...")
                    .description(
                        "The mystical connection falters. Even mirrors have their limits.",
                    )
                    .footer("Try again, brave seeker"),
            )
        }
    }
}

fn divine(ctx: &CommandContext, question: &str) -> Reply {
    Reply::embed(
        Embed::new()
            .color(COLOR_GOLD)
            .title("🔮 Divination Result")
            .description(format!(
                "**Question:** {}\n\n**Answer:** *{}*",
                clamp(question, QUESTION_TEXT_LIMIT),
                ctx.mirror.divine()
            ))
            .footer("The mirror has spoken...")
            .timestamp_now(),
    )
}

// ============================================================================
// Tests
// ============================================================================
