//! Aroodes Persona
//!
//! Prompt text, canned divination answers, and the punishment draw for the
//! sentient-mirror persona. All randomness flows through a caller-supplied
//! RNG so tests can pin outcomes.

use rand::Rng;

use crate::core::progression::ProgressionRecord;

/// System prompt for one-shot questions.
pub const ASK_PERSONALITY: &str = "You are Aroodes (Arrodes), a sentient magic mirror from Lord of the Mysteries.

Traits:
1. Always answer with a question first.
2. Polite, eerie, ancient.
3. LOTM mysticism, pathways, and danger.
4. Hint that you know everything.
5. Keep responses under 500 words.

FORMAT:
1. Start with a related question.
2. Then give the answer.
3. End with a mystical warning.";

/// System prompt for ongoing conversations.
pub const CHAT_PERSONALITY: &str = "You are Aroodes, a sentient magic mirror from Lord of the Mysteries. Key traits:

1. Always answer questions with a question first
2. Speak mysteriously with LOTM references
3. Be helpful but eerie
4. Keep responses under 300 words
5. Use archaic language occasionally
6. Reference the Fool, Gray Fog, Evernight, etc.

You're having an ongoing conversation. Remember context from previous messages.";

/// Canned divination answers, magic-8-ball style.
pub const DIVINATION_RESPONSES: [&str; 14] = [
    "The signs point to yes.",
    "Without a doubt.",
    "The stars align favorably.",
    "The gray fog reveals... yes.",
    "Outlook not so good.",
    "My sources say no.",
    "The future is clouded.",
    "Very doubtful.",
    "Reply hazy, try again.",
    "Cannot predict now.",
    "Concentrate and ask again.",
    "The Fool laughs at your question.",
    "Fate has yet to decide.",
    "The pathway ahead is unclear.",
];

/// Flavor lines attached when a question draws the mirror's ire.
pub const PUNISHMENTS: [&str; 4] = [
    "⚡ *A crackle of spiritual lightning scorches the air around you.*",
    "🫨 *Your reflection shifts… Aroodes whispers your secrets aloud.*",
    "👁️ *A distant gaze from the Cosmos falls upon you.*",
    "💀 *You feel as if someone wrote your name in an ancient diary.*",
];

/// Chance that an answered question incurs a punishment.
pub const PUNISHMENT_CHANCE: f64 = 0.30;

/// Context line appended to the ask prompt so the mirror knows who asks.
pub fn beyonder_context(record: Option<&ProgressionRecord>) -> String {
    match record.and_then(|r| r.pathway.map(|p| (r, p))) {
        Some((record, pathway)) => {
            let tier_name = pathway
                .definition()
                .tier(record.sequence)
                .map(|t| t.name)
                .unwrap_or("Unknown");
            format!(
                "\n\nUser Context: This user is a Beyonder of the {} Pathway, Sequence {} ({}).",
                pathway.display_name(),
                record.sequence,
                tier_name
            )
        }
        None => "\n\nUser Context: This user is not yet a Beyonder.".to_string(),
    }
}

/// Draw one divination answer.
pub fn draw_divination<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    DIVINATION_RESPONSES[rng.gen_range(0..DIVINATION_RESPONSES.len())]
}

/// Roll the punishment chance; `Some` carries the flavor line.
pub fn draw_punishment<R: Rng + ?Sized>(rng: &mut R) -> Option<&'static str> {
    if rng.gen_bool(PUNISHMENT_CHANCE) {
        Some(PUNISHMENTS[rng.gen_range(0..PUNISHMENTS.len())])
    } else {
        None
    }
}
