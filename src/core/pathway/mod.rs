//! Pathway Reference Data
//!
//! The 22 Beyonder pathways, each with a ten-tier sequence ladder running
//! from sequence 9 (newly potioned) down to sequence 0 (True God). Pure
//! lookup data: loaded once, never mutated.

pub mod catalog;

pub use catalog::catalog;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest (strongest, terminal) sequence on any pathway.
pub const MIN_SEQUENCE: i64 = 0;

/// Highest (weakest, starting) sequence on any pathway.
pub const MAX_SEQUENCE: i64 = 9;

/// Identifier for one of the 22 pathways.
///
/// The wire and storage form is the stable lowercase key returned by
/// [`PathwayId::as_str`] (e.g. `wheel_of_fortune`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathwayId {
    Fool,
    Error,
    Door,
    Visionary,
    Sun,
    Tyrant,
    WhiteTower,
    HangedMan,
    Darkness,
    Death,
    TwilightGiant,
    Demoness,
    RedPriest,
    Moon,
    Mother,
    Abyss,
    Chained,
    Justiciar,
    Paragon,
    BlackEmperor,
    Hermit,
    WheelOfFortune,
}

impl PathwayId {
    /// All pathways in canonical catalog order.
    pub const ALL: [PathwayId; 22] = [
        PathwayId::Fool,
        PathwayId::Error,
        PathwayId::Door,
        PathwayId::Visionary,
        PathwayId::Sun,
        PathwayId::Tyrant,
        PathwayId::WhiteTower,
        PathwayId::HangedMan,
        PathwayId::Darkness,
        PathwayId::Death,
        PathwayId::TwilightGiant,
        PathwayId::Demoness,
        PathwayId::RedPriest,
        PathwayId::Moon,
        PathwayId::Mother,
        PathwayId::Abyss,
        PathwayId::Chained,
        PathwayId::Justiciar,
        PathwayId::Paragon,
        PathwayId::BlackEmperor,
        PathwayId::Hermit,
        PathwayId::WheelOfFortune,
    ];

    /// Stable lowercase key used in storage, metadata payloads, and
    /// command option values.
    pub fn as_str(&self) -> &'static str {
        match self {
            PathwayId::Fool => "fool",
            PathwayId::Error => "error",
            PathwayId::Door => "door",
            PathwayId::Visionary => "visionary",
            PathwayId::Sun => "sun",
            PathwayId::Tyrant => "tyrant",
            PathwayId::WhiteTower => "white_tower",
            PathwayId::HangedMan => "hanged_man",
            PathwayId::Darkness => "darkness",
            PathwayId::Death => "death",
            PathwayId::TwilightGiant => "twilight_giant",
            PathwayId::Demoness => "demoness",
            PathwayId::RedPriest => "red_priest",
            PathwayId::Moon => "moon",
            PathwayId::Mother => "mother",
            PathwayId::Abyss => "abyss",
            PathwayId::Chained => "chained",
            PathwayId::Justiciar => "justiciar",
            PathwayId::Paragon => "paragon",
            PathwayId::BlackEmperor => "black_emperor",
            PathwayId::Hermit => "hermit",
            PathwayId::WheelOfFortune => "wheel_of_fortune",
        }
    }

    /// Case-insensitive parse of a pathway key.
    ///
    /// Spaces and hyphens are treated as underscores, so `"White Tower"`,
    /// `"white-tower"`, and `"WHITE_TOWER"` all resolve to
    /// [`PathwayId::WhiteTower`]. Unknown keys return `None`; callers at
    /// the command/API boundary reject them before any domain operation.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        catalog::by_key(&normalized)
    }

    /// The full catalog entry for this pathway.
    pub fn definition(self) -> &'static PathwayDefinition {
        // CATALOG is declared in enum order; the alignment is test-covered.
        &catalog()[self as usize]
    }

    pub fn display_name(&self) -> &'static str {
        self.definition().display_name
    }

    pub fn emoji(&self) -> &'static str {
        self.definition().emoji
    }

    pub fn divine_group(&self) -> &'static str {
        self.definition().divine_group
    }

    /// Emoji-prefixed name for embeds, e.g. `🃏 Fool`.
    pub fn display(&self) -> String {
        format!("{} {}", self.emoji(), self.display_name())
    }
}

impl fmt::Display for PathwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tier on a pathway's sequence ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDefinition {
    /// Sequence number in [0, 9].
    pub sequence: i64,
    /// Tier title, e.g. "Seer".
    pub name: &'static str,
    /// Lose-control risk in [0, 100]. Sequence 0 is always 0.
    pub risk_percent: u8,
}

/// Immutable catalog entry for one pathway.
#[derive(Debug, Clone, Copy)]
pub struct PathwayDefinition {
    pub id: PathwayId,
    pub display_name: &'static str,
    pub emoji: &'static str,
    pub divine_group: &'static str,
    /// Exactly ten tiers, ordered sequence 9 down to 0.
    pub tiers: [TierDefinition; 10],
}

impl PathwayDefinition {
    /// Look up the tier for a sequence number. Fails closed on anything
    /// outside [0, 9].
    pub fn tier(&self, sequence: i64) -> Option<&TierDefinition> {
        self.tiers.iter().find(|t| t.sequence == sequence)
    }

    /// Emoji-prefixed name for embeds.
    pub fn display(&self) -> String {
        format!("{} {}", self.emoji, self.display_name)
    }
}
