//! Static Pathway Catalog
//!
//! All 22 pathway definitions with their full sequence ladders. Each ladder
//! runs sequence 9 down to 0; the sequence-0 tier shares the pathway's name
//! and always carries zero risk.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{PathwayDefinition, PathwayId, TierDefinition};

const fn tier(sequence: i64, name: &'static str, risk_percent: u8) -> TierDefinition {
    TierDefinition {
        sequence,
        name,
        risk_percent,
    }
}

/// The full pathway catalog in canonical order.
pub fn catalog() -> &'static [PathwayDefinition; 22] {
    &CATALOG
}

static BY_KEY: Lazy<HashMap<&'static str, PathwayId>> =
    Lazy::new(|| PathwayId::ALL.iter().map(|id| (id.as_str(), *id)).collect());

/// Resolve a normalized lowercase key to a pathway id.
pub(super) fn by_key(key: &str) -> Option<PathwayId> {
    BY_KEY.get(key).copied()
}

// Declared in PathwayId::ALL order; PathwayId::definition indexes by
// discriminant.
static CATALOG: [PathwayDefinition; 22] = [
    PathwayDefinition {
        id: PathwayId::Fool,
        display_name: "Fool",
        emoji: "🃏",
        divine_group: "The Fool",
        tiers: [
            tier(9, "Seer", 5),
            tier(8, "Clown", 8),
            tier(7, "Magician", 12),
            tier(6, "Faceless", 15),
            tier(5, "Marionettist", 20),
            tier(4, "Bizarro Sorcerer", 25),
            tier(3, "Scholar of Yore", 30),
            tier(2, "Miracle Invoker", 40),
            tier(1, "Attendant of Mysteries", 50),
            tier(0, "Fool", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Error,
        display_name: "Error",
        emoji: "⚡",
        divine_group: "The Fool",
        tiers: [
            tier(9, "Savant", 8),
            tier(8, "Archaeologist", 12),
            tier(7, "Appraiser", 15),
            tier(6, "Wind-blessed", 20),
            tier(5, "Astromancer", 25),
            tier(4, "Mysticologist", 30),
            tier(3, "Clairvoyant", 35),
            tier(2, "Prophet", 45),
            tier(1, "Soothsayer", 55),
            tier(0, "Error", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Door,
        display_name: "Door",
        emoji: "🚪",
        divine_group: "The Fool",
        tiers: [
            tier(9, "Apprentice", 7),
            tier(8, "Trickmaster", 10),
            tier(7, "Scribe", 15),
            tier(6, "Traveler", 25),
            tier(5, "Secrets Sorcerer", 35),
            tier(4, "Mystic", 40),
            tier(3, "Wanderer", 50),
            tier(2, "Planeswalker", 60),
            tier(1, "Key of Stars", 70),
            tier(0, "Door", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Visionary,
        display_name: "Visionary",
        emoji: "👁️",
        divine_group: "The Fool",
        tiers: [
            tier(9, "Spectator", 10),
            tier(8, "Telepathist", 15),
            tier(7, "Psyche Analyst", 20),
            tier(6, "Dreamwalker", 30),
            tier(5, "Dream Stealer", 40),
            tier(4, "Manipulator", 50),
            tier(3, "Discerner", 60),
            tier(2, "Author", 70),
            tier(1, "Omniscient Eye", 80),
            tier(0, "Visionary", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Sun,
        display_name: "Sun",
        emoji: "☀️",
        divine_group: "Eternal Blazing Sun",
        tiers: [
            tier(9, "Bard", 3),
            tier(8, "Notary", 5),
            tier(7, "Solar High Priest", 8),
            tier(6, "Professor of Enlightenment", 10),
            tier(5, "Priest of Light", 15),
            tier(4, "Unshadowed", 20),
            tier(3, "Justice Mentor", 25),
            tier(2, "Lightker", 35),
            tier(1, "Hand of God", 45),
            tier(0, "Sun", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Tyrant,
        display_name: "Tyrant",
        emoji: "⚔️",
        divine_group: "Lord of Storms",
        tiers: [
            tier(9, "Sailor", 6),
            tier(8, "Folk of Rage", 12),
            tier(7, "Seafarer", 18),
            tier(6, "Wind-blessed", 22),
            tier(5, "Ocean Songster", 28),
            tier(4, "Cataclysmic Interrer", 35),
            tier(3, "Sea King", 42),
            tier(2, "Calamity of Destruction", 50),
            tier(1, "Thunder God", 60),
            tier(0, "Tyrant", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::WhiteTower,
        display_name: "White Tower",
        emoji: "🗼",
        divine_group: "God of Knowledge",
        tiers: [
            tier(9, "Savant", 5),
            tier(8, "Archaeologist", 8),
            tier(7, "Appraiser", 12),
            tier(6, "Polymath", 16),
            tier(5, "Astromancer", 20),
            tier(4, "Philosopher", 25),
            tier(3, "Sage", 32),
            tier(2, "Omniscient", 40),
            tier(1, "Eye of Wisdom", 50),
            tier(0, "White Tower", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::HangedMan,
        display_name: "Hanged Man",
        emoji: "🎣",
        divine_group: "Lord of Storms",
        tiers: [
            tier(9, "Secrets Supplicant", 6),
            tier(8, "Listener", 10),
            tier(7, "Spirit Guide", 14),
            tier(6, "Seafarer", 18),
            tier(5, "Druid", 24),
            tier(4, "Spirit Walker", 30),
            tier(3, "Sea God", 38),
            tier(2, "Weather Warlock", 45),
            tier(1, "Tyrant", 55),
            tier(0, "Hanged Man", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Darkness,
        display_name: "Darkness",
        emoji: "🌑",
        divine_group: "Evernight Goddess",
        tiers: [
            tier(9, "Sleepless", 4),
            tier(8, "Midnight Poet", 7),
            tier(7, "Nightmare", 10),
            tier(6, "Requiem", 14),
            tier(5, "Gatekeeper", 18),
            tier(4, "Soul Assurer", 24),
            tier(3, "Ferryman", 30),
            tier(2, "Pale Emperor", 38),
            tier(1, "Prince of Concealment", 48),
            tier(0, "Darkness", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Death,
        display_name: "Death",
        emoji: "💀",
        divine_group: "Death",
        tiers: [
            tier(9, "Corpse Collector", 8),
            tier(8, "Gravedigger", 14),
            tier(7, "Spirit Medium", 20),
            tier(6, "Shaman", 28),
            tier(5, "Gatekeeper", 36),
            tier(4, "Undying", 45),
            tier(3, "Ferryman", 55),
            tier(2, "Death Consul", 65),
            tier(1, "Pale Emperor", 75),
            tier(0, "Death", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::TwilightGiant,
        display_name: "Twilight Giant",
        emoji: "⚒️",
        divine_group: "God of Combat",
        tiers: [
            tier(9, "Warrior", 5),
            tier(8, "Pugilist", 8),
            tier(7, "Weapon Master", 12),
            tier(6, "Dawn Paladin", 16),
            tier(5, "Guardian", 22),
            tier(4, "Conqueror", 28),
            tier(3, "Berserker", 36),
            tier(2, "Iron-blooded Knight", 44),
            tier(1, "Primordial Hunger", 54),
            tier(0, "Twilight Giant", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Demoness,
        display_name: "Demoness",
        emoji: "💃",
        divine_group: "Primordial Demoness",
        tiers: [
            tier(9, "Assassin", 7),
            tier(8, "Instigator", 12),
            tier(7, "Witch", 18),
            tier(6, "Pleasure", 26),
            tier(5, "Afflictions", 34),
            tier(4, "Despair", 42),
            tier(3, "Unaging", 52),
            tier(2, "Demoness of Catastrophe", 62),
            tier(1, "Apocalypse", 72),
            tier(0, "Demoness", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::RedPriest,
        display_name: "Red Priest",
        emoji: "🔥",
        divine_group: "God of War",
        tiers: [
            tier(9, "Hunter", 6),
            tier(8, "Provocateur", 11),
            tier(7, "Pyromaniac", 16),
            tier(6, "Conspirator", 22),
            tier(5, "Reaper", 28),
            tier(4, "Iron-blooded Knight", 35),
            tier(3, "War Bishop", 43),
            tier(2, "Conqueror", 52),
            tier(1, "Red Angel", 62),
            tier(0, "Red Priest", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Moon,
        display_name: "Moon",
        emoji: "🌙",
        divine_group: "Mother Goddess",
        tiers: [
            tier(9, "Apothecary", 5),
            tier(8, "Beast Tamer", 9),
            tier(7, "Vampire", 14),
            tier(6, "Potions Professor", 19),
            tier(5, "Scarlet Scholar", 25),
            tier(4, "Shaman King", 32),
            tier(3, "Ferryman", 40),
            tier(2, "Zombie", 48),
            tier(1, "Beauty Goddess", 58),
            tier(0, "Moon", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Mother,
        display_name: "Mother",
        emoji: "🌾",
        divine_group: "Mother Goddess",
        tiers: [
            tier(9, "Planter", 4),
            tier(8, "Biologist", 7),
            tier(7, "Harvester", 11),
            tier(6, "Herbalist", 15),
            tier(5, "Druid", 20),
            tier(4, "Shaman King", 26),
            tier(3, "Ancient Alchemist", 33),
            tier(2, "Fecundity", 42),
            tier(1, "Nature Walker", 52),
            tier(0, "Mother", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Abyss,
        display_name: "Abyss",
        emoji: "🕳️",
        divine_group: "Chained God",
        tiers: [
            tier(9, "Criminal", 10),
            tier(8, "Madman", 18),
            tier(7, "Serial Killer", 26),
            tier(6, "Devil", 35),
            tier(5, "Desire Apostle", 45),
            tier(4, "Torture", 55),
            tier(3, "Silent Disciple", 65),
            tier(2, "Demon of Knowledge", 75),
            tier(1, "Dark Angel", 85),
            tier(0, "Abyss", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Chained,
        display_name: "Chained",
        emoji: "⛓️",
        divine_group: "Chained God",
        tiers: [
            tier(9, "Prisoner", 8),
            tier(8, "Lunatic", 15),
            tier(7, "Werewolf", 23),
            tier(6, "Living Corpse", 32),
            tier(5, "Wraith", 41),
            tier(4, "Zombie", 51),
            tier(3, "Reaper", 61),
            tier(2, "Pale Emperor", 71),
            tier(1, "Dark Side of the Universe", 81),
            tier(0, "Chained", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Justiciar,
        display_name: "Justiciar",
        emoji: "⚖️",
        divine_group: "Eternal Blazing Sun",
        tiers: [
            tier(9, "Arbiter", 3),
            tier(8, "Sheriff", 6),
            tier(7, "Interrogator", 9),
            tier(6, "Judge", 13),
            tier(5, "Disciplinary Paladin", 17),
            tier(4, "Imperative Mage", 23),
            tier(3, "Chaos Hunter", 30),
            tier(2, "Balance", 38),
            tier(1, "Adjudicator", 48),
            tier(0, "Justiciar", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Paragon,
        display_name: "Paragon",
        emoji: "🛡️",
        divine_group: "God of Steam",
        tiers: [
            tier(9, "Generalist", 4),
            tier(8, "Polymath", 7),
            tier(7, "Artisan", 10),
            tier(6, "Alchemist", 14),
            tier(5, "Artisan", 18),
            tier(4, "Arcanist", 24),
            tier(3, "Arcane Scholar", 31),
            tier(2, "Master of Mysteries", 39),
            tier(1, "Omniscient", 49),
            tier(0, "Paragon", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::BlackEmperor,
        display_name: "Black Emperor",
        emoji: "👑",
        divine_group: "Black Emperor",
        tiers: [
            tier(9, "Lawyer", 6),
            tier(8, "Barbarian", 11),
            tier(7, "Briber", 17),
            tier(6, "Baron of Corruption", 24),
            tier(5, "Mentor of Disorder", 31),
            tier(4, "Earl of the Fallen", 39),
            tier(3, "Duke of Entropy", 47),
            tier(2, "Prince of Abolition", 57),
            tier(1, "Emperor of Rules", 67),
            tier(0, "Black Emperor", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::Hermit,
        display_name: "Hermit",
        emoji: "📚",
        divine_group: "Hidden Sage",
        tiers: [
            tier(9, "Secrets Supplicant", 9),
            tier(8, "Melee Scholar", 16),
            tier(7, "Warlock", 24),
            tier(6, "Scrolls Professor", 33),
            tier(5, "Mysticologist", 42),
            tier(4, "Sage", 52),
            tier(3, "Soothsayer", 62),
            tier(2, "Clairvoyant", 72),
            tier(1, "Knowledge Emperor", 82),
            tier(0, "Hermit", 0),
        ],
    },
    PathwayDefinition {
        id: PathwayId::WheelOfFortune,
        display_name: "Wheel of Fortune",
        emoji: "🎰",
        divine_group: "Antigonus",
        tiers: [
            tier(9, "Monster", 7),
            tier(8, "Lucky One", 13),
            tier(7, "Winner", 19),
            tier(6, "Calamity Priest", 26),
            tier(5, "Dreamwalker", 34),
            tier(4, "Fate Mentor", 42),
            tier(3, "Chaos Hunter", 51),
            tier(2, "Prophet", 61),
            tier(1, "Soothsayer", 71),
            tier(0, "Wheel of Fortune", 0),
        ],
    },
];
