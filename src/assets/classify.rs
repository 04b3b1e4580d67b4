//! Decides which kind of record an item class name describes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::recognized::Recognized;

use super::keys;

/// Short names of every hero whose signature abilities are exported without an
/// `ability_` prefix (e.g. `astro_shotgun`).
pub const HERO_SHORT_NAMES: &[&str] = &[
    "astro",
    "atlas",
    "bebop",
    "bomber",
    "cadence",
    "chrono",
    "dynamo",
    "forge",
    "ghost",
    "gigawatt",
    "gunslinger",
    "haze",
    "hornet",
    "inferno",
    "kali",
    "kelvin",
    "krill",
    "lash",
    "mirage",
    "nano",
    "orion",
    "rutger",
    "shiv",
    "slork",
    "synth",
    "tengu",
    "thumper",
    "tokamak",
    "viscous",
    "warden",
    "wraith",
    "wrecker",
    "yakuza",
    "yamato",
];

/// The four entity kinds the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Hero,
    Ability,
    Weapon,
    Upgrade,
}

impl Kind {
    pub const ALL: &[Kind] = &[Self::Hero, Self::Ability, Self::Weapon, Self::Upgrade];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Ability => "ability",
            Self::Weapon => "weapon",
            Self::Upgrade => "upgrade",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification of an item record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemClass {
    Ability,
    Upgrade,
    Weapon,
    /// An ability whose class name starts with the short name of its hero.
    HeroAbility(String),
}

impl ItemClass {
    pub fn kind(&self) -> Kind {
        match self {
            ItemClass::Ability | ItemClass::HeroAbility(_) => Kind::Ability,
            ItemClass::Upgrade => Kind::Upgrade,
            ItemClass::Weapon => Kind::Weapon,
        }
    }

    /// The short name of the hero embedded in the class name, if any.
    pub fn hero_short_name(&self) -> Option<&str> {
        match self {
            ItemClass::HeroAbility(short_name) => Some(short_name),
            _ => None,
        }
    }
}

/// Lower-cases the class name, strips `citadel_` and looks at the first
/// `_`-separated word. Unclassifiable names come back as `Unknown` carrying the
/// original class name.
pub fn classify_item(class_name: &str) -> Recognized<ItemClass> {
    let lowered = class_name.to_lowercase();
    let name = lowered
        .strip_prefix(keys::CITADEL_PREFIX)
        .unwrap_or(&lowered);
    let first_word = name
        .split(keys::CLASS_SEPARATOR)
        .next()
        .unwrap_or_default();

    match first_word {
        "ability" => Recognized::Known(ItemClass::Ability),
        "upgrade" => Recognized::Known(ItemClass::Upgrade),
        "weapon" => Recognized::Known(ItemClass::Weapon),
        hero if HERO_SHORT_NAMES.contains(&hero) => {
            Recognized::Known(ItemClass::HeroAbility(hero.to_string()))
        }
        _ => Recognized::Unknown(class_name.to_string()),
    }
}

/// `hero_astro` -> `astro`. Names without the prefix are returned unchanged.
pub fn hero_short_name(hero_class_name: &str) -> &str {
    hero_class_name
        .strip_prefix(keys::HERO_PREFIX)
        .unwrap_or(hero_class_name)
}
