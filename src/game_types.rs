//! Identifier and value types shared by every stage of the asset pipeline.

use std::fmt;
use std::io::Cursor;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

/// Seed used for hashing item class names into their public ids.
pub const ITEM_ID_SEED: u32 = 0x3141_5926;

// =============================================================================
// Identity Types
// =============================================================================

/// Hero identifier, taken verbatim from the hero record's `m_HeroID`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeroId(u32);

impl HeroId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for HeroId {
    fn from(v: u32) -> Self {
        HeroId(v)
    }
}

/// Item identifier. Items carry no numeric id in the game data, so it is
/// derived from the class name with 32-bit murmur3.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn from_class_name(class_name: &str) -> std::io::Result<ItemId> {
        murmur3::murmur3_32(&mut Cursor::new(class_name.as_bytes()), ITEM_ID_SEED).map(ItemId)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ItemId {
    fn from(v: u32) -> Self {
        ItemId(v)
    }
}

// =============================================================================
// Values
// =============================================================================

/// An RGB color as stored in hero records (`m_colorUI` and friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub fn red(self) -> u8 {
        self.0[0]
    }

    pub fn green(self) -> u8 {
        self.0[1]
    }

    pub fn blue(self) -> u8 {
        self.0[2]
    }
}

/// Languages the game ships localization files for. The lowercase name
/// doubles as the suffix of the localization file names.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Brazilian,
    Czech,
    #[default]
    English,
    French,
    German,
    Indonesian,
    Italian,
    Japanese,
    Koreana,
    Latam,
    Polish,
    Russian,
    Schinese,
    Spanish,
    Tchinese,
    Thai,
    Turkish,
    Ukrainian,
}

impl Language {
    pub const ALL: &[Language] = &[
        Self::Brazilian,
        Self::Czech,
        Self::English,
        Self::French,
        Self::German,
        Self::Indonesian,
        Self::Italian,
        Self::Japanese,
        Self::Koreana,
        Self::Latam,
        Self::Polish,
        Self::Russian,
        Self::Schinese,
        Self::Spanish,
        Self::Tchinese,
        Self::Thai,
        Self::Turkish,
        Self::Ukrainian,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Brazilian => "brazilian",
            Self::Czech => "czech",
            Self::English => "english",
            Self::French => "french",
            Self::German => "german",
            Self::Indonesian => "indonesian",
            Self::Italian => "italian",
            Self::Japanese => "japanese",
            Self::Koreana => "koreana",
            Self::Latam => "latam",
            Self::Polish => "polish",
            Self::Russian => "russian",
            Self::Schinese => "schinese",
            Self::Spanish => "spanish",
            Self::Tchinese => "tchinese",
            Self::Thai => "thai",
            Self::Turkish => "turkish",
            Self::Ukrainian => "ukrainian",
        }
    }

    /// Accepts the file-suffix spelling in any casing ("German", "SChinese", "german").
    pub fn from_name(name: &str) -> Option<Self> {
        let flat = name.trim().to_case(Case::Flat);
        Self::ALL.iter().copied().find(|lang| lang.name() == flat)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_name(s).ok_or_else(|| format!("unknown language: {s}"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn language_names_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_name(lang.name()), Some(*lang));
        }
        assert_eq!(Language::from_name("German"), Some(Language::German));
        assert_eq!(Language::from_name("SChinese"), Some(Language::Schinese));
        assert_eq!(Language::from_name("klingon"), None);
    }

    #[test]
    fn item_ids_are_stable_per_class_name() {
        let a = ItemId::from_class_name("upgrade_sprint_booster").unwrap();
        let b = ItemId::from_class_name("upgrade_sprint_booster").unwrap();
        let c = ItemId::from_class_name("upgrade_ammo_scavenger").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_string(&HeroId::from(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&Color([255, 0, 12])).unwrap(),
            "[255,0,12]"
        );
    }
}
