use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value that was either matched against a known vocabulary `T`, or is an
/// unrecognized raw value `Raw`.
///
/// The game data grows new enum values faster than this crate does. Rather
/// than rejecting a record over a single unfamiliar name, the raw value is kept
/// so it can still be displayed and serialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Recognized<T, Raw = String> {
    Known(T),
    Unknown(Raw),
}

impl<T, Raw> Recognized<T, Raw> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Recognized::Known(t) => Some(t),
            Recognized::Unknown(_) => None,
        }
    }

    pub fn unknown(&self) -> Option<&Raw> {
        match self {
            Recognized::Known(_) => None,
            Recognized::Unknown(raw) => Some(raw),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Recognized::Known(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Recognized<U, Raw> {
        match self {
            Recognized::Known(t) => Recognized::Known(f(t)),
            Recognized::Unknown(raw) => Recognized::Unknown(raw),
        }
    }
}

impl<T, Raw> From<T> for Recognized<T, Raw> {
    fn from(value: T) -> Self {
        Recognized::Known(value)
    }
}

impl<T: fmt::Display, Raw: fmt::Display> fmt::Display for Recognized<T, Raw> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recognized::Known(t) => t.fmt(f),
            Recognized::Unknown(raw) => raw.fmt(f),
        }
    }
}

/// Vocabularies whose members are spelled as fixed strings in the game data.
pub trait ExternalName: Sized {
    fn from_external(name: &str) -> Option<Self>;
    fn external_name(&self) -> &'static str;
}

impl<T: ExternalName> Recognized<T, String> {
    pub fn from_external(name: &str) -> Self {
        T::from_external(name)
            .map(Recognized::Known)
            .unwrap_or_else(|| Recognized::Unknown(name.to_string()))
    }

    /// The spelling used by the game data, whether or not it was recognized.
    pub fn external_name(&self) -> &str {
        match self {
            Recognized::Known(t) => t.external_name(),
            Recognized::Unknown(raw) => raw.as_str(),
        }
    }
}

impl<T: ExternalName> Serialize for Recognized<T, String> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.external_name())
    }
}

impl<'de, T: ExternalName> Deserialize<'de> for Recognized<T, String> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Recognized::from_external(&name))
    }
}
