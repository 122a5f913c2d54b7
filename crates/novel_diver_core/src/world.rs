//! Built-in story worlds.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// A narrative setting with its own tone and default description.
///
/// Identifiers are the snake_case names (`cultivation`, `martial_arts`,
/// `fantasy`, `sci_fi`, `modern_urban`).
///
/// # Examples
///
/// ```
/// use novel_diver_core::World;
///
/// assert_eq!(World::resolve("martial_arts"), World::MartialArts);
/// assert_eq!(World::resolve("steampunk"), World::Fantasy);
/// assert_eq!(World::SciFi.as_ref(), "sci_fi");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum World {
    /// Spiritual cultivation towards immortality
    Cultivation,
    /// Wandering martial artists and sects
    MartialArts,
    /// Wizards, dragons, and epic quests
    #[default]
    Fantasy,
    /// Advanced technology and space exploration
    SciFi,
    /// A modern city with hidden supernatural elements
    ModernUrban,
}

impl World {
    /// Look up a world by identifier, falling back to [`World::Fantasy`].
    pub fn resolve(id: &str) -> Self {
        id.trim().parse().unwrap_or_default()
    }

    /// Whether the identifier names a built-in world.
    pub fn is_known(id: &str) -> bool {
        id.trim().parse::<Self>().is_ok()
    }

    /// All built-in worlds in presentation order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Name shown to players.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cultivation => "Cultivation",
            Self::MartialArts => "Martial Arts",
            Self::Fantasy => "Fantasy",
            Self::SciFi => "Sci-Fi",
            Self::ModernUrban => "Modern Urban",
        }
    }

    /// Built-in description used when no template is stored for the world.
    pub fn default_description(&self) -> &'static str {
        match self {
            Self::Cultivation => {
                "A mystical world where people cultivate spiritual energy to gain power and transcend mortality."
            }
            Self::MartialArts => {
                "A world of martial artists, honor duels, and ancient fighting techniques."
            }
            Self::Fantasy => "A magical realm with wizards, dragons, and epic quests.",
            Self::SciFi => "A futuristic universe with advanced technology and space exploration.",
            Self::ModernUrban => "A modern city setting with hidden supernatural elements.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip() {
        for world in World::all() {
            assert_eq!(World::resolve(world.as_ref()), world);
            assert!(World::is_known(&world.to_string()));
        }
        assert_eq!(World::all().count(), 5);
    }

    #[test]
    fn unknown_identifiers_fall_back_to_fantasy() {
        assert_eq!(World::resolve(""), World::Fantasy);
        assert_eq!(World::resolve("noir"), World::Fantasy);
        assert!(!World::is_known("noir"));
    }
}
