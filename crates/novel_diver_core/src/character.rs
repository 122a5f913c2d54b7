//! The story protagonist.

use derive_getters::Getters;
use novel_diver_error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

const NAME_LIMITS: (usize, usize) = (2, 100);
const BACKGROUND_LIMITS: (usize, usize) = (10, 1000);
const GOALS_LIMITS: (usize, usize) = (10, 500);

/// Protagonist profile created once at story start.
///
/// Fields are read-only after construction. Continuations only have the name
/// and world available (see [`Character::stand_in`]).
///
/// # Examples
///
/// ```
/// use novel_diver_core::Character;
///
/// let hero = Character::new(
///     "Aria Nightwhisper",
///     "A half-elf apprentice who found an ancient spellbook.",
///     vec!["Curious".to_string(), "Brave".to_string()],
///     "Master the ancient magic before the dragon lord returns.",
///     "fantasy",
/// );
/// assert!(hero.validate().is_ok());
/// assert!(hero.to_prompt().contains("Aria Nightwhisper"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Character {
    /// Character's name
    name: String,
    /// Backstory and origin
    background: String,
    /// Personality traits and characteristics
    traits: Vec<String>,
    /// Main objectives and motivations
    goals: String,
    /// World identifier the character belongs to
    world: String,
}

impl Character {
    /// Create a character profile.
    pub fn new(
        name: impl Into<String>,
        background: impl Into<String>,
        traits: Vec<String>,
        goals: impl Into<String>,
        world: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            background: background.into(),
            traits,
            goals: goals.into(),
            world: world.into(),
        }
    }

    /// Stripped-down profile re-derived from a story history.
    ///
    /// Background, traits and goals are not persisted per chunk, so they are
    /// left empty and render as placeholders in prompts.
    pub fn stand_in(name: impl Into<String>, world: impl Into<String>) -> Self {
        Self::new(name, String::new(), Vec::new(), String::new(), world)
    }

    /// Check every profile rule and report all the ones that fail.
    ///
    /// Minimum lengths apply to the trimmed text, maximums to the raw text.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.name.trim().chars().count() < NAME_LIMITS.0 {
            issues.push("Name must be at least 2 characters long".to_string());
        }
        if self.background.trim().chars().count() < BACKGROUND_LIMITS.0 {
            issues.push("Background must be at least 10 characters long".to_string());
        }
        if self.goals.trim().chars().count() < GOALS_LIMITS.0 {
            issues.push("Goals must be at least 10 characters long".to_string());
        }
        if self.world.trim().is_empty() {
            issues.push("World must be specified".to_string());
        }

        if self.name.chars().count() > NAME_LIMITS.1 {
            issues.push("Name is too long (max 100 characters)".to_string());
        }
        if self.background.chars().count() > BACKGROUND_LIMITS.1 {
            issues.push("Background is too long (max 1000 characters)".to_string());
        }
        if self.goals.chars().count() > GOALS_LIMITS.1 {
            issues.push("Goals are too long (max 500 characters)".to_string());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// Render the profile as a labeled prompt block.
    pub fn to_prompt(&self) -> String {
        let traits = if self.traits.is_empty() {
            "No specific traits defined".to_string()
        } else {
            self.traits.join(", ")
        };

        format!(
            "PROTAGONIST PROFILE:\n\
             Name: {}\n\
             World: {}\n\
             Background: {}\n\
             Personality Traits: {}\n\
             Goals & Motivations: {}\n\
             \n\
             This character is the protagonist of the story. All narrative should be written \
             from their perspective or about their actions and decisions.",
            self.name,
            self.world,
            placeholder(&self.background, "Unknown"),
            traits,
            placeholder(&self.goals, "Unknown"),
        )
    }

    /// Prebuilt protagonist for a world; anything unrecognised gets the fantasy sample.
    pub fn create_sample(world: &str) -> Self {
        match world {
            "cultivation" => Self::new(
                "Li Wei",
                "A young orphan discovered to have rare spiritual roots, taken in by the Azure \
                 Mountain Sect after showing promise in cultivation.",
                owned(&["Determined", "Humble", "Quick-learner", "Loyal"]),
                "To avenge his deceased master and reach the peak of cultivation to protect \
                 those he cares about.",
                "cultivation",
            ),
            "martial_arts" => Self::new(
                "Chen Ming",
                "The last surviving student of the destroyed Iron Fist School, wandering the \
                 jianghu to restore his school's honor.",
                owned(&["Honorable", "Skilled fighter", "Seeking justice", "Stubborn"]),
                "To find and defeat the masked warriors who destroyed his school and master.",
                "martial_arts",
            ),
            _ => Self::new(
                "Aria Nightwhisper",
                "A half-elf mage apprentice who discovered an ancient spellbook in her \
                 village's ruins after a dragon attack.",
                owned(&["Curious", "Brave", "Magically gifted", "Compassionate"]),
                "To master the ancient magic and prevent the return of the dark dragon lord.",
                "fantasy",
            ),
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} World)", self.name, title_case(&self.world))
    }
}

fn placeholder<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Capitalise the first letter of every alphabetic run.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
