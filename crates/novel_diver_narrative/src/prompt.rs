//! Prompt compilation.
//!
//! Pure functions of their inputs: a character (or the stand-in re-derived from
//! a history), the resolved world template, and for continuations the recent
//! story context plus the chosen action.

use crate::DECISION_DELIMITER;
use novel_diver_core::Character;

const WRITING_RULES: &str = "\
STORY WRITING RULES:
1. Write in second person perspective (\"You do...\", \"You see...\") to immerse the protagonist
2. Create vivid, descriptive scenes that bring the world to life
3. Include dialogue from NPCs with distinct personalities
4. Generate unexpected twists and consequences based on previous decisions
5. Maintain consistency with the character's background and motivations
6. Each story segment should be 200-400 words

DECISION POINTS:
- After each story segment, create a decision point with exactly 4 options
- Options should be meaningfully different and lead to different outcomes
- Include at least one risky/bold option and one cautious option
- Make sure options align with the character's abilities and the world setting";

const CLOSING_REMINDER: &str = "Remember: The story should feel dynamic and reactive to the \
character's previous choices. Create memorable NPCs and situations that matter to the ongoing narrative.";

/// Authorial instructions, world, character profile and the output format.
pub fn system_prompt(character: &Character, world_template: &str) -> String {
    format!(
        "You are a masterful interactive fiction writer creating an engaging story for the user. \
         Follow these guidelines:\n\n\
         {world_template}\n\n\
         {profile}\n\n\
         {WRITING_RULES}\n\n\
         FORMAT YOUR RESPONSE EXACTLY LIKE THIS:\n\
         [Story text goes here - 200-400 words describing the scene, action, and dialogue]\n\n\
         {DECISION_DELIMITER}\n\
         1. [First option - brief but clear description]\n\
         2. [Second option - brief but clear description]\n\
         3. [Third option - brief but clear description]\n\
         4. [Fourth option - brief but clear description]\n\n\
         {CLOSING_REMINDER}",
        profile = character.to_prompt(),
    )
}

/// Prompt for the first chunk of a new story.
pub fn opening_prompt(character: &Character, world_template: &str) -> String {
    let brief = format!(
        "Begin an exciting {world} adventure. Introduce the protagonist {name} in an engaging \
         opening scene that sets up their story. Include:\n\n\
         1. A vivid description of the initial setting\n\
         2. A situation that connects to their background: {background}\n\
         3. An immediate challenge or opportunity that relates to their goals: {goals}\n\
         4. At least one interesting NPC to interact with\n\n\
         Make the opening compelling and immersive, then present the first major decision point.",
        world = character.world(),
        name = character.name(),
        background = character.background(),
        goals = character.goals(),
    );
    format!("{}\n\n{}", system_prompt(character, world_template), brief)
}

/// Prompt for the chunk that follows the player's chosen action.
pub fn continuation_prompt(
    character: &Character,
    world_template: &str,
    recent_context: &str,
    chosen_action: &str,
) -> String {
    let brief = format!(
        "PREVIOUS STORY CONTEXT:\n{recent_context}\n\n\
         PLAYER'S CHOSEN ACTION:\n{chosen_action}\n\n\
         Continue the story based on the player's choice. Show the consequences of their \
         decision, advance the plot, and create a new compelling situation with 4 new decision \
         options. Make sure the story flows naturally from the previous events and the chosen action."
    );
    format!("{}\n\n{}", system_prompt(character, world_template), brief)
}
