//! Offline demo backend with canned story segments.

use crate::StoryDriver;
use async_trait::async_trait;
use novel_diver_error::GenerationError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::{debug, instrument};

/// Marker the opening prompt carries; anything else is a continuation.
const OPENING_MARKER: &str = "Begin an exciting";

const CULTIVATION_OPENING: &str = r#"
You find yourself standing at the entrance of the Azure Mountain Sect, morning mist swirling around ancient stone pillars carved with mystical symbols. Elder Chen, a weathered man with kind eyes, approaches you with measured steps.

"Welcome, young one," he says, his voice carrying the weight of centuries. "I sense great potential within you. The spiritual energy here is dense - perfect for beginning your cultivation journey. However, the path ahead is treacherous. Three trials await new disciples."

He gestures toward three different paths leading up the mountain. The left path glows with a soft golden light, the middle path crackles with lightning energy, and the right path seems shrouded in mysterious shadows.

"Choose wisely," Elder Chen warns. "Each path will shape your cultivation foundation differently."

DECISION_POINT
1. Take the golden path of harmony and balance
2. Choose the lightning path of power and intensity
3. Enter the shadow path of mystery and stealth
4. Ask Elder Chen for more guidance about the paths
"#;

const FANTASY_OPENING: &str = r#"
The ancient tavern door creaks open as you step into the dimly lit common room. The Prancing Pony is filled with an eclectic mix of travelers - hooded figures whispering in dark corners, jovial merchants sharing ales, and a lone bard strumming melancholic melodies by the fireplace.

Suddenly, a commotion erupts near the bar. A young woman with pointed ears and silver hair - clearly an elf - is arguing with a burly dwarf over a leather-bound map spread across the wooden surface.

"The Dragon's Hoard is real!" she insists, her emerald eyes flashing. "My grandfather's journal contains the exact location!"

The dwarf strokes his braided beard skeptically. "Aye, lass, and I'm the King of the Mountain Folk. That map's led many a fool to their doom."

They both notice you approaching and turn their attention your way. The elf's expression brightens with hope while the dwarf eyes you warily.

DECISION_POINT
1. Offer to help them decipher the map
2. Challenge the dwarf's skepticism about the treasure
3. Ask to hear more about the Dragon's Hoard legend
4. Order a drink and listen to their conversation quietly
"#;

const MARTIAL_ARTS_OPENING: &str = r#"
The morning sun filters through bamboo leaves as you practice your forms in the training courtyard of the Iron Fist School. Your muscles ache from months of rigorous training, but your master's words echo in your mind: "True strength comes not from the body, but from the spirit."

Suddenly, urgent shouts pierce the tranquil morning. Master Liu bursts through the gates, his usually calm demeanor replaced by barely controlled fury.

"They're gone," he announces grimly to the assembled students. "The Five Sacred Scrolls of our school have been stolen in the night. Without them, our martial arts tradition dies with this generation."

A fellow student, Wei, steps forward angrily. "Master, we must pursue the thieves immediately! Every moment we delay, they get further away!"

But another student, Mei, raises her hand thoughtfully. "Perhaps we should investigate the scene first. Rushing blindly could lead us into a trap."

Master Liu looks to you, his most promising student. "What do you counsel? Time is precious, but so is wisdom."

DECISION_POINT
1. Agree with Wei - pursue the thieves immediately
2. Support Mei's cautious approach to investigate first
3. Suggest splitting into two groups to do both
4. Ask Master Liu if he has any idea who might be responsible
"#;

const CONTINUATIONS: [&str; 3] = [
    r#"
Your choice leads you down a winding path filled with unexpected encounters. As you move forward, the landscape around you shifts and changes, revealing new challenges and opportunities.

A mysterious figure emerges from the shadows, offering cryptic advice about the journey ahead. "Not all is as it seems," they whisper before vanishing again.

You notice three distinct paths branching before you, each promising different adventures and potential rewards.

DECISION_POINT
1. Take the path that leads toward distant mountains
2. Follow the river route through the valley
3. Venture into the dark forest ahead
4. Rest here and contemplate your next move
"#,
    r#"
The consequences of your previous decision begin to unfold in ways you never expected. New allies emerge while old certainties crumble, forcing you to adapt and grow.

A wise mentor appears, offering valuable insights: "Every choice shapes not just your destination, but who you become along the way."

As the story progresses, you find yourself facing a crucial decision that could change everything.

DECISION_POINT
1. Trust your instincts and act boldly
2. Seek counsel from your companions
3. Take time to carefully analyze the situation
4. Try to find a creative alternative solution
"#,
    r#"
Your journey takes an unexpected turn as new revelations come to light. The world around you proves more complex and fascinating than you initially imagined.

Characters you thought you understood reveal hidden depths, while new mysteries emerge that challenge everything you believed to be true.

Standing at this crossroads, you must decide how to proceed with this newfound knowledge.

DECISION_POINT
1. Embrace the change and adapt your approach
2. Hold firm to your original principles
3. Seek to understand the deeper truth
4. Focus on the immediate practical concerns
"#,
];

/// Canned responses for playing without network access or credentials.
///
/// Openings are chosen by world keywords found in the prompt. Continuations are
/// drawn uniformly at random from a fixed pool.
#[derive(Debug)]
pub struct DemoDriver {
    rng: Mutex<StdRng>,
}

impl Default for DemoDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoDriver {
    /// Create a driver seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a driver whose continuation picks are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The opening a prompt maps to.
    ///
    /// Keywords are checked in order: cultivation, martial, sci or futuristic,
    /// urban or modern. Worlds without a canned opening get the fantasy one.
    pub fn opening_for(prompt: &str) -> &'static str {
        let lowered = prompt.to_lowercase();
        if lowered.contains("cultivation") {
            CULTIVATION_OPENING
        } else if lowered.contains("martial") {
            MARTIAL_ARTS_OPENING
        } else {
            // sci_fi and modern_urban have no canned opening yet
            FANTASY_OPENING
        }
    }

    /// The fixed continuation pool.
    pub fn continuations() -> &'static [&'static str] {
        &CONTINUATIONS
    }

    fn pick_continuation(&self) -> &'static str {
        let index = self
            .rng
            .lock()
            .map(|mut rng| rng.gen_range(0..CONTINUATIONS.len()))
            .unwrap_or(0);
        CONTINUATIONS[index]
    }
}

#[async_trait]
impl StoryDriver for DemoDriver {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let text = if prompt.contains(OPENING_MARKER) {
            debug!("Serving demo opening");
            Self::opening_for(prompt)
        } else {
            debug!("Serving demo continuation");
            self.pick_continuation()
        };
        Ok(text.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "demo"
    }

    fn model_name(&self) -> &str {
        "demo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_pick_openings() {
        assert!(DemoDriver::opening_for("a CULTIVATION tale").contains("Azure Mountain Sect"));
        assert!(DemoDriver::opening_for("martial_arts").contains("Iron Fist School"));
        assert!(DemoDriver::opening_for("sci_fi").contains("Prancing Pony"));
        assert!(DemoDriver::opening_for("anything").contains("Prancing Pony"));
    }

    #[test]
    fn every_canned_text_has_four_options() {
        let mut texts = vec![CULTIVATION_OPENING, FANTASY_OPENING, MARTIAL_ARTS_OPENING];
        texts.extend(CONTINUATIONS);
        for text in texts {
            assert!(text.contains("DECISION_POINT"));
            assert!(text.contains("\n4. "));
        }
    }
}
