//! Story session lifecycle.

use crate::StoryEngine;
use novel_diver_core::{Character, StoryChunk, StoryHistory};
use novel_diver_error::{NovelDiverResult, SessionError, SessionErrorKind};
use novel_diver_models::StoryDriver;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    /// No protagonist yet
    NoCharacter,
    /// Protagonist set, no story started
    CharacterReady,
    /// Story in progress, newest chunk waiting for a choice
    AwaitingChoice,
    /// Story in progress, a generation call is in flight
    Generating,
}

/// One player's story, driven one interaction at a time.
///
/// Every operation that generates takes `&mut self`, so a session never has two
/// generation calls in flight. A choice is recorded before the continuation is
/// generated and is kept if generation fails; the session then stays on the
/// previous options until [`StorySession::retry`] succeeds or the session is
/// restarted.
#[derive(Debug)]
pub struct StorySession {
    engine: Arc<StoryEngine>,
    character: Option<Character>,
    history: Option<StoryHistory>,
    generating: bool,
}

impl StorySession {
    /// Create an empty session backed by `engine`.
    pub fn new(engine: Arc<StoryEngine>) -> Self {
        Self {
            engine,
            character: None,
            history: None,
            generating: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        match (&self.character, &self.history) {
            (None, _) => SessionState::NoCharacter,
            _ if self.generating => SessionState::Generating,
            (Some(_), None) => SessionState::CharacterReady,
            (Some(_), Some(_)) => SessionState::AwaitingChoice,
        }
    }

    /// The protagonist, if one is set.
    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    /// The story so far, if one has started.
    pub fn history(&self) -> Option<&StoryHistory> {
        self.history.as_ref()
    }

    /// Options offered by the newest chunk.
    pub fn current_options(&self) -> &[String] {
        self.history
            .as_ref()
            .map(StoryHistory::current_options)
            .unwrap_or_default()
    }

    /// True when a choice is recorded but its continuation has not arrived.
    pub fn has_pending_decision(&self) -> bool {
        self.history
            .as_ref()
            .is_some_and(|h| h.pending_decision().is_some())
    }

    /// Validate and install a protagonist.
    ///
    /// A story already in progress is discarded.
    #[instrument(skip(self, character), fields(name = %character.name(), world = %character.world()))]
    pub fn set_character(&mut self, character: Character) -> NovelDiverResult<()> {
        character.validate()?;
        if self.history.take().is_some() {
            info!("Discarded story in progress for new character");
        }
        self.character = Some(character);
        Ok(())
    }

    /// Begin a new story for the current protagonist.
    ///
    /// On failure no story is kept and the session stays ready to start again.
    #[instrument(skip(self, driver), fields(provider = driver.provider_name()))]
    pub async fn start(&mut self, driver: &dyn StoryDriver) -> NovelDiverResult<&StoryChunk> {
        let character = self
            .character
            .as_ref()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoCharacter))?;
        self.history = None;

        self.generating = true;
        let result = self.engine.start_story(driver, character).await;
        self.generating = false;
        let (narrative, options) = result?.into_parts();

        let history = StoryHistory::new(
            StoryHistory::new_session_id(character.name()),
            character.name().as_str(),
            character.world().as_str(),
        );
        info!(session_id = %history.session_id(), "Story started");
        Ok(self.history.insert(history).add_story_chunk(narrative, options))
    }

    /// Choose option `index` of the newest chunk and generate what follows.
    ///
    /// If a choice is already recorded for the newest chunk, choosing the same
    /// index retries its continuation and any other index is rejected.
    #[instrument(skip(self, driver), fields(provider = driver.provider_name()))]
    pub async fn choose(
        &mut self,
        driver: &dyn StoryDriver,
        index: usize,
    ) -> NovelDiverResult<&StoryChunk> {
        let history = self
            .history
            .as_mut()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoStory))?;

        match history.pending_decision() {
            Some(pending) if *pending.chosen_index() == index => {
                info!(index, "Choice already recorded, retrying continuation");
            }
            Some(pending) => {
                return Err(SessionError::new(SessionErrorKind::DecisionPending {
                    recorded: *pending.chosen_index(),
                })
                .into());
            }
            None => {
                let decision = history.add_decision(index)?;
                info!(index, decision = %decision.decision_text(), "Decision recorded");
            }
        }

        self.continue_pending(driver).await
    }

    /// Regenerate the continuation for a recorded choice whose generation failed.
    #[instrument(skip(self, driver), fields(provider = driver.provider_name()))]
    pub async fn retry(&mut self, driver: &dyn StoryDriver) -> NovelDiverResult<&StoryChunk> {
        let history = self
            .history
            .as_ref()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoStory))?;
        if history.pending_decision().is_none() {
            return Err(SessionError::new(SessionErrorKind::NothingToRetry).into());
        }
        self.continue_pending(driver).await
    }

    /// Drop the protagonist and any in-memory story.
    pub fn restart(&mut self) {
        self.character = None;
        self.history = None;
        self.generating = false;
        info!("Session restarted");
    }

    /// Continue a previously saved story.
    ///
    /// The protagonist is kept if it matches the story; otherwise it is rebuilt
    /// from the name and world the history carries.
    pub fn resume(&mut self, history: StoryHistory) {
        let matches = self.character.as_ref().is_some_and(|c| {
            c.name() == history.character_name() && c.world() == history.world()
        });
        if !matches {
            self.character = Some(Character::stand_in(
                history.character_name().as_str(),
                history.world().as_str(),
            ));
        }
        info!(session_id = %history.session_id(), chapters = history.len(), "Story resumed");
        self.history = Some(history);
        self.generating = false;
    }

    async fn continue_pending(&mut self, driver: &dyn StoryDriver) -> NovelDiverResult<&StoryChunk> {
        let history = self
            .history
            .as_mut()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoStory))?;
        let chosen = history
            .pending_decision()
            .map(|d| d.decision_text().clone())
            .ok_or_else(|| SessionError::new(SessionErrorKind::NothingToRetry))?;

        self.generating = true;
        let result = self.engine.continue_story(driver, history, &chosen).await;
        self.generating = false;

        match result {
            Ok(segment) => {
                let (narrative, options) = segment.into_parts();
                Ok(history.add_story_chunk(narrative, options))
            }
            Err(e) => {
                warn!(error = %e, "Continuation failed, decision kept for retry");
                Err(e.into())
            }
        }
    }
}
