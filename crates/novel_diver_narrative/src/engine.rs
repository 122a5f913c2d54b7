//! Story generation pipeline: compile, generate with backoff, parse.

use crate::{
    ParsedSegment, WorldTemplateSource, continuation_prompt, opening_prompt, parse_response,
    resolve_world_template,
};
use novel_diver_core::{Character, StoryHistory};
use novel_diver_error::GenerationError;
use novel_diver_models::StoryDriver;
use novel_diver_rate_limit::{RetryPolicy, retry_with_backoff_if};
use tracing::{debug, error, info, instrument};

/// Default number of recent chunks fed back as continuation context.
pub const DEFAULT_CONTEXT_CHUNKS: usize = 3;

/// Turns characters and histories into parsed story segments.
///
/// The engine owns no backend. The caller passes the driver for each call, so
/// one engine serves any number of sessions and backends.
pub struct StoryEngine {
    templates: Box<dyn WorldTemplateSource>,
    retry: RetryPolicy,
    context_chunks: usize,
}

impl std::fmt::Debug for StoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryEngine")
            .field("retry", &self.retry)
            .field("context_chunks", &self.context_chunks)
            .finish_non_exhaustive()
    }
}

impl StoryEngine {
    /// Create an engine with the default retry policy and context window.
    pub fn new(templates: impl WorldTemplateSource + 'static) -> Self {
        Self {
            templates: Box::new(templates),
            retry: RetryPolicy::default(),
            context_chunks: DEFAULT_CONTEXT_CHUNKS,
        }
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace how many recent chunks continuations see.
    pub fn with_context_chunks(mut self, context_chunks: usize) -> Self {
        self.context_chunks = context_chunks;
        self
    }

    /// Retry policy applied to every generation call.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Recent chunks included in continuation prompts.
    pub fn context_chunks(&self) -> usize {
        self.context_chunks
    }

    /// Template text for a world, falling back to the built-ins.
    pub fn world_template(&self, world: &str) -> String {
        resolve_world_template(self.templates.as_ref(), world)
    }

    /// Prompt that opens a story for `character`.
    pub fn opening_prompt(&self, character: &Character) -> String {
        opening_prompt(character, &self.world_template(character.world()))
    }

    /// Prompt that continues `history` after `chosen_option`.
    ///
    /// Only the name and world survive in a history, so the profile is rebuilt
    /// from those.
    pub fn continuation_prompt(&self, history: &StoryHistory, chosen_option: &str) -> String {
        let stand_in = Character::stand_in(history.character_name(), history.world());
        continuation_prompt(
            &stand_in,
            &self.world_template(history.world()),
            &history.continuation_context(self.context_chunks),
            chosen_option,
        )
    }

    /// Generate the opening segment of a story.
    #[instrument(skip(self, driver, character), fields(provider = driver.provider_name(), world = %character.world()))]
    pub async fn start_story(
        &self,
        driver: &dyn StoryDriver,
        character: &Character,
    ) -> Result<ParsedSegment, GenerationError> {
        info!(character = %character, "Starting story");
        let prompt = self.opening_prompt(character);
        self.generate(driver, &prompt).await
    }

    /// Generate the segment that follows `chosen_option`.
    #[instrument(skip(self, driver, history, chosen_option), fields(provider = driver.provider_name(), session_id = %history.session_id()))]
    pub async fn continue_story(
        &self,
        driver: &dyn StoryDriver,
        history: &StoryHistory,
        chosen_option: &str,
    ) -> Result<ParsedSegment, GenerationError> {
        info!(chapters = history.len(), "Continuing story");
        let prompt = self.continuation_prompt(history, chosen_option);
        self.generate(driver, &prompt).await
    }

    async fn generate(
        &self,
        driver: &dyn StoryDriver,
        prompt: &str,
    ) -> Result<ParsedSegment, GenerationError> {
        debug!(prompt_len = prompt.len(), "Sending prompt");
        // Only Quota failures back off.
        let raw = retry_with_backoff_if(
            &self.retry,
            move || driver.generate(prompt),
            GenerationError::is_retryable,
        )
        .await
        .map_err(|e| {
            error!(error = %e, kind = e.kind.label(), "Generation failed");
            e
        })?;
        debug!(response_len = raw.len(), "Received response");
        Ok(parse_response(&raw))
    }
}
