//! The story generation capability.

use async_trait::async_trait;
use novel_diver_error::GenerationError;

/// Accepts a text prompt and returns generated text.
///
/// Implementations report provider failures as [`GenerationError`]s whose kind
/// is recovered from the provider's message, so callers can decide whether a
/// failure is worth retrying.
#[async_trait]
pub trait StoryDriver: Send + Sync {
    /// Generate raw text for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Provider name (e.g., "gemini", "huggingface", "demo").
    fn provider_name(&self) -> &'static str;

    /// Model identifier the provider is configured with.
    fn model_name(&self) -> &str;
}
