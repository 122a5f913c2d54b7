//! Google Gemini backend.

use crate::{GeminiSettings, StoryDriver};
use async_trait::async_trait;
use gemini_rust::{Gemini, client::Model};
use novel_diver_error::GenerationError;
use tracing::{debug, error, instrument};

/// Single-request Gemini driver: prompt in, text out.
///
/// Request timeouts are whatever the underlying `gemini-rust` client uses.
#[derive(Clone)]
pub struct GeminiDriver {
    client: Gemini,
    model: String,
}

impl std::fmt::Debug for GeminiDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiDriver")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiDriver {
    /// Create a driver for the configured model.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the client cannot be constructed.
    #[instrument(skip(api_key), fields(model = %settings.model))]
    pub fn new(api_key: &str, settings: &GeminiSettings) -> Result<Self, GenerationError> {
        let client = Gemini::with_model(api_key, model_name_to_enum(&settings.model))
            .map_err(|e| {
                error!(error = %e, "Failed to create Gemini client");
                GenerationError::from_message(format!("Failed to create Gemini client: {}", e))
            })?;

        debug!("Created Gemini driver");
        Ok(Self {
            client,
            model: settings.model.clone(),
        })
    }

    /// Send a tiny request to confirm the key is accepted.
    #[instrument(skip(self), fields(model = %self.model))]
    pub async fn probe(&self) -> Result<(), GenerationError> {
        let response = self
            .client
            .generate_content()
            .with_user_message("Hello")
            .with_max_output_tokens(10)
            .with_temperature(0.1)
            .execute()
            .await
            .map_err(parse_gemini_error)?;

        if response.text().trim().is_empty() {
            return Err(GenerationError::from_message(
                "Gemini API returned empty response",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl StoryDriver for GeminiDriver {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .generate_content()
            .with_user_message(prompt)
            .execute()
            .await
            .map_err(parse_gemini_error)?;

        let text = response.text();
        debug!(response_len = text.len(), "Received Gemini response");
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Map a configured model name to the `gemini-rust` model value.
///
/// - "gemini-2.5-flash" → Model::Gemini25Flash
/// - "gemini-1.5-flash" → Model::Custom("models/gemini-1.5-flash")
/// - "models/gemini-1.5-flash" → Model::Custom("models/gemini-1.5-flash") (preserved)
fn model_name_to_enum(name: &str) -> Model {
    match name {
        "gemini-2.5-flash" => Model::Gemini25Flash,
        "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
        "gemini-2.5-pro" => Model::Gemini25Pro,
        other if other.starts_with("models/") => Model::Custom(other.to_string()),
        other => Model::Custom(format!("models/{}", other)),
    }
}

/// Classify a `gemini-rust` error by its message, keeping any HTTP status text.
///
/// Messages look like "bad response from server; code 429; description: ...".
fn parse_gemini_error(err: impl std::fmt::Display) -> GenerationError {
    let message = err.to_string();
    match extract_status_code(&message) {
        Some(status) => {
            error!(status, error = %message, "Gemini request failed");
            GenerationError::from_message(format!("HTTP {}: {}", status, message))
        }
        None => {
            error!(error = %message, "Gemini request failed");
            GenerationError::from_message(message)
        }
    }
}

fn extract_status_code(message: &str) -> Option<u16> {
    let code_start = message.find("code ")?;
    let rest = &message[code_start + 5..];
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    rest[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use novel_diver_error::GenerationErrorKind;

    #[test]
    fn status_code_is_extracted() {
        assert_eq!(
            extract_status_code("bad response from server; code 503; description: busy"),
            Some(503)
        );
        assert_eq!(extract_status_code("code 429"), Some(429));
        assert_eq!(extract_status_code("timed out"), None);
    }

    #[test]
    fn quota_errors_classify_as_quota() {
        let err = parse_gemini_error("bad response from server; code 429; description: exhausted");
        assert!(matches!(err.kind, GenerationErrorKind::Quota(_)));
    }

    #[test]
    fn invalid_key_classifies_as_authentication() {
        let err = parse_gemini_error("code 400; description: API key not valid. Please pass a valid API key.");
        assert!(matches!(err.kind, GenerationErrorKind::Authentication(_)));
    }

    #[test]
    fn model_names_gain_prefix() {
        assert!(matches!(
            model_name_to_enum("gemini-1.5-flash"),
            Model::Custom(ref name) if name == "models/gemini-1.5-flash"
        ));
        assert!(matches!(
            model_name_to_enum("models/custom"),
            Model::Custom(ref name) if name == "models/custom"
        ));
    }
}
