//! HuggingFace inference driver using reqwest.

use super::{HuggingFaceParameters, HuggingFaceRequest};
use crate::{HuggingFaceSettings, StoryDriver};
use async_trait::async_trait;
use novel_diver_error::{GenerationError, GenerationErrorKind};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

const PROBE_MODEL: &str = "microsoft/DialoGPT-medium";
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// HuggingFace inference driver.
///
/// Tries each configured model in order and returns the first usable response.
/// A model that errors, answers with a non-200 status, or returns too little
/// text is skipped.
#[derive(Debug, Clone)]
pub struct HuggingFaceDriver {
    client: Client,
    api_token: String,
    base_url: String,
    models: Vec<String>,
    parameters: HuggingFaceParameters,
    min_response_chars: usize,
}

impl HuggingFaceDriver {
    /// Creates a new HuggingFace driver with an explicit API token.
    ///
    /// # Errors
    ///
    /// Returns error if no models are configured, the base URL does not parse,
    /// or the HTTP client or the request parameters cannot be built.
    #[instrument(skip(api_token, settings), fields(models = settings.models.len()))]
    pub fn new(api_token: &str, settings: &HuggingFaceSettings) -> Result<Self, GenerationError> {
        if settings.models.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::Unknown(
                "No HuggingFace models configured".to_string(),
            )));
        }
        reqwest::Url::parse(&settings.api_url).map_err(|e| {
            GenerationError::new(GenerationErrorKind::Unknown(format!(
                "Invalid HuggingFace API URL {}: {}",
                settings.api_url, e
            )))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Unknown(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        let parameters = HuggingFaceParameters::builder()
            .max_new_tokens(settings.max_new_tokens)
            .temperature(settings.temperature)
            .top_p(settings.top_p)
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Unknown(format!(
                    "Failed to build HuggingFace parameters: {}",
                    e
                )))
            })?;

        debug!(base_url = %settings.api_url, "Created HuggingFace driver");

        Ok(Self {
            client,
            api_token: api_token.to_string(),
            base_url: settings.api_url.clone(),
            models: settings.models.clone(),
            parameters,
            min_response_chars: settings.min_response_chars,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}{}", self.base_url, model)
    }

    /// Try one model. `Ok(None)` means the model answered but not usefully.
    #[instrument(skip(self, request), fields(model = %model))]
    async fn try_model(
        &self,
        model: &str,
        request: &HuggingFaceRequest,
    ) -> Result<Option<String>, reqwest::Error> {
        let url = self.model_url(model);
        debug!(url = %url, "Sending request to HuggingFace");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "HuggingFace model returned an error status");
            return Ok(None);
        }

        let body: serde_json::Value = response.json().await?;
        Ok(extract_generated_text(&body, self.min_response_chars))
    }

    /// Check the token against a lightweight model endpoint.
    #[instrument(skip(self))]
    pub async fn probe(&self) -> Result<(), GenerationError> {
        let response = self
            .client
            .get(self.model_url(PROBE_MODEL))
            .bearer_auth(&self.api_token)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "Hugging Face API timeout".to_string()
                } else {
                    format!("Hugging Face connection error: {}", e)
                };
                GenerationError::new(GenerationErrorKind::Unknown(reason))
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            // Status codes 401, 403 and 429 classify by their digits
            Err(GenerationError::from_message(format!(
                "Hugging Face returned HTTP {}",
                status.as_u16()
            )))
        }
    }
}

#[async_trait]
impl StoryDriver for HuggingFaceDriver {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = HuggingFaceRequest::builder()
            .inputs(prompt)
            .parameters(self.parameters)
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Unknown(format!(
                    "Failed to build HuggingFace request: {}",
                    e
                )))
            })?;

        for model in &self.models {
            match self.try_model(model, &request).await {
                Ok(Some(text)) => {
                    debug!(model = %model, response_len = text.len(), "HuggingFace model succeeded");
                    return Ok(text);
                }
                Ok(None) => {
                    warn!(model = %model, "HuggingFace model gave no usable text, trying next");
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "HuggingFace model failed, trying next");
                }
            }
        }

        error!(models = self.models.len(), "All HuggingFace models failed");
        Err(GenerationError::from_message(
            "All Hugging Face models failed. Please try again or use a different API.",
        ))
    }

    fn provider_name(&self) -> &'static str {
        "huggingface"
    }

    fn model_name(&self) -> &str {
        self.models.first().map(String::as_str).unwrap_or_default()
    }
}

/// Pull generated text out of an inference response body.
///
/// A list response uses its first element's `generated_text`, accepted only
/// when the trimmed text is longer than `min_chars`. An object response with
/// `generated_text` is accepted as is.
///
/// ```
/// use novel_diver_models::extract_generated_text;
/// use serde_json::json;
///
/// let body = json!({"generated_text": "short"});
/// assert_eq!(extract_generated_text(&body, 50).as_deref(), Some("short"));
///
/// let body = json!([{"generated_text": "short"}]);
/// assert_eq!(extract_generated_text(&body, 50), None);
/// ```
pub fn extract_generated_text(body: &serde_json::Value, min_chars: usize) -> Option<String> {
    if let Some(items) = body.as_array() {
        let text = items.first()?.get("generated_text")?.as_str()?;
        (text.trim().chars().count() > min_chars).then(|| text.to_string())
    } else {
        body.get("generated_text")?
            .as_str()
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn long_list_response_is_accepted() {
        let text = "x".repeat(51);
        let body = json!([{ "generated_text": text }]);
        assert_eq!(extract_generated_text(&body, 50), Some(text));
    }

    #[test]
    fn padded_short_list_response_is_rejected() {
        let text = format!("   {}   ", "x".repeat(50));
        let body = json!([{ "generated_text": text }]);
        assert_eq!(extract_generated_text(&body, 50), None);
    }

    #[test]
    fn unexpected_shapes_are_rejected() {
        assert_eq!(extract_generated_text(&json!([]), 0), None);
        assert_eq!(extract_generated_text(&json!({"error": "loading"}), 0), None);
        assert_eq!(extract_generated_text(&json!("text"), 0), None);
    }

    #[test]
    fn request_body_matches_inference_contract() {
        let settings = HuggingFaceSettings::default();
        let driver = HuggingFaceDriver::new("hf_token", &settings).unwrap();
        let request = HuggingFaceRequest::builder()
            .inputs("Once upon a time")
            .parameters(driver.parameters)
            .build()
            .unwrap();

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["inputs"], "Once upon a time");
        assert_eq!(body["parameters"]["max_new_tokens"], 800);
        assert_eq!(body["parameters"]["do_sample"], true);
        assert_eq!(body["parameters"]["return_full_text"], false);
        assert!((body["parameters"]["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }
}
