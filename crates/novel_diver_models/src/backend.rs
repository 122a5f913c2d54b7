//! Tagged backend variants.

use crate::{
    BackendSettings, Credentials, DemoDriver, GeminiDriver, HuggingFaceDriver, StoryDriver,
};
use async_trait::async_trait;
use novel_diver_error::{GenerationError, GenerationErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Identifier of a generation backend.
///
/// Declaration order is the fallback order.
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
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackendId {
    /// Google Gemini
    #[default]
    Gemini,
    /// HuggingFace inference endpoint
    HuggingFace,
    /// Offline canned responses
    Demo,
}

impl BackendId {
    /// All ids in fallback order.
    pub fn all() -> impl Iterator<Item = BackendId> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

/// An initialized driver tagged with the backend it belongs to.
#[derive(Debug)]
pub enum Backend {
    /// Google Gemini
    Gemini(GeminiDriver),
    /// HuggingFace inference endpoint
    HuggingFace(HuggingFaceDriver),
    /// Offline canned responses
    Demo(DemoDriver),
}

impl Backend {
    /// Build the client for `id` from settings and credentials.
    ///
    /// # Errors
    ///
    /// Fails when a networked backend has no secret or its client cannot be built.
    #[instrument(skip(settings, credentials))]
    pub fn initialize(
        id: BackendId,
        settings: &BackendSettings,
        credentials: &Credentials,
    ) -> Result<Self, GenerationError> {
        let backend = match id {
            BackendId::Demo => Self::Demo(DemoDriver::new()),
            BackendId::Gemini => {
                let key = credentials.secret(id).ok_or_else(|| missing_secret(id))?;
                Self::Gemini(GeminiDriver::new(key, &settings.gemini)?)
            }
            BackendId::HuggingFace => {
                let token = credentials.secret(id).ok_or_else(|| missing_secret(id))?;
                Self::HuggingFace(HuggingFaceDriver::new(token, &settings.huggingface)?)
            }
        };
        debug!(backend = %id, "Initialized backend");
        Ok(backend)
    }

    /// The tag of this variant.
    pub fn id(&self) -> BackendId {
        match self {
            Self::Gemini(_) => BackendId::Gemini,
            Self::HuggingFace(_) => BackendId::HuggingFace,
            Self::Demo(_) => BackendId::Demo,
        }
    }

    /// Make a minimal request to check the credential works.
    pub async fn probe(&self) -> Result<(), GenerationError> {
        match self {
            Self::Gemini(driver) => driver.probe().await,
            Self::HuggingFace(driver) => driver.probe().await,
            Self::Demo(_) => Ok(()),
        }
    }
}

#[async_trait]
impl StoryDriver for Backend {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match self {
            Self::Gemini(driver) => driver.generate(prompt).await,
            Self::HuggingFace(driver) => driver.generate(prompt).await,
            Self::Demo(driver) => driver.generate(prompt).await,
        }
    }

    fn provider_name(&self) -> &'static str {
        match self {
            Self::Gemini(driver) => driver.provider_name(),
            Self::HuggingFace(driver) => driver.provider_name(),
            Self::Demo(driver) => driver.provider_name(),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Self::Gemini(driver) => driver.model_name(),
            Self::HuggingFace(driver) => driver.model_name(),
            Self::Demo(driver) => driver.model_name(),
        }
    }
}

fn missing_secret(id: BackendId) -> GenerationError {
    GenerationError::new(GenerationErrorKind::Authentication(format!(
        "No credential configured for the {} backend",
        id
    )))
}
