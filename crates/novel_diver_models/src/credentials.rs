//! Backend credentials handed in from outside the engine.

use crate::BackendId;
use std::fmt;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable holding the HuggingFace access token.
pub const HUGGINGFACE_TOKEN_VAR: &str = "HUGGINGFACE_TOKEN";
/// Environment variable that enables the offline demo backend when set to `true`.
pub const DEMO_MODE_VAR: &str = "DEMO_MODE";

/// Secrets for the networked backends plus the demo switch.
///
/// Secrets are redacted from `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    gemini_api_key: Option<String>,
    huggingface_token: Option<String>,
    demo_mode: bool,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "huggingface_token",
                &self.huggingface_token.as_ref().map(|_| "<redacted>"),
            )
            .field("demo_mode", &self.demo_mode)
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a key lookup such as `std::env::var`.
    ///
    /// Blank values count as missing. `DEMO_MODE` is enabled by `true` in any case.
    ///
    /// ```
    /// use novel_diver_models::{BackendId, Credentials};
    ///
    /// let credentials = Credentials::from_lookup(|key| match key {
    ///     "HUGGINGFACE_TOKEN" => Some("hf_secret".to_string()),
    ///     _ => None,
    /// });
    /// assert!(credentials.has(BackendId::HuggingFace));
    /// assert!(!credentials.has(BackendId::Gemini));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            gemini_api_key: secret(GEMINI_API_KEY_VAR),
            huggingface_token: secret(HUGGINGFACE_TOKEN_VAR),
            demo_mode: lookup(DEMO_MODE_VAR)
                .map(|value| value.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Credentials that only enable the demo backend.
    pub fn demo() -> Self {
        Self {
            demo_mode: true,
            ..Self::default()
        }
    }

    /// Replace the Gemini API key.
    pub fn with_gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    /// Replace the HuggingFace token.
    pub fn with_huggingface_token(mut self, token: impl Into<String>) -> Self {
        self.huggingface_token = Some(token.into());
        self
    }

    /// Toggle the demo backend.
    pub fn with_demo_mode(mut self, enabled: bool) -> Self {
        self.demo_mode = enabled;
        self
    }

    /// Secret for a networked backend. The demo backend has none.
    pub fn secret(&self, backend: BackendId) -> Option<&str> {
        match backend {
            BackendId::Gemini => self.gemini_api_key.as_deref(),
            BackendId::HuggingFace => self.huggingface_token.as_deref(),
            BackendId::Demo => None,
        }
    }

    /// Store or clear the secret for a networked backend.
    ///
    /// Returns false for the demo backend, which takes no secret.
    pub fn set_secret(&mut self, backend: BackendId, secret: Option<String>) -> bool {
        let secret = secret.filter(|value| !value.trim().is_empty());
        match backend {
            BackendId::Gemini => self.gemini_api_key = secret,
            BackendId::HuggingFace => self.huggingface_token = secret,
            BackendId::Demo => return false,
        }
        true
    }

    /// Whether demo mode is enabled.
    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// Whether the backend has what it needs to initialize.
    pub fn has(&self, backend: BackendId) -> bool {
        match backend {
            BackendId::Demo => self.demo_mode,
            other => self.secret(other).is_some(),
        }
    }
}
