//! Backend configuration sections.
//!
//! These map directly onto the `[gemini]` and `[huggingface]` tables of
//! `novel_diver.toml`. Every field has a default so partial files merge cleanly.

use crate::BackendId;
use serde::{Deserialize, Serialize};

/// Gemini backend settings.
///
/// ```toml
/// [gemini]
/// model = "gemini-1.5-flash"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// Model name, with or without the `models/` prefix
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
        }
    }
}

/// HuggingFace inference endpoint settings.
///
/// ```toml
/// [huggingface]
/// api_url = "https://api-inference.huggingface.co/models/"
/// models = ["mistralai/Mistral-7B-Instruct-v0.1", "microsoft/DialoGPT-large", "gpt2-large"]
/// timeout_secs = 30
/// max_new_tokens = 800
/// temperature = 0.7
/// top_p = 0.9
/// min_response_chars = 50
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuggingFaceSettings {
    /// Base URL the model id is appended to
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Candidate models, tried in order
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Generation length cap
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Nucleus sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// List responses must be longer than this (trimmed) to be accepted
    #[serde(default = "default_min_response_chars")]
    pub min_response_chars: usize,
}

fn default_api_url() -> String {
    "https://api-inference.huggingface.co/models/".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "mistralai/Mistral-7B-Instruct-v0.1".to_string(),
        "microsoft/DialoGPT-large".to_string(),
        "gpt2-large".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_new_tokens() -> u32 {
    800
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

fn default_min_response_chars() -> usize {
    50
}

impl Default for HuggingFaceSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            models: default_models(),
            timeout_secs: default_timeout_secs(),
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            min_response_chars: default_min_response_chars(),
        }
    }
}

/// Everything the registry needs besides credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Backend tried first
    #[serde(default)]
    pub preferred_backend: BackendId,
    /// Force the offline demo backend
    #[serde(default)]
    pub demo_mode: bool,
    /// Gemini section
    #[serde(default)]
    pub gemini: GeminiSettings,
    /// HuggingFace section
    #[serde(default)]
    pub huggingface: HuggingFaceSettings,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            preferred_backend: BackendId::default(),
            demo_mode: false,
            gemini: GeminiSettings::default(),
            huggingface: HuggingFaceSettings::default(),
        }
    }
}
