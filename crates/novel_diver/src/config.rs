//! Layered configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`novel_diver.toml` shipped with the crate)
//! 2. `~/.config/novel_diver/novel_diver.toml`
//! 3. `./novel_diver.toml`
//! 4. An explicit file passed on the command line
//! 5. `NOVEL_DIVER_*` environment variables, `__` separating nested keys

use config::{Config, Environment, File, FileFormat};
use novel_diver_error::{ConfigError, NovelDiverError, NovelDiverResult};
use novel_diver_models::{BackendId, BackendSettings, GeminiSettings, HuggingFaceSettings};
use novel_diver_narrative::{
    DEFAULT_CONTEXT_CHUNKS, DEFAULT_OWNER, FileTemplateStore, InMemoryTemplates, StoryEngine,
};
use novel_diver_rate_limit::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../novel_diver.toml");

/// Prefix of environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "NOVEL_DIVER";

/// Where stories are saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory for saved stories; defaults to the platform data directory
    #[serde(default)]
    pub stories_dir: Option<PathBuf>,
    /// Owner key stories are filed under
    #[serde(default = "default_owner")]
    pub owner: String,
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            stories_dir: None,
            owner: default_owner(),
        }
    }
}

impl StorageSettings {
    /// Configured directory, or `<data dir>/novel_diver/stories`, or `./stories`.
    pub fn resolved_stories_dir(&self) -> PathBuf {
        self.stories_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join("novel_diver").join("stories"))
                .unwrap_or_else(|| PathBuf::from("stories"))
        })
    }
}

/// Complete application configuration.
///
/// # Example
///
/// ```no_run
/// use novel_diver::NovelDiverConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = NovelDiverConfig::load()?;
/// let engine = config.story_engine();
/// println!("retries: {}", engine.retry_policy().max_retries());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovelDiverConfig {
    /// Backend tried first
    #[serde(default)]
    pub preferred_backend: BackendId,
    /// Force the offline demo backend
    #[serde(default)]
    pub demo_mode: bool,
    /// Directory of `<world>.txt` templates
    #[serde(default)]
    pub prompts_dir: Option<PathBuf>,
    /// Recent chapters included in continuation prompts
    #[serde(default = "default_context_chunks")]
    pub context_chunks: usize,
    /// Backoff for rate-limited generation
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Gemini section
    #[serde(default)]
    pub gemini: GeminiSettings,
    /// HuggingFace section
    #[serde(default)]
    pub huggingface: HuggingFaceSettings,
    /// Story storage section
    #[serde(default)]
    pub storage: StorageSettings,
}

fn default_context_chunks() -> usize {
    DEFAULT_CONTEXT_CHUNKS
}

impl Default for NovelDiverConfig {
    fn default() -> Self {
        Self {
            preferred_backend: BackendId::default(),
            demo_mode: false,
            prompts_dir: None,
            context_chunks: default_context_chunks(),
            retry: RetryPolicy::default(),
            gemini: GeminiSettings::default(),
            huggingface: HuggingFaceSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl NovelDiverConfig {
    /// Load configuration from a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> NovelDiverResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                NovelDiverError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                NovelDiverError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the bundled defaults, user files and the process environment.
    #[instrument]
    pub fn load() -> NovelDiverResult<Self> {
        Self::load_layered(None, None)
    }

    /// Load every layer, optionally adding an explicit file and replacing the
    /// process environment with `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if `extra_file` is missing or any layer fails to parse.
    #[instrument(skip(env))]
    pub fn load_layered(
        extra_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> NovelDiverResult<Self> {
        debug!("Loading configuration: env > explicit file > current dir > home dir > bundled");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/novel_diver/novel_diver.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("novel_diver").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Self = builder
            .build()
            .map_err(|e| {
                NovelDiverError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                NovelDiverError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.context_chunks == 0 {
            return Err(ConfigError::new("context_chunks must be at least 1"));
        }
        if self.huggingface.models.is_empty() {
            return Err(ConfigError::new("huggingface.models must list at least one model"));
        }
        if self.storage.owner.trim().is_empty() {
            return Err(ConfigError::new("storage.owner must not be empty"));
        }
        Ok(())
    }

    /// Settings for the backend registry.
    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            preferred_backend: self.preferred_backend,
            demo_mode: self.demo_mode,
            gemini: self.gemini.clone(),
            huggingface: self.huggingface.clone(),
        }
    }

    /// Story engine using the configured templates, retry policy and context window.
    pub fn story_engine(&self) -> StoryEngine {
        let engine = match &self.prompts_dir {
            Some(dir) => StoryEngine::new(FileTemplateStore::new(dir)),
            None => StoryEngine::new(InMemoryTemplates::new()),
        };
        engine
            .with_retry_policy(self.retry.clone())
            .with_context_chunks(self.context_chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_match_code_defaults() {
        let config: NovelDiverConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config, NovelDiverConfig::default());
    }
}
