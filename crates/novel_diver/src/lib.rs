//! Novel Diver: interactive fiction written by an AI, steered by you.
//!
//! The player creates a protagonist, picks a world and advances the story by
//! choosing one of four options after every chapter. This crate ties the
//! workspace together and re-exports the pieces an application needs.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use novel_diver::{BackendRegistry, Character, Credentials, NovelDiverConfig, StorySession};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NovelDiverConfig::load()?;
//! let credentials = Credentials::from_lookup(|key| std::env::var(key).ok());
//! let mut registry = BackendRegistry::new(config.backend_settings(), credentials);
//! let backend = registry.resolve(None)?;
//!
//! let mut session = StorySession::new(Arc::new(config.story_engine()));
//! session.set_character(Character::create_sample("cultivation"))?;
//! let opening = session.start(&*backend).await?;
//! println!("{}", opening.text());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `novel_diver_error` - Error types
//! - `novel_diver_core` - Characters, worlds and story history
//! - `novel_diver_rate_limit` - Rate-limit detection and exponential backoff
//! - `novel_diver_models` - Gemini, HuggingFace and demo backends with fallback
//! - `novel_diver_narrative` - Prompts, response parsing, sessions and storage
//!
//! This crate adds layered configuration and tracing setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod telemetry;

pub use config::{ENV_PREFIX, NovelDiverConfig, StorageSettings};
pub use telemetry::{LogFormat, default_filter, init_tracing};

pub use novel_diver_core::*;
pub use novel_diver_error::*;
pub use novel_diver_models::{
    Backend, BackendId, BackendRegistry, BackendSettings, Credentials, DemoDriver,
    GeminiSettings, HuggingFaceSettings, StoryDriver,
};
pub use novel_diver_narrative::*;
pub use novel_diver_rate_limit::{RetryPolicy, retry_with_backoff};
