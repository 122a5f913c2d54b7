//! Story continuation pipeline for Novel Diver.
//!
//! This crate turns narrative state into prompts, prompts into generated text
//! and generated text back into a story chunk with exactly four options.
//!
//! # Pipeline
//!
//! - **Templates**: world template lookup with a two-level fallback to the
//!   built-in world descriptions
//! - **Prompt compiler**: opening and continuation prompts from a character,
//!   a world template and recent story context
//! - **Engine**: [`StoryEngine`] sends a prompt through a [`StoryDriver`] with
//!   rate-limit backoff and parses the reply
//! - **Parser**: [`parse_response`] splits narrative from options and repairs
//!   malformed output instead of failing
//! - **Session**: [`StorySession`] drives the lifecycle from character creation
//!   to choices, keeping recorded decisions across failed generations
//! - **Store**: [`StoryStore`] persists serialized histories by owner and session
//!
//! # Example
//!
//! ```rust,no_run
//! use novel_diver_core::Character;
//! use novel_diver_models::DemoDriver;
//! use novel_diver_narrative::{InMemoryTemplates, StoryEngine, StorySession};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Arc::new(StoryEngine::new(InMemoryTemplates::new()));
//! let mut session = StorySession::new(engine);
//! let driver = DemoDriver::new();
//!
//! session.set_character(Character::create_sample("fantasy"))?;
//! let opening = session.start(&driver).await?;
//! println!("{}", opening.text());
//!
//! let next = session.choose(&driver, 0).await?;
//! println!("{}", next.text());
//! # Ok(())
//! # }
//! ```
//!
//! [`StoryDriver`]: novel_diver_models::StoryDriver

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod parser;
mod prompt;
mod session;
mod store;
mod templates;

pub use engine::{DEFAULT_CONTEXT_CHUNKS, StoryEngine};
pub use parser::{
    DECISION_DELIMITER, FALLBACK_OPTIONS, OPTION_COUNT, PADDING_OPTIONS, ParseRecovery,
    ParsedSegment, parse_response,
};
pub use prompt::{continuation_prompt, opening_prompt, system_prompt};
pub use session::{SessionState, StorySession};
pub use store::{
    DEFAULT_OWNER, FileSystemStoryStore, InMemoryStoryStore, StoryStore, validate_key,
};
pub use templates::{
    FileTemplateStore, InMemoryTemplates, WorldTemplateSource, resolve_world_template,
};
