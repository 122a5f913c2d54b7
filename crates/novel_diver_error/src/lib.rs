//! Error types for the Novel Diver interactive fiction engine.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! Generation failures carry a [`GenerationErrorKind`] recovered from the
//! provider's message text, which decides whether the retry controller backs
//! off and what the player is told.
//!
//! # Examples
//!
//! ```
//! use novel_diver_error::{NovelDiverResult, GenerationError, GenerationErrorKind};
//!
//! fn generate() -> NovelDiverResult<String> {
//!     Err(GenerationError::new(GenerationErrorKind::Unavailable))?
//! }
//!
//! match generate() {
//!     Ok(text) => println!("{}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod json;
mod session;
mod storage;
mod validation;

pub use config::ConfigError;
pub use error::{NovelDiverError, NovelDiverErrorKind, NovelDiverResult};
pub use generation::{
    GenerationError, GenerationErrorKind, RATE_LIMIT_INDICATORS, is_rate_limit_message,
};
pub use json::JsonError;
pub use session::{SessionError, SessionErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::ValidationError;
