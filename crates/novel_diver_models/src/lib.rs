//! Story generation backends for Novel Diver.
//!
//! Every backend answers one question: given a prompt, what text comes back?
//! That capability is the [`StoryDriver`] trait. Three providers implement it:
//!
//! - **Gemini** ([`GeminiDriver`]) - Google's cloud model through `gemini-rust`
//! - **HuggingFace** ([`HuggingFaceDriver`]) - the hosted inference endpoint, trying
//!   several candidate models in turn
//! - **Demo** ([`DemoDriver`]) - canned offline responses, no credentials needed
//!
//! [`Backend`] tags an initialized driver with its [`BackendId`] and dispatches by
//! matching on the tag. [`BackendRegistry`] owns the credentials, caches one
//! initialized backend per id and falls back across available backends when the
//! preferred one cannot be built.
//!
//! # Example
//!
//! ```no_run
//! use novel_diver_models::{BackendId, BackendRegistry, BackendSettings, Credentials, StoryDriver};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::from_lookup(|key| std::env::var(key).ok());
//! let mut registry = BackendRegistry::new(BackendSettings::default(), credentials);
//!
//! let backend = registry.resolve(Some(BackendId::Gemini))?;
//! let text = backend.generate("Begin an exciting fantasy adventure.").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod credentials;
mod demo;
mod driver;
mod gemini;
mod huggingface;
mod registry;
mod settings;

pub use backend::{Backend, BackendId};
pub use credentials::{Credentials, DEMO_MODE_VAR, GEMINI_API_KEY_VAR, HUGGINGFACE_TOKEN_VAR};
pub use demo::DemoDriver;
pub use driver::StoryDriver;
pub use gemini::GeminiDriver;
pub use huggingface::{
    HuggingFaceDriver, HuggingFaceParameters, HuggingFaceParametersBuilder, HuggingFaceRequest,
    HuggingFaceRequestBuilder, extract_generated_text,
};
pub use registry::BackendRegistry;
pub use settings::{BackendSettings, GeminiSettings, HuggingFaceSettings};
