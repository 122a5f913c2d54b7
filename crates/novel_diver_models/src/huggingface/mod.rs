//! HuggingFace inference endpoint integration.

mod driver;
mod dto;

pub use driver::{HuggingFaceDriver, extract_generated_text};
pub use dto::{
    HuggingFaceParameters, HuggingFaceParametersBuilder, HuggingFaceRequest,
    HuggingFaceRequestBuilder,
};
