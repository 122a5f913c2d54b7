//! HuggingFace inference API data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct HuggingFaceParameters {
    /// Maximum tokens to generate
    max_new_tokens: u32,
    /// Temperature for sampling
    temperature: f32,
    /// Top-p sampling
    top_p: f32,
    /// Sample rather than decode greedily
    #[builder(default = "true")]
    do_sample: bool,
    /// Echo the prompt back in the output
    #[builder(default = "false")]
    return_full_text: bool,
}

impl HuggingFaceParameters {
    /// Creates a new builder for `HuggingFaceParameters`.
    pub fn builder() -> HuggingFaceParametersBuilder {
        HuggingFaceParametersBuilder::default()
    }
}

/// Request body for a text-generation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct HuggingFaceRequest {
    /// Prompt text
    inputs: String,
    /// Sampling parameters
    parameters: HuggingFaceParameters,
}

impl HuggingFaceRequest {
    /// Creates a new builder for `HuggingFaceRequest`.
    pub fn builder() -> HuggingFaceRequestBuilder {
        HuggingFaceRequestBuilder::default()
    }
}
