//! Shared helpers for narrative integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use novel_diver_error::{GenerationError, GenerationErrorKind};
use novel_diver_models::StoryDriver;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Driver that replays a fixed script of results and records every prompt.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_ok(self, text: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn then_err(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(GenerationError::from_message(message)));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl StoryDriver for ScriptedDriver {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(GenerationError::new(GenerationErrorKind::Unknown(
                "script exhausted".to_string(),
            )))
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-v1"
    }
}

/// A well-formed response with the given narrative and option prefix.
pub fn segment(narrative: &str, option_prefix: &str) -> String {
    format!(
        "{narrative}\n\nDECISION_POINT\n1. {p} one\n2. {p} two\n3. {p} three\n4. {p} four",
        p = option_prefix
    )
}
