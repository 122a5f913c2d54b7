//! World template lookup with built-in fallbacks.

use novel_diver_core::World;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Somewhere world templates can be looked up by identifier.
///
/// `None` means the source has no template for that world.
pub trait WorldTemplateSource: Send + Sync {
    /// Template text for `world`, if the source has one.
    fn template(&self, world: &str) -> Option<String>;
}

/// Reads `<dir>/<world>.txt`.
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    dir: PathBuf,
}

impl FileTemplateStore {
    /// Look for templates under `dir`. The directory does not need to exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory templates are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, world: &str) -> Option<PathBuf> {
        let safe = !world.is_empty()
            && world
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        safe.then(|| self.dir.join(format!("{}.txt", world)))
    }
}

impl WorldTemplateSource for FileTemplateStore {
    fn template(&self, world: &str) -> Option<String> {
        let path = self.path_for(world)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), "Loaded world template");
                Some(text.trim().to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read world template");
                None
            }
        }
    }
}

/// Templates held in memory, keyed by world identifier.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplates {
    templates: HashMap<String, String>,
}

impl InMemoryTemplates {
    /// Empty source; every lookup falls back to the built-ins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template.
    pub fn with_template(mut self, world: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.insert(world.into(), text.into());
        self
    }
}

impl WorldTemplateSource for InMemoryTemplates {
    fn template(&self, world: &str) -> Option<String> {
        self.templates.get(world).cloned()
    }
}

/// Template text for `world`. Never fails.
///
/// Blank templates count as absent. Without a template the built-in
/// description for the world is used, and unknown worlds get fantasy's.
pub fn resolve_world_template(source: &dyn WorldTemplateSource, world: &str) -> String {
    match source.template(world) {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            debug!(world, "Using built-in world description");
            World::resolve(world).default_description().to_string()
        }
    }
}
