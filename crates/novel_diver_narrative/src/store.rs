//! Persistence boundary for story histories.
//!
//! Stores hold the serialized JSON text of a [`StoryHistory`] keyed by owner and
//! session id. The session core never calls a store; callers save after each
//! interaction and load to resume.

use async_trait::async_trait;
use novel_diver_core::StoryHistory;
use novel_diver_error::{NovelDiverResult, StorageError, StorageErrorKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Owner used when the caller has no user identity.
pub const DEFAULT_OWNER: &str = "guest";

/// Keyed storage for serialized story histories.
#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Store `json` under `owner` / `session_id`, replacing any previous copy.
    async fn save(&self, owner: &str, session_id: &str, json: &str) -> NovelDiverResult<()>;

    /// Fetch the text stored under `owner` / `session_id`.
    async fn load(&self, owner: &str, session_id: &str) -> NovelDiverResult<String>;

    /// Session ids stored for `owner`, sorted.
    async fn list(&self, owner: &str) -> NovelDiverResult<Vec<String>>;

    /// Remove a stored story.
    async fn delete(&self, owner: &str, session_id: &str) -> NovelDiverResult<()>;

    /// Serialize and store a history under its own session id.
    async fn save_history(&self, owner: &str, history: &StoryHistory) -> NovelDiverResult<()> {
        let json = history.to_json()?;
        self.save(owner, history.session_id(), &json).await
    }

    /// Load and rebuild a history.
    async fn load_history(&self, owner: &str, session_id: &str) -> NovelDiverResult<StoryHistory> {
        let json = self.load(owner, session_id).await?;
        Ok(StoryHistory::from_json(&json)?)
    }
}

/// Reject keys that could escape the store's namespace.
///
/// Session ids embed the character name, so spaces and most punctuation are
/// allowed; separators, leading dots and control characters are not.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = key.trim().is_empty()
        || key.starts_with('.')
        || key
            .chars()
            .any(|c| c == '/' || c == '\\' || c == ':' || c.is_control());
    if invalid {
        return Err(StorageError::new(StorageErrorKind::InvalidKey(
            key.to_string(),
        )));
    }
    Ok(())
}

fn validate_keys(owner: &str, session_id: &str) -> Result<(), StorageError> {
    validate_key(owner)?;
    validate_key(session_id)
}

fn not_found(owner: &str, session_id: &str) -> StorageError {
    StorageError::new(StorageErrorKind::NotFound(format!("{}/{}", owner, session_id)))
}

/// Process-local store, mostly for tests and the demo.
#[derive(Debug, Default)]
pub struct InMemoryStoryStore {
    stories: RwLock<BTreeMap<(String, String), String>>,
}

impl InMemoryStoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoryStore for InMemoryStoryStore {
    async fn save(&self, owner: &str, session_id: &str, json: &str) -> NovelDiverResult<()> {
        validate_keys(owner, session_id)?;
        self.stories
            .write()
            .await
            .insert((owner.to_string(), session_id.to_string()), json.to_string());
        Ok(())
    }

    async fn load(&self, owner: &str, session_id: &str) -> NovelDiverResult<String> {
        validate_keys(owner, session_id)?;
        let json = self
            .stories
            .read()
            .await
            .get(&(owner.to_string(), session_id.to_string()))
            .cloned()
            .ok_or_else(|| not_found(owner, session_id))?;
        Ok(json)
    }

    async fn list(&self, owner: &str) -> NovelDiverResult<Vec<String>> {
        validate_key(owner)?;
        Ok(self
            .stories
            .read()
            .await
            .keys()
            .filter(|(o, _)| o == owner)
            .map(|(_, session_id)| session_id.clone())
            .collect())
    }

    async fn delete(&self, owner: &str, session_id: &str) -> NovelDiverResult<()> {
        validate_keys(owner, session_id)?;
        self.stories
            .write()
            .await
            .remove(&(owner.to_string(), session_id.to_string()))
            .ok_or_else(|| not_found(owner, session_id))?;
        Ok(())
    }
}

/// JSON files on disk.
///
/// Layout: `{base_path}/{owner}/{session_id}.json`. Writes go to a temp file
/// that is renamed into place.
#[derive(Debug, Clone)]
pub struct FileSystemStoryStore {
    base_path: PathBuf,
}

impl FileSystemStoryStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    #[instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> NovelDiverResult<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;
        info!(path = %base_path.display(), "Opened story store");
        Ok(Self { base_path })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn story_path(&self, owner: &str, session_id: &str) -> PathBuf {
        self.base_path
            .join(owner)
            .join(format!("{}.json", session_id))
    }
}

#[async_trait]
impl StoryStore for FileSystemStoryStore {
    #[instrument(skip(self, json), fields(size = json.len()))]
    async fn save(&self, owner: &str, session_id: &str, json: &str) -> NovelDiverResult<()> {
        validate_keys(owner, session_id)?;
        let path = self.story_path(owner, session_id);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                warn!(path = %temp_path.display(), error = %cleanup, "Could not remove temp file");
            }
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
            .into());
        }

        debug!(path = %path.display(), "Saved story");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load(&self, owner: &str, session_id: &str) -> NovelDiverResult<String> {
        validate_keys(owner, session_id)?;
        let path = self.story_path(owner, session_id);
        let json = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                not_found(owner, session_id)
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;
        Ok(json)
    }

    #[instrument(skip(self))]
    async fn list(&self, owner: &str) -> NovelDiverResult<Vec<String>> {
        validate_key(owner)?;
        let dir = self.base_path.join(owner);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
                .into());
            }
        };

        let mut session_ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", dir.display(), e)))
        })? {
            let file_name = entry.file_name();
            if let Some(session_id) = file_name.to_string_lossy().strip_suffix(".json") {
                session_ids.push(session_id.to_string());
            }
        }
        session_ids.sort();
        Ok(session_ids)
    }

    #[instrument(skip(self))]
    async fn delete(&self, owner: &str, session_id: &str) -> NovelDiverResult<()> {
        validate_keys(owner, session_id)?;
        let path = self.story_path(owner, session_id);
        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                not_found(owner, session_id)
            } else {
                StorageError::new(StorageErrorKind::FileDelete(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;
        info!(path = %path.display(), "Deleted story");
        Ok(())
    }
}
