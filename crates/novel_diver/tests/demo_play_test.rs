use novel_diver::{
    BackendId, BackendRegistry, Character, Credentials, FileSystemStoryStore, NovelDiverConfig,
    SessionState, StorySession, StoryStore,
};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn demo_story_plays_and_saves_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut config = NovelDiverConfig::default();
    config.storage.stories_dir = Some(dir.path().to_path_buf());

    let mut registry = BackendRegistry::new(config.backend_settings(), Credentials::demo());
    let backend = registry.resolve(None).unwrap();
    assert_eq!(backend.id(), BackendId::Demo);

    let mut session = StorySession::new(Arc::new(config.story_engine()));
    session
        .set_character(Character::create_sample("cultivation"))
        .unwrap();

    let opening = session.start(&*backend).await.unwrap();
    assert!(!opening.text().is_empty());
    assert_eq!(opening.decision_options().len(), 4);

    session.choose(&*backend, 2).await.unwrap();
    assert_eq!(session.state(), SessionState::AwaitingChoice);

    let store = FileSystemStoryStore::new(config.storage.resolved_stories_dir()).unwrap();
    let history = session.history().unwrap();
    store.save_history(&config.storage.owner, history).await.unwrap();

    let loaded = store
        .load_history(&config.storage.owner, history.session_id())
        .await
        .unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.decisions().len(), 1);
    assert_eq!(loaded.character_name(), "Li Wei");
}
