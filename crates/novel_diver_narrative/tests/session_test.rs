mod test_utils;

use novel_diver_core::{Character, StoryHistory};
use novel_diver_error::{NovelDiverErrorKind, SessionErrorKind};
use novel_diver_narrative::{InMemoryTemplates, SessionState, StoryEngine, StorySession};
use novel_diver_rate_limit::RetryPolicy;
use std::sync::Arc;
use test_utils::{ScriptedDriver, segment};

fn session() -> StorySession {
    let engine = StoryEngine::new(InMemoryTemplates::new()).with_retry_policy(RetryPolicy::no_retry());
    StorySession::new(Arc::new(engine))
}

fn session_kind(err: &novel_diver_error::NovelDiverError) -> Option<&SessionErrorKind> {
    match err.kind() {
        NovelDiverErrorKind::Session(e) => Some(&e.kind),
        _ => None,
    }
}

fn assert_invariant(session: &StorySession) {
    if let Some(history) = session.history() {
        assert!(history.decisions().len() <= history.story_chunks().len());
    }
}

#[tokio::test]
async fn lifecycle_from_character_to_second_chunk() {
    let mut session = session();
    assert_eq!(session.state(), SessionState::NoCharacter);

    session
        .set_character(Character::create_sample("martial_arts"))
        .unwrap();
    assert_eq!(session.state(), SessionState::CharacterReady);

    let driver = ScriptedDriver::new()
        .then_ok(segment("The tournament begins.", "First"))
        .then_ok(segment("You win the bout.", "Second"));

    let opening = session.start(&driver).await.unwrap();
    assert_eq!(opening.text(), "The tournament begins.");
    assert_eq!(session.state(), SessionState::AwaitingChoice);
    assert_eq!(session.current_options()[2], "First three");

    let next = session.choose(&driver, 2).await.unwrap();
    assert_eq!(next.text(), "You win the bout.");

    let history = session.history().unwrap();
    assert_eq!(history.story_chunks().len(), 2);
    assert_eq!(history.decisions().len(), 1);
    assert_eq!(history.decisions()[0].decision_text(), "First three");
    assert_eq!(history.character_name(), "Chen Ming");
    assert_eq!(history.world(), "martial_arts");
    assert!(driver.last_prompt().contains("PLAYER'S CHOSEN ACTION:\nFirst three"));
    assert_invariant(&session);
}

#[tokio::test]
async fn start_without_character_is_rejected() {
    let mut session = session();
    let driver = ScriptedDriver::new();

    let err = session.start(&driver).await.unwrap_err();
    assert_eq!(session_kind(&err), Some(&SessionErrorKind::NoCharacter));
    assert_eq!(driver.calls(), 0);
}

#[tokio::test]
async fn invalid_character_is_rejected() {
    let mut session = session();
    let err = session
        .set_character(Character::new("A", "short", vec![], "", "fantasy"))
        .unwrap_err();

    assert!(matches!(err.kind(), NovelDiverErrorKind::Validation(_)));
    assert_eq!(session.state(), SessionState::NoCharacter);
}

#[tokio::test]
async fn failed_start_keeps_no_history() {
    let mut session = session();
    session
        .set_character(Character::create_sample("fantasy"))
        .unwrap();
    let driver = ScriptedDriver::new()
        .then_err("Internal server error")
        .then_ok(segment("Second try.", "Opt"));

    let err = session.start(&driver).await.unwrap_err();
    assert!(err.as_generation().is_some());
    assert!(session.history().is_none());
    assert_eq!(session.state(), SessionState::CharacterReady);

    session.start(&driver).await.unwrap();
    assert_eq!(session.history().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_continuation_keeps_decision_and_previous_options() {
    let mut session = session();
    session
        .set_character(Character::create_sample("fantasy"))
        .unwrap();
    let driver = ScriptedDriver::new()
        .then_ok(segment("Opening.", "Start"))
        .then_err("upstream connection reset")
        .then_ok(segment("Recovered.", "After"));
    session.start(&driver).await.unwrap();

    let err = session.choose(&driver, 1).await.unwrap_err();
    assert!(err.as_generation().is_some());

    let history = session.history().unwrap();
    assert_eq!(history.story_chunks().len(), 1);
    assert_eq!(history.decisions().len(), 1);
    assert!(session.has_pending_decision());
    assert_eq!(session.state(), SessionState::AwaitingChoice);
    assert_eq!(session.current_options()[1], "Start two");
    assert_invariant(&session);

    let next = session.retry(&driver).await.unwrap();
    assert_eq!(next.text(), "Recovered.");
    assert!(!session.has_pending_decision());
    let history = session.history().unwrap();
    assert_eq!(history.story_chunks().len(), 2);
    assert_eq!(history.decisions().len(), 1);
    assert_invariant(&session);
}

#[tokio::test]
async fn choosing_same_option_after_failure_retries_without_duplicate_decision() {
    let mut session = session();
    session
        .set_character(Character::create_sample("fantasy"))
        .unwrap();
    let driver = ScriptedDriver::new()
        .then_ok(segment("Opening.", "Start"))
        .then_err("timeout")
        .then_ok(segment("Recovered.", "After"));
    session.start(&driver).await.unwrap();
    session.choose(&driver, 3).await.unwrap_err();

    session.choose(&driver, 3).await.unwrap();

    let history = session.history().unwrap();
    assert_eq!(history.decisions().len(), 1);
    assert_eq!(history.story_chunks().len(), 2);
    assert_eq!(*history.decisions()[0].chosen_index(), 3);
}

#[tokio::test]
async fn choosing_other_option_while_pending_is_rejected() {
    let mut session = session();
    session
        .set_character(Character::create_sample("fantasy"))
        .unwrap();
    let driver = ScriptedDriver::new()
        .then_ok(segment("Opening.", "Start"))
        .then_err("timeout");
    session.start(&driver).await.unwrap();
    session.choose(&driver, 0).await.unwrap_err();

    let err = session.choose(&driver, 2).await.unwrap_err();
    assert_eq!(
        session_kind(&err),
        Some(&SessionErrorKind::DecisionPending { recorded: 0 })
    );
    assert_eq!(driver.calls(), 2);
    assert_eq!(session.history().unwrap().decisions().len(), 1);
}

#[tokio::test]
async fn out_of_range_choice_records_nothing() {
    let mut session = session();
    session
        .set_character(Character::create_sample("fantasy"))
        .unwrap();
    let driver = ScriptedDriver::new().then_ok(segment("Opening.", "Start"));
    session.start(&driver).await.unwrap();

    let err = session.choose(&driver, 4).await.unwrap_err();
    assert_eq!(
        session_kind(&err),
        Some(&SessionErrorKind::InvalidChoice {
            index: 4,
            available: 4
        })
    );
    assert!(session.history().unwrap().decisions().is_empty());
    assert_eq!(driver.calls(), 1);
}

#[tokio::test]
async fn retry_without_pending_decision_is_rejected() {
    let mut session = session();
    let driver = ScriptedDriver::new().then_ok(segment("Opening.", "Start"));

    let err = session.retry(&driver).await.unwrap_err();
    assert_eq!(session_kind(&err), Some(&SessionErrorKind::NoStory));

    session
        .set_character(Character::create_sample("fantasy"))
        .unwrap();
    session.start(&driver).await.unwrap();
    let err = session.retry(&driver).await.unwrap_err();
    assert_eq!(session_kind(&err), Some(&SessionErrorKind::NothingToRetry));
}

#[tokio::test]
async fn choose_before_start_is_rejected() {
    let mut session = session();
    session
        .set_character(Character::create_sample("fantasy"))
        .unwrap();
    let driver = ScriptedDriver::new();

    let err = session.choose(&driver, 0).await.unwrap_err();
    assert_eq!(session_kind(&err), Some(&SessionErrorKind::NoStory));
}

#[tokio::test]
async fn restart_returns_to_no_character() {
    let mut session = session();
    session
        .set_character(Character::create_sample("fantasy"))
        .unwrap();
    let driver = ScriptedDriver::new().then_ok(segment("Opening.", "Start"));
    session.start(&driver).await.unwrap();

    session.restart();

    assert_eq!(session.state(), SessionState::NoCharacter);
    assert!(session.history().is_none());
    assert!(session.character().is_none());
    assert!(session.current_options().is_empty());
}

#[tokio::test]
async fn new_character_discards_story_in_progress() {
    let mut session = session();
    session
        .set_character(Character::create_sample("fantasy"))
        .unwrap();
    let driver = ScriptedDriver::new().then_ok(segment("Opening.", "Start"));
    session.start(&driver).await.unwrap();

    session
        .set_character(Character::create_sample("cultivation"))
        .unwrap();

    assert_eq!(session.state(), SessionState::CharacterReady);
    assert!(session.history().is_none());
}

#[tokio::test]
async fn resumed_history_continues_with_stand_in_character() {
    let mut history = StoryHistory::new("Kara_20250101_120000", "Kara", "sci_fi");
    history.add_story_chunk("The airlock hisses.", vec!["Step out".into(), "Wait".into()]);
    let restored = StoryHistory::from_json(&history.to_json().unwrap()).unwrap();

    let mut session = session();
    session.resume(restored);
    assert_eq!(session.state(), SessionState::AwaitingChoice);
    assert_eq!(session.character().unwrap().name(), "Kara");

    let driver = ScriptedDriver::new().then_ok(segment("Space is quiet.", "Next"));
    session.choose(&driver, 0).await.unwrap();

    let prompt = driver.last_prompt();
    assert!(prompt.contains("Name: Kara"));
    assert!(prompt.contains("World: sci_fi"));
    assert!(prompt.contains("The airlock hisses."));
    assert_eq!(session.history().unwrap().len(), 2);
}

#[tokio::test]
async fn many_failures_never_break_invariant() {
    let mut session = session();
    session
        .set_character(Character::create_sample("fantasy"))
        .unwrap();
    let mut driver = ScriptedDriver::new().then_ok(segment("Opening.", "Start"));
    for round in 0..5 {
        driver = driver.then_err("boom").then_ok(segment(&format!("Chapter {}", round), "Opt"));
    }
    session.start(&driver).await.unwrap();

    for _ in 0..5 {
        assert!(session.choose(&driver, 0).await.is_err());
        assert_invariant(&session);
        session.retry(&driver).await.unwrap();
        assert_invariant(&session);
    }

    let history = session.history().unwrap();
    assert_eq!(history.story_chunks().len(), 6);
    assert_eq!(history.decisions().len(), 5);
}
