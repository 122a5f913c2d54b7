mod test_utils;

use novel_diver_core::{Character, StoryHistory};
use novel_diver_error::GenerationErrorKind;
use novel_diver_narrative::{InMemoryTemplates, ParseRecovery, StoryEngine};
use novel_diver_rate_limit::RetryPolicy;
use std::time::Duration;
use test_utils::{ScriptedDriver, segment};

fn engine() -> StoryEngine {
    StoryEngine::new(
        InMemoryTemplates::new().with_template("cultivation", "CUSTOM CULTIVATION TEMPLATE"),
    )
}

#[tokio::test]
async fn start_story_sends_opening_prompt_and_parses_reply() {
    let driver = ScriptedDriver::new().then_ok(segment("You awaken.", "Path"));
    let character = Character::create_sample("cultivation");

    let parsed = engine().start_story(&driver, &character).await.unwrap();

    assert_eq!(parsed.narrative(), "You awaken.");
    assert_eq!(parsed.options()[0], "Path one");
    assert_eq!(*parsed.recovery(), ParseRecovery::Complete);

    let prompt = driver.last_prompt();
    assert!(prompt.contains("CUSTOM CULTIVATION TEMPLATE"));
    assert!(prompt.contains("Name: Li Wei"));
    assert!(prompt.contains("Begin an exciting cultivation adventure"));
}

#[tokio::test]
async fn unknown_world_uses_fantasy_description() {
    let driver = ScriptedDriver::new().then_ok("No options here");
    let character = Character::new("Mira", "A wandering bard", vec![], "Find a song", "steampunk");

    let parsed = engine().start_story(&driver, &character).await.unwrap();

    assert_eq!(*parsed.recovery(), ParseRecovery::MissingDelimiter);
    assert!(driver.last_prompt().contains("A magical realm with wizards, dragons, and epic quests."));
    assert!(driver.last_prompt().contains("World: steampunk"));
}

#[tokio::test]
async fn continuation_prompt_carries_context_and_choice() {
    let mut history = StoryHistory::new("Li Wei_20250101_120000", "Li Wei", "cultivation");
    history.add_story_chunk("The sect gates loom.", vec!["Enter".into(), "Leave".into()]);
    history.add_decision(0).unwrap();

    let driver = ScriptedDriver::new().then_ok(segment("Inside the hall.", "Next"));
    let parsed = engine()
        .continue_story(&driver, &history, "Enter")
        .await
        .unwrap();

    assert_eq!(parsed.narrative(), "Inside the hall.");
    let prompt = driver.last_prompt();
    assert!(prompt.contains("PREVIOUS STORY CONTEXT:\nThe sect gates loom."));
    assert!(prompt.contains("PLAYER'S CHOSEN ACTION:\nEnter"));
    assert!(prompt.contains("Name: Li Wei"));
    assert!(prompt.contains("CUSTOM CULTIVATION TEMPLATE"));
}

#[tokio::test]
async fn context_window_is_configurable() {
    let mut history = StoryHistory::new("s", "Hero", "fantasy");
    for i in 0..4 {
        history.add_story_chunk(format!("Chapter text {}", i), vec!["Go".into()]);
        history.add_decision(0).unwrap();
    }

    let driver = ScriptedDriver::new().then_ok(segment("More.", "Opt"));
    engine()
        .with_context_chunks(1)
        .continue_story(&driver, &history, "Go")
        .await
        .unwrap();

    let prompt = driver.last_prompt();
    assert!(prompt.contains("Chapter text 3"));
    assert!(!prompt.contains("Chapter text 2"));
}

#[tokio::test(start_paused = true)]
async fn rate_limited_generation_is_retried() {
    let driver = ScriptedDriver::new()
        .then_err("429 Too Many Requests")
        .then_err("Resource exhausted: quota")
        .then_ok(segment("Finally.", "Opt"));
    let character = Character::create_sample("fantasy");

    let start = tokio::time::Instant::now();
    let parsed = engine().start_story(&driver, &character).await.unwrap();

    assert_eq!(parsed.narrative(), "Finally.");
    assert_eq!(driver.calls(), 3);
    assert!(start.elapsed() >= Duration::from_secs(3));
    assert_eq!(driver.prompts()[0], driver.prompts()[2]);
}

#[tokio::test(start_paused = true)]
async fn rate_limit_exhaustion_surfaces_quota_error() {
    let driver = ScriptedDriver::new()
        .then_err("429")
        .then_err("429")
        .then_err("429");
    let character = Character::create_sample("fantasy");

    let err = engine()
        .with_retry_policy(RetryPolicy::new(2, Duration::from_millis(10)))
        .start_story(&driver, &character)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, GenerationErrorKind::Quota(_)));
    assert_eq!(driver.calls(), 3);
}

#[tokio::test]
async fn authentication_failure_is_not_retried() {
    let driver = ScriptedDriver::new()
        .then_err("API key not valid. Please pass a valid API key.")
        .then_ok(segment("Unreachable", "Opt"));
    let character = Character::create_sample("fantasy");

    let err = engine().start_story(&driver, &character).await.unwrap_err();

    assert!(matches!(err.kind, GenerationErrorKind::Authentication(_)));
    assert_eq!(driver.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn authentication_failure_mentioning_quota_is_not_retried() {
    let driver = ScriptedDriver::new()
        .then_err("401 Unauthorized: API key invalid for quota project")
        .then_err("401 Unauthorized: API key invalid for quota project")
        .then_err("401 Unauthorized: API key invalid for quota project")
        .then_err("401 Unauthorized: API key invalid for quota project");
    let character = Character::create_sample("fantasy");

    let start = tokio::time::Instant::now();
    let err = engine().start_story(&driver, &character).await.unwrap_err();

    assert!(matches!(err.kind, GenerationErrorKind::Authentication(_)));
    assert_eq!(driver.calls(), 1);
    assert!(start.elapsed() < Duration::from_millis(1));
}
