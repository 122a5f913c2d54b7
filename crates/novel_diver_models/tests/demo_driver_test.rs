use novel_diver_models::{DemoDriver, StoryDriver};

#[tokio::test]
async fn opening_prompt_gets_world_opening() {
    let driver = DemoDriver::new();
    let text = driver
        .generate("Begin an exciting martial_arts adventure. Introduce the protagonist Chen Ming")
        .await
        .unwrap();
    assert!(text.contains("Iron Fist School"));
}

#[tokio::test]
async fn continuation_comes_from_pool() {
    let driver = DemoDriver::with_seed(7);
    for _ in 0..10 {
        let text = driver
            .generate("PLAYER'S CHOSEN ACTION:\nOpen the door")
            .await
            .unwrap();
        assert!(DemoDriver::continuations().contains(&text.as_str()));
    }
}

#[tokio::test]
async fn seeded_drivers_repeat_choices() {
    let a = DemoDriver::with_seed(42);
    let b = DemoDriver::with_seed(42);
    for _ in 0..5 {
        assert_eq!(
            a.generate("continue").await.unwrap(),
            b.generate("continue").await.unwrap()
        );
    }
}

#[test]
fn demo_reports_its_identity() {
    let driver = DemoDriver::default();
    assert_eq!(driver.provider_name(), "demo");
    assert_eq!(driver.model_name(), "demo");
}
