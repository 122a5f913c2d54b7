//! Interactive story loop.

use super::{Console, report};
use novel_diver::{
    BackendId, BackendRegistry, Character, Credentials, FileSystemStoryStore, NovelDiverConfig,
    StoryDriver, StorySession, StoryStore, World,
};
use std::error::Error;
use std::sync::Arc;
use tracing::{info, warn};

/// Options for `novel_diver play`.
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub world: Option<String>,
    pub sample: bool,
    pub backend: Option<BackendId>,
    pub resume: Option<String>,
    pub no_save: bool,
}

/// Run a story until the player quits or stdin closes.
pub async fn play(
    config: &NovelDiverConfig,
    credentials: Credentials,
    options: PlayOptions,
) -> Result<(), Box<dyn Error>> {
    let mut registry = BackendRegistry::new(config.backend_settings(), credentials);
    let backend = registry.resolve(options.backend.or(Some(config.preferred_backend)))?;
    println!("Story engine: {} ({})", backend.id(), backend.model_name());

    let store = FileSystemStoryStore::new(config.storage.resolved_stories_dir())?;
    let owner = config.storage.owner.as_str();
    let mut session = StorySession::new(Arc::new(config.story_engine()));
    let mut console = Console::new();

    if let Some(session_id) = &options.resume {
        let history = store.load_history(owner, session_id).await?;
        session.resume(history);
        if let Some(history) = session.history() {
            println!("\n{}", history.full_story_text());
        }
    } else {
        let Some(character) = create_character(&mut console, &options).await? else {
            return Ok(());
        };
        session.set_character(character)?;
        if let Some(character) = session.character() {
            println!("\nYour protagonist: {}", character);
        }

        loop {
            match session.start(&*backend).await {
                Ok(chunk) => {
                    print_chapter(1, chunk.text());
                    break;
                }
                Err(e) => {
                    report(&e);
                    match console.ask("\n[r] try again  [q] quit > ").await? {
                        Some(answer) if answer.eq_ignore_ascii_case("r") => continue,
                        _ => return Ok(()),
                    }
                }
            }
        }
    }

    loop {
        if !options.no_save {
            autosave(&store, owner, &session).await;
        }

        print_options(&session);
        let Some(input) = console.ask("> ").await? else {
            break;
        };

        let outcome = match input.to_lowercase().as_str() {
            "q" => break,
            "s" => {
                if let Some(history) = session.history() {
                    println!("\n{}", history.full_story_text());
                }
                continue;
            }
            "r" => session.retry(&*backend).await.map(|chunk| chunk.text().clone()),
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 => session
                    .choose(&*backend, n - 1)
                    .await
                    .map(|chunk| chunk.text().clone()),
                _ => {
                    println!("Enter an option number, r, s or q.");
                    continue;
                }
            },
        };

        match outcome {
            Ok(text) => {
                let chapter = session.history().map(|h| h.len()).unwrap_or_default();
                print_chapter(chapter, &text);
            }
            Err(e) => report(&e),
        }
    }

    if let Some(history) = session.history() {
        println!("\nStory saved as \"{}\".", history.session_id());
    }
    Ok(())
}

async fn autosave(store: &dyn StoryStore, owner: &str, session: &StorySession) {
    let Some(history) = session.history() else {
        return;
    };
    if let Err(e) = store.save_history(owner, history).await {
        warn!(error = %e, "Auto-save failed");
        eprintln!("Warning: could not save the story: {}", e);
    } else {
        info!(session_id = %history.session_id(), "Story saved");
    }
}

fn print_chapter(number: usize, text: &str) {
    println!("\n--- Chapter {} ---\n\n{}", number, text);
}

fn print_options(session: &StorySession) {
    println!("\nWhat do you do?");
    for (i, option) in session.current_options().iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
    if session.has_pending_decision() {
        println!("  [r] retry your last choice");
    }
    println!("  [s] story so far  [q] quit");
}

async fn create_character(
    console: &mut Console,
    options: &PlayOptions,
) -> Result<Option<Character>, Box<dyn Error>> {
    if options.sample {
        let world = options.world.as_deref().unwrap_or("fantasy");
        return Ok(Some(Character::create_sample(world)));
    }

    let world = match &options.world {
        Some(world) => world.clone(),
        None => match choose_world(console).await? {
            Some(world) => world,
            None => return Ok(None),
        },
    };

    println!("\nCreate your protagonist.");
    loop {
        let Some(name) = console.ask("Name: ").await? else {
            return Ok(None);
        };
        let Some(background) = console.ask("Background: ").await? else {
            return Ok(None);
        };
        let Some(traits) = console.ask("Personality traits (comma separated): ").await? else {
            return Ok(None);
        };
        let Some(goals) = console.ask("Goals: ").await? else {
            return Ok(None);
        };

        let traits = traits
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        let character = Character::new(name, background, traits, goals, world.as_str());
        match character.validate() {
            Ok(()) => return Ok(Some(character)),
            Err(e) => {
                println!("\nPlease fix the following:");
                for issue in &e.issues {
                    println!("  - {}", issue);
                }
                println!();
            }
        }
    }
}

async fn choose_world(console: &mut Console) -> Result<Option<String>, Box<dyn Error>> {
    let worlds: Vec<World> = World::all().collect();
    println!("Choose a world:");
    for (i, world) in worlds.iter().enumerate() {
        println!("  {}. {}", i + 1, world.display_name());
    }

    let Some(answer) = console.ask("World [3]: ").await? else {
        return Ok(None);
    };
    let world = match answer.parse::<usize>() {
        Ok(n) if (1..=worlds.len()).contains(&n) => worlds[n - 1],
        _ if answer.is_empty() => World::default(),
        _ => World::resolve(&answer),
    };
    Ok(Some(world.as_ref().to_string()))
}
