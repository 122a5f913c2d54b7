//! Saved story management.

use super::StoryCommands;
use novel_diver::{FileSystemStoryStore, NovelDiverConfig, StoryStore, World};
use std::error::Error;

/// Handle `novel_diver stories ...`.
pub async fn handle_story_command(
    config: &NovelDiverConfig,
    command: StoryCommands,
) -> Result<(), Box<dyn Error>> {
    let store = FileSystemStoryStore::new(config.storage.resolved_stories_dir())?;
    let owner = config.storage.owner.as_str();

    match command {
        StoryCommands::List => {
            let session_ids = store.list(owner).await?;
            if session_ids.is_empty() {
                println!("No saved stories in {}", store.base_path().display());
            }
            for session_id in session_ids {
                match store.load_history(owner, &session_id).await {
                    Ok(history) => println!(
                        "{}  {} ({})  {} chapters, last played {}",
                        session_id,
                        history.character_name(),
                        World::resolve(history.world()).display_name(),
                        history.len(),
                        history.last_updated().format("%Y-%m-%d %H:%M"),
                    ),
                    Err(e) => println!("{}  <unreadable: {}>", session_id, e),
                }
            }
        }
        StoryCommands::Show { session_id } => {
            let history = store.load_history(owner, &session_id).await?;
            println!(
                "{} in the {} world\n",
                history.character_name(),
                World::resolve(history.world()).display_name()
            );
            println!("{}", history.full_story_text());
            if history.pending_decision().is_none() && !history.current_options().is_empty() {
                println!("\nAwaiting a choice:");
                for (i, option) in history.current_options().iter().enumerate() {
                    println!("  {}. {}", i + 1, option);
                }
            }
        }
        StoryCommands::Delete { session_id } => {
            store.delete(owner, &session_id).await?;
            println!("Deleted {}", session_id);
        }
    }
    Ok(())
}
