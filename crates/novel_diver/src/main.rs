//! Novel Diver CLI binary.
//!
//! This binary provides command-line access to Novel Diver:
//! - Play a story interactively in the terminal
//! - List, show and delete saved stories
//! - Inspect worlds and verify backend credentials

use clap::Parser;
use novel_diver::{Credentials, NovelDiverConfig, init_tracing};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, PlayOptions, check_backends, handle_story_command, list_worlds, play};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Credentials may come from a .env file
    dotenvy::dotenv().ok();

    init_tracing(cli.verbose, cli.log_format)?;

    let config = match &cli.config {
        Some(path) => NovelDiverConfig::load_layered(Some(path.as_path()), None)?,
        None => NovelDiverConfig::load()?,
    };
    let credentials = Credentials::from_lookup(|key| std::env::var(key).ok());

    // Execute the requested command
    match cli.command {
        Commands::Play {
            world,
            sample,
            backend,
            resume,
            no_save,
        } => {
            let options = PlayOptions {
                world,
                sample,
                backend,
                resume,
                no_save,
            };
            play(&config, credentials, options).await?;
        }

        Commands::Stories(story_cmd) => {
            handle_story_command(&config, story_cmd).await?;
        }

        Commands::Worlds => {
            list_worlds(&config);
        }

        Commands::Check => {
            if !check_backends(&config, credentials).await {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
