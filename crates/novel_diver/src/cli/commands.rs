//! CLI command definitions.

use clap::{Parser, Subcommand};
use novel_diver::{BackendId, LogFormat};
use std::path::PathBuf;

/// Novel Diver - interactive fiction where an AI writes and you decide
#[derive(Parser, Debug)]
#[command(name = "novel_diver")]
#[command(about = "Interactive fiction where an AI writes the story and you decide what happens next", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra configuration file, applied over the defaults and user files
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a story in the terminal
    Play {
        /// World identifier (cultivation, martial_arts, fantasy, sci_fi, modern_urban)
        #[arg(long)]
        world: Option<String>,

        /// Skip character creation and use the sample protagonist for the world
        #[arg(long)]
        sample: bool,

        /// Backend to try first (gemini, huggingface, demo)
        #[arg(long)]
        backend: Option<BackendId>,

        /// Continue a saved story by session id
        #[arg(long, conflicts_with_all = ["world", "sample"])]
        resume: Option<String>,

        /// Do not save the story after each chapter
        #[arg(long)]
        no_save: bool,
    },

    /// Manage saved stories
    #[command(subcommand)]
    Stories(StoryCommands),

    /// List the built-in worlds and the template each one uses
    Worlds,

    /// Verify the configured credentials against each backend
    Check,
}

/// Saved story subcommands
#[derive(Subcommand, Debug)]
pub enum StoryCommands {
    /// List saved stories
    List,

    /// Print a saved story chapter by chapter
    Show {
        /// Session id of the story
        session_id: String,
    },

    /// Delete a saved story
    Delete {
        /// Session id of the story
        session_id: String,
    },
}
