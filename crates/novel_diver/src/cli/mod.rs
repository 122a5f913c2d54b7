//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the novel_diver binary.

mod check;
mod commands;
mod console;
mod play;
mod report;
mod stories;
mod worlds;

pub use check::check_backends;
pub use commands::{Cli, Commands, StoryCommands};
pub use console::Console;
pub use play::{PlayOptions, play};
pub use report::report;
pub use stories::handle_story_command;
pub use worlds::list_worlds;
