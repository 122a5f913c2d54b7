//! Core story data types for Novel Diver.
//!
//! This crate holds the narrative units the rest of the workspace operates on:
//! the protagonist ([`Character`]), the settings a story can take place in
//! ([`World`]), and the append-only session record ([`StoryHistory`]) built
//! from [`StoryChunk`]s and [`DecisionEntry`]s.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod history;
mod world;

pub use character::Character;
pub use history::{DecisionEntry, StoryChunk, StoryHistory};
pub use world::World;
