//! World listing.

use novel_diver::{NovelDiverConfig, World};

/// Print every built-in world with the template text it resolves to.
pub fn list_worlds(config: &NovelDiverConfig) {
    let engine = config.story_engine();
    for world in World::all() {
        println!("{} ({})", world.display_name(), world.as_ref());
        println!("    {}\n", engine.world_template(world.as_ref()));
    }
}
