//! World seed loader for data-driven maps.
//!
//! A seed is a single JSON document with `items`, `monsters`, `quests` and
//! `locations` arrays. This lets a world be tweaked without recompiling.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::adventure::errors::AdventureError;
use crate::adventure::types::{Item, Location, Monster, Quest};
use crate::adventure::world::World;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSeed {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub monsters: Vec<Monster>,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl WorldSeed {
    pub fn into_world(self) -> Result<World, AdventureError> {
        World::from_parts(self.items, self.monsters, self.quests, self.locations)
    }
}

/// Parse a world seed from JSON text.
pub fn parse_world_seed(json: &str) -> Result<World, AdventureError> {
    let seed: WorldSeed = serde_json::from_str(json)?;
    seed.into_world()
}

/// Load a world from a JSON seed file on disk.
pub fn load_world_from_json<P: AsRef<Path>>(path: P) -> Result<World, AdventureError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let world = parse_world_seed(&contents)?;
    log::info!("Loaded world seed from {}", path.display());
    Ok(world)
}
