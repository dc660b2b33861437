//! Game engine: world catalog, player state, quests, combat and the save file.
//!
//! The [`controller`] owns the rules of play; everything else is data and
//! small helpers it leans on. Nothing in here reads stdin or prints.

pub mod combat;
pub mod controller;
pub mod dice;
pub mod errors;
pub mod inventory;
pub mod narration;
pub mod quest;
pub mod save;
pub mod seed_loader;
pub mod types;
pub mod world;

pub use controller::{Controller, Phase, Rules};
pub use dice::{Dice, RandomDice, ScriptedDice};
pub use errors::AdventureError;
pub use inventory::{
    add_item_to_inventory, format_inventory, has_item, held_potions, held_weapons, quantity_of,
    remove_item_from_inventory,
};
pub use narration::Narration;
pub use quest::{
    accept_quest, complete_quest, completed_quest, format_quest_log,
    has_all_quest_completion_items, has_quest, mark_quest_completed,
    remove_quest_completion_items, CompletionRule,
};
pub use save::{from_xml_str, load_or_default, load_player, save_player, to_xml_string};
pub use seed_loader::{load_world_from_json, parse_world_seed, WorldSeed};
pub use types::*;
pub use world::World;
