//! # SuperAdventure - a small text adventure
//!
//! The player walks a handful of connected locations, picks up quests from the
//! locals, fights the vermin living nearby and carries loot home. Progress is
//! kept in a plain XML save file between runs.
//!
//! ## Features
//!
//! - **World Catalog**: items, monsters, quests and locations keyed by typed ids, built in or loaded from a JSON seed.
//! - **Quests**: offered on arrival, handed in automatically once the required items are carried.
//! - **Combat**: turn-based fights with weapon damage ranges, healing potions and loot tables.
//! - **Saves**: XML documents written atomically under an exclusive file lock.
//! - **Deterministic Dice**: seedable RNG for reproducible runs and a scripted dice for tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use superadventure::adventure::{Controller, Narration, Phase, RandomDice, Rules, World};
//!
//! fn main() -> anyhow::Result<()> {
//!     let world = World::standard();
//!     let rules = Rules::default();
//!     let mut player = rules.new_player();
//!     let mut controller = Controller::new(&world, RandomDice::seeded(7), rules);
//!
//!     let mut out = Narration::new();
//!     let here = player.current_location;
//!     let phase = controller.move_to(&mut player, Phase::Exploring, here, &mut out)?;
//!     for line in out.lines() {
//!         println!("{}", line);
//!     }
//!     assert!(!phase.in_combat());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`adventure`] - game engine: catalog, player state, quests, combat and saves
//! - [`session`] - text command front-end used by the binary
//! - [`config`] - TOML configuration

pub mod adventure;
pub mod config;
pub mod session;
