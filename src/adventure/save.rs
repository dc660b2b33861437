//! Player save file.
//!
//! The save is a small XML document:
//!
//! ```text
//! <Player>
//!   <Stats>
//!     <CurrentHitPoints>10</CurrentHitPoints>
//!     <MaximumHitPoints>10</MaximumHitPoints>
//!     <Gold>20</Gold>
//!     <ExperiencePoints>0</ExperiencePoints>
//!     <CurrentLocation>1</CurrentLocation>
//!   </Stats>
//!   <InventoryItems>
//!     <InventoryItem ID="1" Quantity="1"/>
//!   </InventoryItems>
//!   <PlayerQuests>
//!     <PlayerQuest ID="1" IsCompleted="False"/>
//!   </PlayerQuests>
//! </Player>
//! ```
//!
//! `MaximumHitPoints` is written so older readers keep working but is derived
//! from experience on load. The selected weapon is not saved.
//!
//! Writes take an exclusive lock on a `<save>.lock` sibling, fill a temp file
//! and rename it over the save, so a failed or interrupted write never leaves
//! an empty or half-written document behind.

use fs2::FileExt;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::adventure::controller::Rules;
use crate::adventure::errors::AdventureError;
use crate::adventure::types::{InventoryItem, ItemId, LocationId, Player, PlayerQuest, QuestId};
use crate::adventure::world::World;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "Player")]
struct PlayerDocument {
    #[serde(rename = "Stats")]
    stats: StatsBlock,
    #[serde(rename = "InventoryItems", default)]
    inventory: InventoryBlock,
    #[serde(rename = "PlayerQuests", default)]
    quests: QuestBlock,
}

#[derive(Debug, Serialize, Deserialize)]
struct StatsBlock {
    #[serde(rename = "CurrentHitPoints")]
    current_hit_points: i32,
    #[serde(rename = "MaximumHitPoints", default)]
    maximum_hit_points: i32,
    #[serde(rename = "Gold")]
    gold: u32,
    #[serde(rename = "ExperiencePoints")]
    experience_points: u32,
    #[serde(rename = "CurrentLocation")]
    current_location: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct InventoryBlock {
    #[serde(rename = "InventoryItem", default)]
    rows: Vec<InventoryRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InventoryRow {
    #[serde(rename = "@ID")]
    id: u32,
    #[serde(rename = "@Quantity")]
    quantity: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct QuestBlock {
    #[serde(rename = "PlayerQuest", default)]
    rows: Vec<QuestRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct QuestRow {
    #[serde(rename = "@ID")]
    id: u32,
    #[serde(
        rename = "@IsCompleted",
        serialize_with = "write_flag",
        deserialize_with = "read_flag"
    )]
    is_completed: bool,
}

// Older saves spell booleans "True"/"False"; accept any casing and 1/0 too.
fn write_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *flag { "True" } else { "False" })
}

fn read_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(D::Error::custom(format!("invalid IsCompleted flag '{}'", other))),
    }
}

impl From<&Player> for PlayerDocument {
    fn from(player: &Player) -> Self {
        Self {
            stats: StatsBlock {
                current_hit_points: player.current_hit_points,
                maximum_hit_points: player.maximum_hit_points(),
                gold: player.gold,
                experience_points: player.experience_points,
                current_location: player.current_location.0,
            },
            inventory: InventoryBlock {
                rows: player
                    .inventory
                    .iter()
                    .map(|row| InventoryRow {
                        id: row.item.0,
                        quantity: row.quantity,
                    })
                    .collect(),
            },
            quests: QuestBlock {
                rows: player
                    .quests
                    .iter()
                    .map(|pq| QuestRow {
                        id: pq.quest.0,
                        is_completed: pq.is_completed,
                    })
                    .collect(),
            },
        }
    }
}

/// Render a player as a save document.
pub fn to_xml_string(player: &Player) -> Result<String, AdventureError> {
    let document = PlayerDocument::from(player);
    let mut buffer = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', 2);
    document
        .serialize(serializer)
        .map_err(|e| AdventureError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Rebuild a player from a save document, checking every id against `world`.
///
/// Duplicate inventory rows are merged and repeated quests keep their first
/// entry so the one-row-per-id invariants hold after loading.
pub fn from_xml_str(world: &World, text: &str) -> Result<Player, AdventureError> {
    let document: PlayerDocument = quick_xml::de::from_str(text)?;
    let stats = document.stats;

    let location = LocationId(stats.current_location);
    if world.location(location).is_err() {
        return Err(AdventureError::MalformedSave(format!(
            "unknown location {}",
            location
        )));
    }

    let mut player = Player::new(stats.gold, stats.experience_points, location);

    for row in document.inventory.rows {
        let item = ItemId(row.id);
        if world.item(item).is_err() {
            return Err(AdventureError::MalformedSave(format!("unknown item {}", item)));
        }
        match player.inventory.iter_mut().find(|existing| existing.item == item) {
            Some(existing) => {
                log::warn!("Save lists item {} twice; merging rows", item);
                existing.quantity =
                    existing
                        .quantity
                        .checked_add(row.quantity)
                        .ok_or_else(|| {
                            AdventureError::MalformedSave(format!(
                                "quantity overflow for item {}",
                                item
                            ))
                        })?;
            }
            None => player.inventory.push(InventoryItem::new(item, row.quantity)),
        }
    }

    for row in document.quests.rows {
        let quest = QuestId(row.id);
        if world.quest(quest).is_err() {
            return Err(AdventureError::MalformedSave(format!("unknown quest {}", quest)));
        }
        if player.quests.iter().any(|pq| pq.quest == quest) {
            log::warn!("Save lists quest {} twice; keeping the first", quest);
            continue;
        }
        player.quests.push(PlayerQuest {
            quest,
            is_completed: row.is_completed,
        });
    }

    let maximum = player.maximum_hit_points();
    if stats.current_hit_points > maximum {
        log::warn!(
            "Saved hit points {} exceed maximum {}; clamping",
            stats.current_hit_points,
            maximum
        );
    }
    player.current_hit_points = stats.current_hit_points.min(maximum);
    Ok(player)
}

/// Read and decode the save at `path`.
pub fn load_player<P: AsRef<Path>>(path: P, world: &World) -> Result<Player, AdventureError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let player = from_xml_str(world, &text)?;
    log::info!("Loaded player from {}", path.display());
    Ok(player)
}

/// Load the save at `path`, or start a fresh character when there is none yet.
///
/// A fresh character is only built from `rules` that match `world`, so the
/// first save is always one the next launch can read back.
pub fn load_or_default<P: AsRef<Path>>(
    path: P,
    world: &World,
    rules: &Rules,
) -> Result<Player, AdventureError> {
    let path = path.as_ref();
    if !path.exists() {
        rules.validate(world)?;
        log::info!("No save at {}, starting a new player", path.display());
        return Ok(rules.new_player());
    }
    load_player(path, world)
}

/// Encode `player` and write it to `path` atomically.
pub fn save_player<P: AsRef<Path>>(path: P, player: &Player) -> Result<(), AdventureError> {
    let path = path.as_ref();
    let xml = to_xml_string(player)?;
    write_atomic(path, |tmp| tmp.write_all(xml.as_bytes()))?;
    log::info!("Saved player to {}", path.display());
    Ok(())
}

fn write_atomic<F>(path: &Path, fill: F) -> std::io::Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("PlayerData.xml");

    // The target itself only ever appears through the rename below
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(dir.join(format!("{}.lock", base)))?;
    lock_file.lock_exclusive()?;

    let mut counter = 0u32;
    let (tmp_path, mut tmp) = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(tmp) => break (candidate, tmp),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };
    let written = fill(&mut tmp).and_then(|_| tmp.flush());
    if let Err(e) = written {
        drop(tmp);
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    let _ = tmp.sync_all();
    drop(tmp);

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Ok(dirf) = File::open(dir) {
        let _ = dirf.sync_all();
    }
    drop(lock_file);
    Ok(())
}
