//! Line-oriented front-end for one play session.
//!
//! Accepts terse commands (`N`, `A club`, `D`, `I`, ...), drives the
//! controller and renders a compact view after every action. The session owns
//! the player and the current phase; the binary only shuttles lines in and out.

use std::path::{Path, PathBuf};

use crate::adventure::controller::{Controller, Phase};
use crate::adventure::dice::Dice;
use crate::adventure::errors::AdventureError;
use crate::adventure::inventory::{format_inventory, held_potions, held_weapons};
use crate::adventure::narration::Narration;
use crate::adventure::quest::format_quest_log;
use crate::adventure::save::save_player;
use crate::adventure::types::{Direction, ItemId, Player};

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    /// Attack with the named weapon, or the equipped one.
    Attack(Option<String>),
    /// Drink the named potion, or the first one carried.
    Drink(Option<String>),
    Equip(String),
    Look,
    Inventory,
    Quests,
    Stats,
    Save,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Turn raw input into a [`Command`]. The verb is case-insensitive; the rest
/// of the line is kept as an item name.
pub fn parse_cmd(raw: &str) -> Command {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if trimmed.chars().all(|c| c == '?' || c.is_whitespace()) {
        return Command::Help;
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb.to_uppercase(), rest.trim()),
        None => (trimmed.to_uppercase(), ""),
    };
    let arg = if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    };

    if let Some(direction) = Direction::parse(&verb) {
        if arg.is_none() {
            return Command::Move(direction);
        }
    }

    match verb.as_str() {
        "GO" => match arg.as_deref().and_then(Direction::parse) {
            Some(direction) => Command::Move(direction),
            None => Command::Unknown(trimmed.to_string()),
        },
        "A" | "ATTACK" | "FIGHT" => Command::Attack(arg),
        "D" | "DRINK" => Command::Drink(arg),
        "EQUIP" | "WIELD" => match arg {
            Some(name) => Command::Equip(name),
            None => Command::Unknown(trimmed.to_string()),
        },
        "L" | "LOOK" => Command::Look,
        "I" | "INV" | "INVENTORY" => Command::Inventory,
        "Q" | "QUESTS" => Command::Quests,
        "STATS" | "ST" => Command::Stats,
        "SAVE" => Command::Save,
        "H" | "HELP" => Command::Help,
        "X" | "EXIT" | "QUIT" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn help_text() -> &'static str {
    "Commands:\n\
N)orth E)ast S)outh W)est - move (GO NORTH works too)\n\
A [weapon] - attack, with the equipped weapon if none is named\n\
D [potion] - drink a healing potion during a fight\n\
EQUIP <weapon> - pick the weapon A uses\n\
L)ook - describe where you are\n\
I)nventory - list what you carry\n\
Q)uests - show your quest log\n\
STATS - hit points, gold, experience and level\n\
SAVE - write the save file now\n\
X - save and quit"
}

/// What a handled command produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

pub struct GameSession<'w, D: Dice> {
    controller: Controller<'w, D>,
    player: Player,
    phase: Phase,
    save_path: PathBuf,
}

impl<'w, D: Dice> GameSession<'w, D> {
    pub fn new(controller: Controller<'w, D>, player: Player, save_path: impl Into<PathBuf>) -> Self {
        Self {
            controller,
            player,
            phase: Phase::Exploring,
            save_path: save_path.into(),
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Re-enter the saved location so its quest and monster come alive again.
    pub fn start(&mut self) -> Result<Vec<String>, AdventureError> {
        let mut out = Narration::new();
        let here = self.player.current_location;
        self.phase = self
            .controller
            .move_to(&mut self.player, Phase::Exploring, here, &mut out)?;
        let mut lines = out.into_lines();
        lines.extend(self.view());
        Ok(lines)
    }

    pub fn save(&self) -> Result<(), AdventureError> {
        save_player(&self.save_path, &self.player)
    }

    /// Run one command. If the controller fails, the phase from before the
    /// command is kept so an ongoing fight survives.
    pub fn handle(&mut self, raw: &str) -> Result<Reply, AdventureError> {
        let command = parse_cmd(raw);
        log::debug!("Command {:?}", command);
        let mut out = Narration::new();

        match command {
            Command::Move(direction) => {
                let phase = self.phase.clone();
                self.phase =
                    self.controller
                        .move_direction(&mut self.player, phase, direction, &mut out)?;
            }
            Command::Attack(name) => {
                if let Some(weapon) = self.pick_weapon(name.as_deref(), &mut out) {
                    let phase = self.phase.clone();
                    self.phase = self
                        .controller
                        .attack(&mut self.player, phase, weapon, &mut out)?;
                }
            }
            Command::Drink(name) => {
                if let Some(potion) = self.pick_potion(name.as_deref(), &mut out) {
                    let phase = self.phase.clone();
                    self.phase = self
                        .controller
                        .drink(&mut self.player, phase, potion, &mut out)?;
                }
            }
            Command::Equip(name) => {
                let world = self.controller.world();
                match world.item_by_name(&name) {
                    Some(item) if self.controller.equip(&mut self.player, item.id) => {
                        out.say(format!("You ready the {}.", item.name));
                    }
                    Some(item) => out.say(format!("You have no {} to wield.", item.name)),
                    None => out.say(format!("There is no such thing as a {}.", name)),
                }
            }
            Command::Look => {
                let location = self.controller.world().location(self.player.current_location)?;
                out.say(location.name.clone());
                out.say(location.description.clone());
                if let Some(monster) = self.phase.monster() {
                    out.say(format!(
                        "A {} is here ({}/{} HP).",
                        monster.name, monster.current_hit_points, monster.maximum_hit_points
                    ));
                }
            }
            Command::Inventory => {
                for line in format_inventory(&self.player, self.controller.world()) {
                    out.say(line);
                }
                if let Some(weapon) = self.player.current_weapon {
                    let item = self.controller.world().item(weapon)?;
                    out.say(format!("Equipped: {}", item.name));
                }
            }
            Command::Quests => {
                for line in format_quest_log(&self.player, self.controller.world()) {
                    out.say(line);
                }
            }
            Command::Stats => out.say(self.full_status_line()),
            Command::Save => {
                self.save()?;
                out.say("Game saved.");
            }
            Command::Help => {
                for line in help_text().lines() {
                    out.say(line);
                }
                return Ok(Reply {
                    lines: out.into_lines(),
                    quit: false,
                });
            }
            Command::Quit => {
                out.say("Farewell, adventurer.");
                return Ok(Reply {
                    lines: out.into_lines(),
                    quit: true,
                });
            }
            Command::Empty => {}
            Command::Unknown(text) => {
                out.say(format!("Unknown command '{}'. Type ? for help.", text));
            }
        }

        let mut lines = out.into_lines();
        lines.extend(self.view());
        Ok(Reply { lines, quit: false })
    }

    fn pick_weapon(&self, name: Option<&str>, out: &mut Narration) -> Option<ItemId> {
        let world = self.controller.world();
        match name {
            Some(name) => match world.item_by_name(name) {
                Some(item) => Some(item.id),
                None => {
                    out.say(format!("There is no such thing as a {}.", name));
                    None
                }
            },
            None => {
                let fallback = held_weapons(&self.player, world).first().map(|item| item.id);
                let weapon = self.player.current_weapon.or(fallback);
                if weapon.is_none() {
                    out.say("You have no weapon.");
                }
                weapon
            }
        }
    }

    fn pick_potion(&self, name: Option<&str>, out: &mut Narration) -> Option<ItemId> {
        let world = self.controller.world();
        match name {
            Some(name) => match world.item_by_name(name) {
                Some(item) => Some(item.id),
                None => {
                    out.say(format!("There is no such thing as a {}.", name));
                    None
                }
            },
            None => {
                let potion = held_potions(&self.player, world).first().map(|item| item.id);
                if potion.is_none() {
                    out.say("You have no potions.");
                }
                potion
            }
        }
    }

    fn status_line(&self) -> String {
        format!(
            "L{} H{}/{} X{} G{}",
            self.player.level(),
            self.player.current_hit_points,
            self.player.maximum_hit_points(),
            self.player.experience_points,
            self.player.gold
        )
    }

    fn full_status_line(&self) -> String {
        format!(
            "Level {} | HP {}/{} | XP {} | Gold {}",
            self.player.level(),
            self.player.current_hit_points,
            self.player.maximum_hit_points(),
            self.player.experience_points,
            self.player.gold
        )
    }

    /// Status, exits and the actions that make sense right now.
    fn view(&self) -> Vec<String> {
        let mut lines = vec![self.status_line()];
        if let Ok(location) = self.controller.world().location(self.player.current_location) {
            let exits: Vec<&str> = location
                .available_directions()
                .iter()
                .map(|d| d.short())
                .collect();
            if !exits.is_empty() {
                lines.push(format!("Exits {}.", exits.join(",")));
            }
        }
        let mut opts: Vec<&str> = Vec::new();
        if self.phase.in_combat() {
            if !held_weapons(&self.player, self.controller.world()).is_empty() {
                opts.push("A");
            }
            if !held_potions(&self.player, self.controller.world()).is_empty() {
                opts.push("D");
            }
        }
        opts.extend(["L", "I", "Q", "?", "X"]);
        lines.push(format!("Opts: {}", opts.join(" ")));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_directions_and_verbs() {
        assert_eq!(parse_cmd("n"), Command::Move(Direction::North));
        assert_eq!(parse_cmd(" West "), Command::Move(Direction::West));
        assert_eq!(parse_cmd("go east"), Command::Move(Direction::East));
        assert_eq!(parse_cmd("a"), Command::Attack(None));
        assert_eq!(parse_cmd("A rusty sword"), Command::Attack(Some("rusty sword".into())));
        assert_eq!(parse_cmd("d"), Command::Drink(None));
        assert_eq!(parse_cmd("equip Club"), Command::Equip("Club".into()));
        assert_eq!(parse_cmd("x"), Command::Quit);
        assert_eq!(parse_cmd(""), Command::Empty);
    }

    #[test]
    fn question_marks_mean_help() {
        for input in ["?", "  ?  ", "??"] {
            assert_eq!(parse_cmd(input), Command::Help, "input {:?}", input);
        }
    }

    #[test]
    fn junk_is_unknown() {
        assert_eq!(parse_cmd("dance"), Command::Unknown("dance".into()));
        assert_eq!(parse_cmd("equip"), Command::Unknown("equip".into()));
        assert_eq!(parse_cmd("go up"), Command::Unknown("go up".into()));
    }
}
