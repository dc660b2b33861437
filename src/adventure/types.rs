use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_id!(
    /// Identifier of an item definition in the world catalog.
    ItemId
);
catalog_id!(
    /// Identifier of a monster template in the world catalog.
    MonsterId
);
catalog_id!(
    /// Identifier of a quest definition in the world catalog.
    QuestId
);
catalog_id!(
    /// Identifier of a location in the world catalog.
    LocationId
);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn short(&self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        }
    }

    pub fn parse(token: &str) -> Option<Direction> {
        match token.to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Some(Direction::North),
            "E" | "EAST" => Some(Direction::East),
            "S" | "SOUTH" => Some(Direction::South),
            "W" | "WEST" => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

/// Capability tag carried by every item definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Plain,
    Weapon { min_damage: i32, max_damage: i32 },
    HealingPotion { amount_to_heal: i32 },
}

impl Default for ItemKind {
    fn default() -> Self {
        Self::Plain
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub name_plural: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    pub fn new(id: u32, name: &str, name_plural: &str) -> Self {
        Self {
            id: ItemId(id),
            name: name.to_string(),
            name_plural: name_plural.to_string(),
            kind: ItemKind::Plain,
        }
    }

    pub fn weapon(id: u32, name: &str, name_plural: &str, min_damage: i32, max_damage: i32) -> Self {
        Self {
            kind: ItemKind::Weapon {
                min_damage,
                max_damage,
            },
            ..Self::new(id, name, name_plural)
        }
    }

    pub fn healing_potion(id: u32, name: &str, name_plural: &str, amount_to_heal: i32) -> Self {
        Self {
            kind: ItemKind::HealingPotion { amount_to_heal },
            ..Self::new(id, name, name_plural)
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon { .. })
    }

    pub fn is_healing_potion(&self) -> bool {
        matches!(self.kind, ItemKind::HealingPotion { .. })
    }

    /// Singular or plural display name for `quantity` of this item.
    pub fn name_for(&self, quantity: u32) -> &str {
        if quantity == 1 {
            &self.name
        } else {
            &self.name_plural
        }
    }
}

/// Entry in a monster's loot table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootItem {
    pub item: ItemId,
    /// Chance in percent (1-100) that the item drops.
    pub drop_percentage: u32,
    /// Granted when no probabilistic roll succeeds.
    #[serde(default)]
    pub is_default_item: bool,
}

impl LootItem {
    pub fn new(item: ItemId, drop_percentage: u32, is_default_item: bool) -> Self {
        Self {
            item,
            drop_percentage,
            is_default_item,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
    pub maximum_damage: i32,
    pub reward_experience_points: u32,
    pub reward_gold: u32,
    pub maximum_hit_points: i32,
    /// Templates in the catalog keep this at the maximum; combat copies count down.
    #[serde(default)]
    pub current_hit_points: i32,
    #[serde(default)]
    pub loot_table: Vec<LootItem>,
}

impl Monster {
    pub fn new(
        id: u32,
        name: &str,
        maximum_damage: i32,
        reward_experience_points: u32,
        reward_gold: u32,
        maximum_hit_points: i32,
    ) -> Self {
        Self {
            id: MonsterId(id),
            name: name.to_string(),
            maximum_damage,
            reward_experience_points,
            reward_gold,
            maximum_hit_points,
            current_hit_points: maximum_hit_points,
            loot_table: Vec::new(),
        }
    }

    pub fn with_loot(mut self, item: ItemId, drop_percentage: u32, is_default_item: bool) -> Self {
        self.loot_table
            .push(LootItem::new(item, drop_percentage, is_default_item));
        self
    }

    /// Independent combat copy of a template: full hit points, own loot table.
    pub fn spawn(&self) -> Self {
        Self {
            current_hit_points: self.maximum_hit_points,
            loot_table: self.loot_table.clone(),
            ..self.clone()
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current_hit_points <= 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestCompletionItem {
    pub item: ItemId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub completion_items: Vec<QuestCompletionItem>,
    pub reward_experience_points: u32,
    pub reward_gold: u32,
    pub reward_item: ItemId,
}

impl Quest {
    pub fn new(
        id: u32,
        name: &str,
        description: &str,
        reward_experience_points: u32,
        reward_gold: u32,
        reward_item: ItemId,
    ) -> Self {
        Self {
            id: QuestId(id),
            name: name.to_string(),
            description: description.to_string(),
            completion_items: Vec::new(),
            reward_experience_points,
            reward_gold,
            reward_item,
        }
    }

    pub fn with_completion_item(mut self, item: ItemId, quantity: u32) -> Self {
        self.completion_items
            .push(QuestCompletionItem { item, quantity });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub item_required_to_enter: Option<ItemId>,
    #[serde(default)]
    pub quest_available_here: Option<QuestId>,
    #[serde(default)]
    pub monster_living_here: Option<MonsterId>,
    #[serde(default)]
    pub exits: BTreeMap<Direction, LocationId>,
}

impl Location {
    pub fn new(id: u32, name: &str, description: &str) -> Self {
        Self {
            id: LocationId(id),
            name: name.to_string(),
            description: description.to_string(),
            item_required_to_enter: None,
            quest_available_here: None,
            monster_living_here: None,
            exits: BTreeMap::new(),
        }
    }

    pub fn with_required_item(mut self, item: ItemId) -> Self {
        self.item_required_to_enter = Some(item);
        self
    }

    pub fn with_quest(mut self, quest: QuestId) -> Self {
        self.quest_available_here = Some(quest);
        self
    }

    pub fn with_monster(mut self, monster: MonsterId) -> Self {
        self.monster_living_here = Some(monster);
        self
    }

    pub fn with_exit(mut self, direction: Direction, destination: LocationId) -> Self {
        self.exits.insert(direction, destination);
        self
    }

    pub fn exit(&self, direction: Direction) -> Option<LocationId> {
        self.exits.get(&direction).copied()
    }

    /// Directions that lead somewhere, in N/E/S/W order.
    pub fn available_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.exits.contains_key(d))
            .collect()
    }
}

/// A row of the player's inventory. Rows stay in place at quantity zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub item: ItemId,
    pub quantity: u32,
}

impl InventoryItem {
    pub fn new(item: ItemId, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerQuest {
    pub quest: QuestId,
    pub is_completed: bool,
}

impl PlayerQuest {
    pub fn new(quest: QuestId) -> Self {
        Self {
            quest,
            is_completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub gold: u32,
    pub experience_points: u32,
    /// Kept within `[0, maximum_hit_points()]` by the controller, not by this type.
    pub current_hit_points: i32,
    pub current_location: LocationId,
    pub inventory: Vec<InventoryItem>,
    pub quests: Vec<PlayerQuest>,
    /// Weapon picked for the next attack. Not persisted.
    pub current_weapon: Option<ItemId>,
}

impl Player {
    pub fn new(gold: u32, experience_points: u32, current_location: LocationId) -> Self {
        let mut player = Self {
            gold,
            experience_points,
            current_hit_points: 0,
            current_location,
            inventory: Vec::new(),
            quests: Vec::new(),
            current_weapon: None,
        };
        player.current_hit_points = player.maximum_hit_points();
        player
    }

    /// A brand new character: no experience, full health, one of each starting item.
    pub fn new_default(home: LocationId, starting_gold: u32, starting_items: &[ItemId]) -> Self {
        let mut player = Self::new(starting_gold, 0, home);
        for item in starting_items {
            match player.inventory.iter_mut().find(|row| row.item == *item) {
                Some(row) => row.quantity += 1,
                None => player.inventory.push(InventoryItem::new(*item, 1)),
            }
        }
        player
    }

    pub fn level(&self) -> u32 {
        self.experience_points / 100 + 1
    }

    pub fn maximum_hit_points(&self) -> i32 {
        (self.level() as i32 + 1) * 5
    }

    pub fn heal_fully(&mut self) {
        self.current_hit_points = self.maximum_hit_points();
    }

    pub fn is_dead(&self) -> bool {
        self.current_hit_points <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_and_max_hp_follow_experience() {
        for (xp, level) in [(0, 1), (99, 1), (100, 2), (250, 3)] {
            let player = Player::new(0, xp, LocationId(1));
            assert_eq!(player.level(), level, "xp {}", xp);
            assert_eq!(player.maximum_hit_points(), (level as i32 + 1) * 5);
            assert_eq!(player.current_hit_points, player.maximum_hit_points());
        }
    }

    #[test]
    fn default_player_stacks_starting_items() {
        let player = Player::new_default(LocationId(1), 20, &[ItemId(1), ItemId(1), ItemId(7)]);
        assert_eq!(player.gold, 20);
        assert_eq!(player.experience_points, 0);
        assert_eq!(
            player.inventory,
            vec![InventoryItem::new(ItemId(1), 2), InventoryItem::new(ItemId(7), 1)]
        );
    }

    #[test]
    fn direction_parse_accepts_short_and_long() {
        assert_eq!(Direction::parse("n"), Some(Direction::North));
        assert_eq!(Direction::parse("West"), Some(Direction::West));
        assert_eq!(Direction::parse("up"), None);
        assert_eq!(Direction::South.short(), "S");
    }
}
