//! Read-only world catalog: items, monster templates, quests and locations.
//!
//! [`World::standard`] builds the stock map that ships with the game. Custom
//! worlds come from JSON seeds (see [`crate::adventure::seed_loader`]) and go
//! through the same reference checks in [`World::from_parts`].

use std::collections::BTreeMap;

use crate::adventure::errors::AdventureError;
use crate::adventure::types::{
    Direction, Item, ItemId, Location, LocationId, Monster, MonsterId, Quest, QuestId,
};

pub const ITEM_RUSTY_SWORD: ItemId = ItemId(1);
pub const ITEM_RAT_TAIL: ItemId = ItemId(2);
pub const ITEM_PIECE_OF_FUR: ItemId = ItemId(3);
pub const ITEM_SNAKE_FANG: ItemId = ItemId(4);
pub const ITEM_SNAKESKIN: ItemId = ItemId(5);
pub const ITEM_CLUB: ItemId = ItemId(6);
pub const ITEM_HEALING_POTION: ItemId = ItemId(7);
pub const ITEM_SPIDER_FANG: ItemId = ItemId(8);
pub const ITEM_SPIDER_SILK: ItemId = ItemId(9);
pub const ITEM_ADVENTURER_PASS: ItemId = ItemId(10);

pub const MONSTER_RAT: MonsterId = MonsterId(1);
pub const MONSTER_SNAKE: MonsterId = MonsterId(2);
pub const MONSTER_GIANT_SPIDER: MonsterId = MonsterId(3);

pub const QUEST_CLEAR_ALCHEMIST_GARDEN: QuestId = QuestId(1);
pub const QUEST_CLEAR_FARMERS_FIELD: QuestId = QuestId(2);

pub const LOCATION_HOME: LocationId = LocationId(1);
pub const LOCATION_TOWN_SQUARE: LocationId = LocationId(2);
pub const LOCATION_GUARD_POST: LocationId = LocationId(3);
pub const LOCATION_ALCHEMIST_HUT: LocationId = LocationId(4);
pub const LOCATION_ALCHEMISTS_GARDEN: LocationId = LocationId(5);
pub const LOCATION_FARMHOUSE: LocationId = LocationId(6);
pub const LOCATION_FARM_FIELD: LocationId = LocationId(7);
pub const LOCATION_BRIDGE: LocationId = LocationId(8);
pub const LOCATION_SPIDER_FIELD: LocationId = LocationId(9);

#[derive(Debug, Clone)]
pub struct World {
    items: BTreeMap<ItemId, Item>,
    monsters: BTreeMap<MonsterId, Monster>,
    quests: BTreeMap<QuestId, Quest>,
    locations: BTreeMap<LocationId, Location>,
}

impl World {
    /// Assemble a world and check that every cross reference resolves.
    pub fn from_parts(
        items: Vec<Item>,
        monsters: Vec<Monster>,
        quests: Vec<Quest>,
        locations: Vec<Location>,
    ) -> Result<Self, AdventureError> {
        let world = Self {
            items: items.into_iter().map(|i| (i.id, i)).collect(),
            monsters: monsters
                .into_iter()
                .map(|m| (m.id, m.spawn()))
                .collect(),
            quests: quests.into_iter().map(|q| (q.id, q)).collect(),
            locations: locations.into_iter().map(|l| (l.id, l)).collect(),
        };
        world.validate()?;
        Ok(world)
    }

    fn validate(&self) -> Result<(), AdventureError> {
        for monster in self.monsters.values() {
            for loot in &monster.loot_table {
                self.item(loot.item)?;
                if loot.drop_percentage > 100 {
                    return Err(AdventureError::InvalidWorld(format!(
                        "{} drops item {} at {}%",
                        monster.name, loot.item, loot.drop_percentage
                    )));
                }
            }
        }
        for quest in self.quests.values() {
            self.item(quest.reward_item)?;
            for qci in &quest.completion_items {
                self.item(qci.item)?;
            }
        }
        for location in self.locations.values() {
            if let Some(item) = location.item_required_to_enter {
                self.item(item)?;
            }
            if let Some(quest) = location.quest_available_here {
                self.quest(quest)?;
            }
            if let Some(monster) = location.monster_living_here {
                self.monster(monster)?;
            }
            for destination in location.exits.values() {
                self.location(*destination)?;
            }
        }
        Ok(())
    }

    pub fn item(&self, id: ItemId) -> Result<&Item, AdventureError> {
        self.items.get(&id).ok_or(AdventureError::UnknownItem(id))
    }

    pub fn monster(&self, id: MonsterId) -> Result<&Monster, AdventureError> {
        self.monsters
            .get(&id)
            .ok_or(AdventureError::UnknownMonster(id))
    }

    pub fn quest(&self, id: QuestId) -> Result<&Quest, AdventureError> {
        self.quests.get(&id).ok_or(AdventureError::UnknownQuest(id))
    }

    pub fn location(&self, id: LocationId) -> Result<&Location, AdventureError> {
        self.locations
            .get(&id)
            .ok_or(AdventureError::UnknownLocation(id))
    }

    /// Fresh combat instance of a monster template.
    pub fn spawn_monster(&self, id: MonsterId) -> Result<Monster, AdventureError> {
        Ok(self.monster(id)?.spawn())
    }

    /// Case-insensitive lookup by singular or plural name.
    pub fn item_by_name(&self, name: &str) -> Option<&Item> {
        let wanted = name.trim();
        self.items.values().find(|item| {
            item.name.eq_ignore_ascii_case(wanted) || item.name_plural.eq_ignore_ascii_case(wanted)
        })
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// The stock world: a small town, two quests and three kinds of vermin.
    pub fn standard() -> Self {
        let items = vec![
            Item::weapon(ITEM_RUSTY_SWORD.0, "Rusty sword", "Rusty swords", 0, 5),
            Item::new(ITEM_RAT_TAIL.0, "Rat tail", "Rat tails"),
            Item::new(ITEM_PIECE_OF_FUR.0, "Piece of fur", "Pieces of fur"),
            Item::new(ITEM_SNAKE_FANG.0, "Snake fang", "Snake fangs"),
            Item::new(ITEM_SNAKESKIN.0, "Snakeskin", "Snakeskins"),
            Item::weapon(ITEM_CLUB.0, "Club", "Clubs", 3, 10),
            Item::healing_potion(ITEM_HEALING_POTION.0, "Healing potion", "Healing potions", 5),
            Item::new(ITEM_SPIDER_FANG.0, "Spider fang", "Spider fangs"),
            Item::new(ITEM_SPIDER_SILK.0, "Spider silk", "Spider silks"),
            Item::new(ITEM_ADVENTURER_PASS.0, "Adventurer pass", "Adventurer passes"),
        ];

        let monsters = vec![
            Monster::new(MONSTER_RAT.0, "Rat", 5, 3, 10, 3)
                .with_loot(ITEM_RAT_TAIL, 75, false)
                .with_loot(ITEM_PIECE_OF_FUR, 75, true),
            Monster::new(MONSTER_SNAKE.0, "Snake", 5, 3, 10, 3)
                .with_loot(ITEM_SNAKE_FANG, 75, false)
                .with_loot(ITEM_SNAKESKIN, 75, true),
            Monster::new(MONSTER_GIANT_SPIDER.0, "Giant spider", 20, 5, 40, 10)
                .with_loot(ITEM_SPIDER_FANG, 75, true)
                .with_loot(ITEM_SPIDER_SILK, 25, false),
        ];

        let quests = vec![
            Quest::new(
                QUEST_CLEAR_ALCHEMIST_GARDEN.0,
                "Clear the alchemist's garden",
                "Kill rats in the alchemist's garden and bring back 3 rat tails. You will receive a healing potion and 10 gold pieces.",
                20,
                10,
                ITEM_HEALING_POTION,
            )
            .with_completion_item(ITEM_RAT_TAIL, 3),
            Quest::new(
                QUEST_CLEAR_FARMERS_FIELD.0,
                "Clear the farmer's field",
                "Kill snakes in the farmer's field and bring back 3 snake fangs. You will receive an adventurer's pass and 20 gold pieces.",
                20,
                20,
                ITEM_ADVENTURER_PASS,
            )
            .with_completion_item(ITEM_SNAKE_FANG, 3),
        ];

        let locations = vec![
            Location::new(
                LOCATION_HOME.0,
                "Home",
                "Your house. You really need to clean up the place.",
            )
            .with_exit(Direction::North, LOCATION_TOWN_SQUARE),
            Location::new(LOCATION_TOWN_SQUARE.0, "Town square", "You see a fountain.")
                .with_exit(Direction::North, LOCATION_ALCHEMIST_HUT)
                .with_exit(Direction::East, LOCATION_GUARD_POST)
                .with_exit(Direction::South, LOCATION_HOME)
                .with_exit(Direction::West, LOCATION_FARMHOUSE),
            Location::new(
                LOCATION_GUARD_POST.0,
                "Guard post",
                "There is a large, tough-looking guard here.",
            )
            .with_required_item(ITEM_ADVENTURER_PASS)
            .with_exit(Direction::East, LOCATION_BRIDGE)
            .with_exit(Direction::West, LOCATION_TOWN_SQUARE),
            Location::new(
                LOCATION_ALCHEMIST_HUT.0,
                "Alchemist's hut",
                "There are many strange plants on the shelves.",
            )
            .with_quest(QUEST_CLEAR_ALCHEMIST_GARDEN)
            .with_exit(Direction::North, LOCATION_ALCHEMISTS_GARDEN)
            .with_exit(Direction::South, LOCATION_TOWN_SQUARE),
            Location::new(
                LOCATION_ALCHEMISTS_GARDEN.0,
                "Alchemist's garden",
                "Many plants are growing here.",
            )
            .with_monster(MONSTER_RAT)
            .with_exit(Direction::South, LOCATION_ALCHEMIST_HUT),
            Location::new(
                LOCATION_FARMHOUSE.0,
                "Farmhouse",
                "There is a small farmhouse, with a farmer in front.",
            )
            .with_quest(QUEST_CLEAR_FARMERS_FIELD)
            .with_exit(Direction::East, LOCATION_TOWN_SQUARE)
            .with_exit(Direction::West, LOCATION_FARM_FIELD),
            Location::new(
                LOCATION_FARM_FIELD.0,
                "Farmer's field",
                "You see rows of vegetables growing here.",
            )
            .with_monster(MONSTER_SNAKE)
            .with_exit(Direction::East, LOCATION_FARMHOUSE),
            Location::new(LOCATION_BRIDGE.0, "Bridge", "A stone bridge crosses a wide river.")
                .with_exit(Direction::East, LOCATION_SPIDER_FIELD)
                .with_exit(Direction::West, LOCATION_GUARD_POST),
            Location::new(
                LOCATION_SPIDER_FIELD.0,
                "Forest",
                "You see spider webs covering the trees in this forest.",
            )
            .with_monster(MONSTER_GIANT_SPIDER)
            .with_exit(Direction::West, LOCATION_BRIDGE),
        ];

        Self {
            items: items.into_iter().map(|i| (i.id, i)).collect(),
            monsters: monsters.into_iter().map(|m| (m.id, m)).collect(),
            quests: quests.into_iter().map(|q| (q.id, q)).collect(),
            locations: locations.into_iter().map(|l| (l.id, l)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_world_references_resolve() {
        let world = World::standard();
        world.validate().expect("stock world is consistent");
        assert_eq!(world.items().count(), 10);
        assert_eq!(world.locations().count(), 9);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let world = World::standard();
        assert!(matches!(
            world.item(ItemId(99)),
            Err(AdventureError::UnknownItem(ItemId(99)))
        ));
        assert!(matches!(
            world.spawn_monster(MonsterId(42)),
            Err(AdventureError::UnknownMonster(_))
        ));
        assert!(world.quest(QuestId(0)).is_err());
        assert!(world.location(LocationId(77)).is_err());
    }

    #[test]
    fn spawned_monsters_are_independent_copies() {
        let world = World::standard();
        let mut first = world.spawn_monster(MONSTER_GIANT_SPIDER).unwrap();
        first.current_hit_points -= 7;
        let second = world.spawn_monster(MONSTER_GIANT_SPIDER).unwrap();
        assert_eq!(second.current_hit_points, 10);
        assert_eq!(world.monster(MONSTER_GIANT_SPIDER).unwrap().current_hit_points, 10);
        assert_eq!(second.loot_table.len(), 2);
    }

    #[test]
    fn dangling_exit_fails_validation() {
        let result = World::from_parts(
            vec![],
            vec![],
            vec![],
            vec![Location::new(1, "Cell", "Damp.").with_exit(Direction::North, LocationId(2))],
        );
        assert!(matches!(
            result,
            Err(AdventureError::UnknownLocation(LocationId(2)))
        ));
    }

    #[test]
    fn item_lookup_by_name_ignores_case_and_plural() {
        let world = World::standard();
        assert_eq!(world.item_by_name("rusty SWORD").unwrap().id, ITEM_RUSTY_SWORD);
        assert_eq!(world.item_by_name("healing potions").unwrap().id, ITEM_HEALING_POTION);
        assert!(world.item_by_name("banana").is_none());
    }

    #[test]
    fn drop_chance_over_hundred_fails_validation() {
        let result = World::from_parts(
            vec![Item::new(1, "Bone", "Bones")],
            vec![Monster::new(1, "Skeleton", 2, 1, 1, 4).with_loot(ItemId(1), 150, true)],
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(AdventureError::InvalidWorld(_))));
    }
}
