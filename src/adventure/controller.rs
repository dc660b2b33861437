//! Quest and combat state machine.
//!
//! A session is either exploring or fighting one monster. Every transition
//! takes the current [`Phase`] by value together with the player and hands
//! back the phase that follows, so no game state lives inside the controller
//! itself. Text for the player goes into a [`Narration`].
//!
//! Actions that make no sense in the current phase (attacking with nothing to
//! fight, walking into a wall, drinking a potion you do not carry) are
//! narrated and return the incoming phase untouched.

use crate::adventure::combat::{claim_victory, monster_turn};
use crate::adventure::dice::Dice;
use crate::adventure::errors::AdventureError;
use crate::adventure::inventory::{has_item, held_weapons, remove_item_from_inventory};
use crate::adventure::narration::Narration;
use crate::adventure::quest::{
    accept_quest, complete_quest, completed_quest, has_all_quest_completion_items, has_quest,
    CompletionRule,
};
use crate::adventure::types::{Direction, ItemId, ItemKind, LocationId, Monster, Player, Quest};
use crate::adventure::world::{World, ITEM_RUSTY_SWORD, LOCATION_HOME};

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Exploring,
    /// Fighting a spawned copy of a monster template.
    InCombat(Monster),
}

impl Phase {
    pub fn monster(&self) -> Option<&Monster> {
        match self {
            Phase::InCombat(monster) => Some(monster),
            Phase::Exploring => None,
        }
    }

    pub fn in_combat(&self) -> bool {
        matches!(self, Phase::InCombat(_))
    }
}

/// Tunables the controller applies on every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    /// Where a defeated player wakes up.
    pub home_location: LocationId,
    pub completion_rule: CompletionRule,
    pub starting_gold: u32,
    pub starting_items: Vec<ItemId>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            home_location: LOCATION_HOME,
            completion_rule: CompletionRule::default(),
            starting_gold: 20,
            starting_items: vec![ITEM_RUSTY_SWORD],
        }
    }
}

impl Rules {
    /// Check that the home location and every starting item exist in `world`.
    pub fn validate(&self, world: &World) -> Result<(), AdventureError> {
        world.location(self.home_location)?;
        for item in &self.starting_items {
            world.item(*item)?;
        }
        Ok(())
    }

    pub fn new_player(&self) -> Player {
        Player::new_default(self.home_location, self.starting_gold, &self.starting_items)
    }
}

pub struct Controller<'w, D: Dice> {
    world: &'w World,
    dice: D,
    rules: Rules,
}

impl<'w, D: Dice> Controller<'w, D> {
    pub fn new(world: &'w World, dice: D, rules: Rules) -> Self {
        Self { world, dice, rules }
    }

    pub fn world(&self) -> &'w World {
        self.world
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// Walk into `destination`.
    ///
    /// A missing entry item rejects the move without touching the player.
    /// Otherwise the player is healed, the local quest is offered or handed
    /// in, and a resident monster starts a fight.
    pub fn move_to(
        &mut self,
        player: &mut Player,
        phase: Phase,
        destination: LocationId,
        out: &mut Narration,
    ) -> Result<Phase, AdventureError> {
        let location = self.world.location(destination)?;

        if let Some(required) = location.item_required_to_enter {
            if !has_item(player, required) {
                let item = self.world.item(required)?;
                out.say(format!(
                    "You must have a {} to enter this location.",
                    item.name
                ));
                log::debug!("Entry to {} refused, {} not held", location.name, item.name);
                return Ok(phase);
            }
        }

        player.current_location = destination;
        player.heal_fully();
        out.say(location.name.clone());
        out.say(location.description.clone());
        log::debug!("Moved to {} ({})", location.name, destination);

        if let Some(quest_id) = location.quest_available_here {
            let quest = self.world.quest(quest_id)?;
            if !has_quest(player, quest_id) {
                self.offer_quest(player, quest, out)?;
            } else if !completed_quest(player, quest_id)
                && has_all_quest_completion_items(player, quest, self.rules.completion_rule)
            {
                self.hand_in_quest(player, quest, out)?;
            }
        }

        self.keep_weapon_selected(player);

        match location.monster_living_here {
            Some(monster_id) => {
                let monster = self.world.spawn_monster(monster_id)?;
                out.say(format!("You see a {}", monster.name));
                Ok(Phase::InCombat(monster))
            }
            None => Ok(Phase::Exploring),
        }
    }

    /// Follow the exit in `direction` from the player's current location.
    pub fn move_direction(
        &mut self,
        player: &mut Player,
        phase: Phase,
        direction: Direction,
        out: &mut Narration,
    ) -> Result<Phase, AdventureError> {
        let here = self.world.location(player.current_location)?;
        match here.exit(direction) {
            Some(destination) => self.move_to(player, phase, destination, out),
            None => {
                out.say(format!("You cannot go {} from here.", direction));
                Ok(phase)
            }
        }
    }

    /// Swing `weapon` at the monster being fought.
    pub fn attack(
        &mut self,
        player: &mut Player,
        phase: Phase,
        weapon: ItemId,
        out: &mut Narration,
    ) -> Result<Phase, AdventureError> {
        let mut monster = match phase {
            Phase::InCombat(monster) => monster,
            Phase::Exploring => {
                out.say("There is nothing here to fight.");
                return Ok(Phase::Exploring);
            }
        };

        let item = self.world.item(weapon)?;
        let (min_damage, max_damage) = match item.kind {
            ItemKind::Weapon {
                min_damage,
                max_damage,
            } => (min_damage, max_damage),
            _ => {
                out.say(format!("You cannot fight with a {}.", item.name));
                return Ok(Phase::InCombat(monster));
            }
        };
        if !has_item(player, weapon) {
            out.say(format!("You do not have a {}.", item.name));
            return Ok(Phase::InCombat(monster));
        }
        player.current_weapon = Some(weapon);

        let damage = self.dice.between(min_damage, max_damage);
        monster.current_hit_points -= damage;
        out.say(format!("You hit the {} for {} points.", monster.name, damage));

        if monster.is_dead() {
            claim_victory(self.world, &mut self.dice, player, &monster, out);
            let here = player.current_location;
            return self.move_to(player, Phase::Exploring, here, out);
        }

        self.retaliate(player, monster, out)
    }

    /// Drink a healing potion mid-fight. The monster still gets its swing.
    pub fn drink(
        &mut self,
        player: &mut Player,
        phase: Phase,
        potion: ItemId,
        out: &mut Narration,
    ) -> Result<Phase, AdventureError> {
        let monster = match phase {
            Phase::InCombat(monster) => monster,
            Phase::Exploring => {
                out.say("You can only drink potions in a fight.");
                return Ok(Phase::Exploring);
            }
        };

        let item = self.world.item(potion)?;
        let amount_to_heal = match item.kind {
            ItemKind::HealingPotion { amount_to_heal } => amount_to_heal,
            _ => {
                out.say(format!("You cannot drink a {}.", item.name));
                return Ok(Phase::InCombat(monster));
            }
        };
        if !has_item(player, potion) {
            out.say(format!("You do not have a {}.", item.name));
            return Ok(Phase::InCombat(monster));
        }

        player.current_hit_points =
            (player.current_hit_points + amount_to_heal).min(player.maximum_hit_points());
        remove_item_from_inventory(player, potion, 1);
        out.say(format!("You drink a {}", item.name));

        self.retaliate(player, monster, out)
    }

    /// Pick the weapon used when no weapon is named. Returns false if it is not a held weapon.
    pub fn equip(&self, player: &mut Player, weapon: ItemId) -> bool {
        let held = held_weapons(player, self.world)
            .iter()
            .any(|item| item.id == weapon);
        if held {
            player.current_weapon = Some(weapon);
        }
        held
    }

    fn offer_quest(
        &self,
        player: &mut Player,
        quest: &Quest,
        out: &mut Narration,
    ) -> Result<(), AdventureError> {
        accept_quest(player, quest.id);
        out.say(format!("You receive the {} quest.", quest.name));
        out.blank();
        out.say(quest.description.clone());
        out.blank();
        out.say("To complete it, return with:");
        for qci in &quest.completion_items {
            let item = self.world.item(qci.item)?;
            out.say(format!("{} {}", qci.quantity, item.name_for(qci.quantity)));
        }
        out.blank();
        log::debug!("Quest {} accepted", quest.name);
        Ok(())
    }

    fn hand_in_quest(
        &self,
        player: &mut Player,
        quest: &Quest,
        out: &mut Narration,
    ) -> Result<(), AdventureError> {
        let reward = self.world.item(quest.reward_item)?;
        complete_quest(player, quest);
        out.blank();
        out.say(format!("You complete the '{}' quest.", quest.name));
        out.say("You receive: ");
        out.say(format!("{} experience points", quest.reward_experience_points));
        out.say(format!("{} gold", quest.reward_gold));
        out.say(reward.name.clone());
        out.blank();
        log::info!("Quest {} completed", quest.name);
        Ok(())
    }

    /// The monster hits back. A killing blow sends the player home.
    fn retaliate(
        &mut self,
        player: &mut Player,
        monster: Monster,
        out: &mut Narration,
    ) -> Result<Phase, AdventureError> {
        if monster_turn(&mut self.dice, player, &monster, out) {
            let home = self.rules.home_location;
            return self.move_to(player, Phase::Exploring, home, out);
        }
        Ok(Phase::InCombat(monster))
    }

    /// Keep the selected weapon valid: if it is gone, fall back to the first one held.
    fn keep_weapon_selected(&self, player: &mut Player) {
        let still_held = match player.current_weapon {
            Some(weapon) => has_item(player, weapon),
            None => false,
        };
        if !still_held {
            player.current_weapon = held_weapons(player, self.world).first().map(|item| item.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::dice::ScriptedDice;
    use crate::adventure::inventory::{add_item_to_inventory, quantity_of};
    use crate::adventure::types::{InventoryItem, PlayerQuest};
    use crate::adventure::world::*;

    fn controller(world: &World, rolls: Vec<i32>) -> Controller<'_, ScriptedDice> {
        Controller::new(world, ScriptedDice::new(rolls), Rules::default())
    }

    fn player_at(location: LocationId) -> Player {
        let mut player = Rules::default().new_player();
        player.current_location = location;
        player
    }

    #[test]
    fn guard_rejection_leaves_player_untouched() {
        let world = World::standard();
        let mut ctl = controller(&world, vec![]);
        let mut player = player_at(LOCATION_TOWN_SQUARE);
        player.current_hit_points = 3;
        let before = player.clone();
        let mut out = Narration::new();

        let phase = ctl
            .move_to(&mut player, Phase::Exploring, LOCATION_GUARD_POST, &mut out)
            .unwrap();

        assert_eq!(phase, Phase::Exploring);
        assert_eq!(player, before);
        assert_eq!(
            out.lines(),
            ["You must have a Adventurer pass to enter this location."]
        );
    }

    #[test]
    fn moving_heals_and_accepts_quest_once() {
        let world = World::standard();
        let mut ctl = controller(&world, vec![]);
        let mut player = player_at(LOCATION_TOWN_SQUARE);
        player.current_hit_points = 1;
        let mut out = Narration::new();

        let phase = ctl
            .move_direction(&mut player, Phase::Exploring, Direction::North, &mut out)
            .unwrap();
        assert_eq!(phase, Phase::Exploring);
        assert_eq!(player.current_location, LOCATION_ALCHEMIST_HUT);
        assert_eq!(player.current_hit_points, player.maximum_hit_points());
        assert_eq!(player.quests, vec![PlayerQuest::new(QUEST_CLEAR_ALCHEMIST_GARDEN)]);
        assert!(out.mentions("You receive the Clear the alchemist's garden quest."));
        assert!(out.mentions("3 Rat tails"));

        ctl.move_to(&mut player, Phase::Exploring, LOCATION_ALCHEMIST_HUT, &mut out)
            .unwrap();
        assert_eq!(player.quests.len(), 1);
    }

    #[test]
    fn quest_hand_in_uses_strictly_greater_rule() {
        let world = World::standard();
        let mut ctl = controller(&world, vec![]);
        let mut player = player_at(LOCATION_ALCHEMIST_HUT);
        accept_quest(&mut player, QUEST_CLEAR_ALCHEMIST_GARDEN);
        player.inventory.push(InventoryItem::new(ITEM_RAT_TAIL, 3));
        let mut out = Narration::new();

        ctl.move_to(&mut player, Phase::Exploring, LOCATION_ALCHEMIST_HUT, &mut out)
            .unwrap();
        assert!(!completed_quest(&player, QUEST_CLEAR_ALCHEMIST_GARDEN));

        add_item_to_inventory(&mut player, ITEM_RAT_TAIL);
        ctl.move_to(&mut player, Phase::Exploring, LOCATION_ALCHEMIST_HUT, &mut out)
            .unwrap();
        assert!(completed_quest(&player, QUEST_CLEAR_ALCHEMIST_GARDEN));
        assert_eq!(quantity_of(&player, ITEM_RAT_TAIL), 1);
        assert_eq!(quantity_of(&player, ITEM_HEALING_POTION), 1);
        assert_eq!(player.experience_points, 20);
        assert_eq!(player.gold, 30);

        // A second visit pays nothing more.
        add_item_to_inventory(&mut player, ITEM_RAT_TAIL);
        add_item_to_inventory(&mut player, ITEM_RAT_TAIL);
        add_item_to_inventory(&mut player, ITEM_RAT_TAIL);
        ctl.move_to(&mut player, Phase::Exploring, LOCATION_ALCHEMIST_HUT, &mut out)
            .unwrap();
        assert_eq!(player.experience_points, 20);
        assert_eq!(quantity_of(&player, ITEM_RAT_TAIL), 4);
    }

    #[test]
    fn at_least_rule_hands_in_exact_count() {
        let world = World::standard();
        let rules = Rules {
            completion_rule: CompletionRule::AtLeast,
            ..Rules::default()
        };
        let mut ctl = Controller::new(&world, ScriptedDice::default(), rules);
        let mut player = player_at(LOCATION_ALCHEMIST_HUT);
        accept_quest(&mut player, QUEST_CLEAR_ALCHEMIST_GARDEN);
        player.inventory.push(InventoryItem::new(ITEM_RAT_TAIL, 3));
        let mut out = Narration::new();
        ctl.move_to(&mut player, Phase::Exploring, LOCATION_ALCHEMIST_HUT, &mut out)
            .unwrap();
        assert!(completed_quest(&player, QUEST_CLEAR_ALCHEMIST_GARDEN));
        assert_eq!(quantity_of(&player, ITEM_RAT_TAIL), 0);
    }

    #[test]
    fn entering_monster_lair_starts_combat() {
        let world = World::standard();
        let mut ctl = controller(&world, vec![]);
        let mut player = player_at(LOCATION_ALCHEMIST_HUT);
        let mut out = Narration::new();
        let phase = ctl
            .move_to(&mut player, Phase::Exploring, LOCATION_ALCHEMISTS_GARDEN, &mut out)
            .unwrap();
        let monster = phase.monster().expect("rat spawned");
        assert_eq!(monster.id, MONSTER_RAT);
        assert_eq!(monster.current_hit_points, monster.maximum_hit_points);
        assert!(out.mentions("You see a Rat"));
    }

    #[test]
    fn killing_blow_pays_out_and_respawns() {
        let world = World::standard();
        // damage 5, loot rolls 90 and 80 (both miss), then nothing else is rolled
        let mut ctl = controller(&world, vec![5, 90, 80]);
        let mut player = player_at(LOCATION_ALCHEMISTS_GARDEN);
        player.current_hit_points = 2;
        let rat = world.spawn_monster(MONSTER_RAT).unwrap();
        let mut out = Narration::new();

        let phase = ctl
            .attack(&mut player, Phase::InCombat(rat), ITEM_RUSTY_SWORD, &mut out)
            .unwrap();

        assert_eq!(player.experience_points, 3);
        assert_eq!(player.gold, 30);
        assert_eq!(quantity_of(&player, ITEM_PIECE_OF_FUR), 1);
        assert_eq!(quantity_of(&player, ITEM_RAT_TAIL), 0);
        assert_eq!(player.current_hit_points, player.maximum_hit_points());
        let fresh = phase.monster().expect("a new rat waits");
        assert_eq!(fresh.current_hit_points, fresh.maximum_hit_points);
        assert!(out.mentions("You hit the Rat for 5 points."));
        assert!(out.mentions("You loot 1 Piece of fur"));
    }

    #[test]
    fn damage_stays_within_weapon_range() {
        let world = World::standard();
        let mut ctl = controller(&world, vec![99, 0]);
        let mut player = player_at(LOCATION_ALCHEMISTS_GARDEN);
        player.inventory.push(InventoryItem::new(ITEM_CLUB, 1));
        let mut spider = world.spawn_monster(MONSTER_GIANT_SPIDER).unwrap();
        spider.current_hit_points = 100;
        let mut out = Narration::new();

        let phase = ctl
            .attack(&mut player, Phase::InCombat(spider), ITEM_CLUB, &mut out)
            .unwrap();
        assert_eq!(phase.monster().unwrap().current_hit_points, 90);
        assert_eq!(player.current_weapon, Some(ITEM_CLUB));
        assert!(out.mentions("The Giant spider did 0 points of damage."));
    }

    #[test]
    fn death_sends_player_home() {
        let world = World::standard();
        let mut ctl = controller(&world, vec![0, 20]);
        let mut player = player_at(LOCATION_SPIDER_FIELD);
        let spider = world.spawn_monster(MONSTER_GIANT_SPIDER).unwrap();
        let mut out = Narration::new();

        let phase = ctl
            .attack(&mut player, Phase::InCombat(spider), ITEM_RUSTY_SWORD, &mut out)
            .unwrap();
        assert_eq!(phase, Phase::Exploring);
        assert_eq!(player.current_location, LOCATION_HOME);
        assert_eq!(player.current_hit_points, player.maximum_hit_points());
        assert!(out.mentions("The Giant spider killed you."));
    }

    #[test]
    fn drinking_heals_clamps_and_lets_monster_swing() {
        let world = World::standard();
        let mut ctl = controller(&world, vec![1]);
        let mut player = player_at(LOCATION_ALCHEMISTS_GARDEN);
        player.inventory.push(InventoryItem::new(ITEM_HEALING_POTION, 2));
        player.current_hit_points = 8;
        let rat = world.spawn_monster(MONSTER_RAT).unwrap();
        let mut out = Narration::new();

        let phase = ctl
            .drink(&mut player, Phase::InCombat(rat), ITEM_HEALING_POTION, &mut out)
            .unwrap();
        assert!(phase.in_combat());
        assert_eq!(player.current_hit_points, player.maximum_hit_points() - 1);
        assert_eq!(quantity_of(&player, ITEM_HEALING_POTION), 1);
        assert!(out.mentions("You drink a Healing potion"));
    }

    #[test]
    fn drinking_without_potion_is_a_no_op() {
        let world = World::standard();
        let mut ctl = controller(&world, vec![5]);
        let mut player = player_at(LOCATION_ALCHEMISTS_GARDEN);
        player.inventory.push(InventoryItem::new(ITEM_HEALING_POTION, 0));
        let before = player.clone();
        let rat = world.spawn_monster(MONSTER_RAT).unwrap();
        let mut out = Narration::new();

        let phase = ctl
            .drink(&mut player, Phase::InCombat(rat.clone()), ITEM_HEALING_POTION, &mut out)
            .unwrap();
        assert_eq!(phase, Phase::InCombat(rat));
        assert_eq!(player, before);
        assert_eq!(ctl.dice_mut().remaining(), 1, "monster did not get a turn");
    }

    #[test]
    fn combat_actions_while_exploring_are_refused() {
        let world = World::standard();
        let mut ctl = controller(&world, vec![]);
        let mut player = player_at(LOCATION_HOME);
        let mut out = Narration::new();
        let phase = ctl
            .attack(&mut player, Phase::Exploring, ITEM_RUSTY_SWORD, &mut out)
            .unwrap();
        assert_eq!(phase, Phase::Exploring);
        let phase = ctl
            .move_direction(&mut player, phase, Direction::South, &mut out)
            .unwrap();
        assert_eq!(phase, Phase::Exploring);
        assert_eq!(player.current_location, LOCATION_HOME);
        assert!(out.mentions("You cannot go south from here."));
    }

    #[test]
    fn equip_only_accepts_held_weapons() {
        let world = World::standard();
        let ctl = controller(&world, vec![]);
        let mut player = player_at(LOCATION_HOME);
        assert!(ctl.equip(&mut player, ITEM_RUSTY_SWORD));
        assert!(!ctl.equip(&mut player, ITEM_CLUB));
        assert!(!ctl.equip(&mut player, ITEM_RAT_TAIL));
        assert_eq!(player.current_weapon, Some(ITEM_RUSTY_SWORD));
    }

    #[test]
    fn rules_must_match_the_world() {
        let world = World::standard();
        assert!(Rules::default().validate(&world).is_ok());

        let bad_home = Rules {
            home_location: LocationId(99),
            ..Rules::default()
        };
        assert!(matches!(
            bad_home.validate(&world),
            Err(AdventureError::UnknownLocation(LocationId(99)))
        ));

        let bad_items = Rules {
            starting_items: vec![ITEM_RUSTY_SWORD, ItemId(99)],
            ..Rules::default()
        };
        assert!(matches!(
            bad_items.validate(&world),
            Err(AdventureError::UnknownItem(ItemId(99)))
        ));
    }
}
