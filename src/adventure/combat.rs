//! Turn-based combat pieces: damage rolls, loot rolls and the monster's turn.
//!
//! The controller strings these together; nothing here moves the player.

use crate::adventure::dice::Dice;
use crate::adventure::inventory::add_item_to_inventory;
use crate::adventure::narration::Narration;
use crate::adventure::types::{ItemId, Monster, Player};
use crate::adventure::world::World;

/// Roll the loot a defeated monster drops.
///
/// Each entry drops when a 1-100 roll lands at or under its percentage. If
/// nothing drops, every entry flagged as default is handed out instead.
pub fn roll_loot<D: Dice>(dice: &mut D, monster: &Monster) -> Vec<ItemId> {
    let mut looted: Vec<ItemId> = monster
        .loot_table
        .iter()
        .filter(|loot| dice.between(1, 100) <= loot.drop_percentage.min(100) as i32)
        .map(|loot| loot.item)
        .collect();

    if looted.is_empty() {
        looted = monster
            .loot_table
            .iter()
            .filter(|loot| loot.is_default_item)
            .map(|loot| loot.item)
            .collect();
    }
    looted
}

/// Pay out experience, gold and loot for a kill.
pub fn claim_victory<D: Dice>(
    world: &World,
    dice: &mut D,
    player: &mut Player,
    monster: &Monster,
    out: &mut Narration,
) {
    out.blank();
    out.say(format!("You defeated the {}", monster.name));

    player.experience_points += monster.reward_experience_points;
    out.say(format!(
        "You receive {} experience points.",
        monster.reward_experience_points
    ));

    player.gold += monster.reward_gold;
    out.say(format!("You receive {} gold.", monster.reward_gold));

    for item in roll_loot(dice, monster) {
        add_item_to_inventory(player, item);
        match world.item(item) {
            Ok(details) => out.say(format!("You loot 1 {}", details.name_for(1))),
            Err(_) => log::warn!("Loot item {} missing from catalog", item),
        }
    }
    out.blank();
    log::debug!(
        "Defeated {} (+{} xp, +{} gold)",
        monster.name,
        monster.reward_experience_points,
        monster.reward_gold
    );
}

/// The monster's swing at the player. Returns true if the player dropped to zero.
pub fn monster_turn<D: Dice>(
    dice: &mut D,
    player: &mut Player,
    monster: &Monster,
    out: &mut Narration,
) -> bool {
    let damage = dice.between(0, monster.maximum_damage);
    out.say(format!(
        "The {} did {} points of damage.",
        monster.name, damage
    ));
    player.current_hit_points -= damage;
    if player.is_dead() {
        out.say(format!("The {} killed you.", monster.name));
        log::debug!("Player killed by {}", monster.name);
        return true;
    }
    false
}
