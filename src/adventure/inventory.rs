/// Inventory helpers for the player's item rows.
///
/// Rows are never removed: a row whose quantity drops to zero stays in place
/// (and in the save file) and is only hidden from listings.
use crate::adventure::types::{InventoryItem, Item, ItemId, Player};
use crate::adventure::world::World;

/// Get the quantity of an item in inventory
pub fn quantity_of(player: &Player, item: ItemId) -> u32 {
    player
        .inventory
        .iter()
        .find(|row| row.item == item)
        .map(|row| row.quantity)
        .unwrap_or(0)
}

/// Check if the player holds at least one of an item
pub fn has_item(player: &Player, item: ItemId) -> bool {
    quantity_of(player, item) > 0
}

/// Add one of an item, stacking onto an existing row when there is one
pub fn add_item_to_inventory(player: &mut Player, item: ItemId) {
    if let Some(row) = player.inventory.iter_mut().find(|row| row.item == item) {
        row.quantity += 1;
    } else {
        player.inventory.push(InventoryItem::new(item, 1));
    }
}

/// Take `quantity` of an item away, stopping at zero. Returns how many were removed.
pub fn remove_item_from_inventory(player: &mut Player, item: ItemId, quantity: u32) -> u32 {
    match player.inventory.iter_mut().find(|row| row.item == item) {
        Some(row) => {
            let removed = quantity.min(row.quantity);
            row.quantity -= removed;
            removed
        }
        None => 0,
    }
}

/// Held items (quantity > 0) matching a capability, in inventory order
fn held_items<'w>(player: &Player, world: &'w World, keep: impl Fn(&Item) -> bool) -> Vec<&'w Item> {
    player
        .inventory
        .iter()
        .filter(|row| row.quantity > 0)
        .filter_map(|row| world.item(row.item).ok())
        .filter(|item| keep(*item))
        .collect()
}

pub fn held_weapons<'w>(player: &Player, world: &'w World) -> Vec<&'w Item> {
    held_items(player, world, Item::is_weapon)
}

pub fn held_potions<'w>(player: &Player, world: &'w World) -> Vec<&'w Item> {
    held_items(player, world, Item::is_healing_potion)
}

/// Inventory listing, one line per visible row
pub fn format_inventory(player: &Player, world: &World) -> Vec<String> {
    let lines: Vec<String> = player
        .inventory
        .iter()
        .filter(|row| row.quantity > 0)
        .map(|row| match world.item(row.item) {
            Ok(item) => format!("{} x{}", item.name_for(row.quantity), row.quantity),
            Err(_) => format!("item #{} x{}", row.item, row.quantity),
        })
        .collect();
    if lines.is_empty() {
        vec!["Your pack is empty.".to_string()]
    } else {
        lines
    }
}
