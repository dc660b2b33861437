mod common;

use superadventure::adventure::world::{
    ITEM_HEALING_POTION, ITEM_PIECE_OF_FUR, ITEM_RAT_TAIL, ITEM_RUSTY_SWORD,
    LOCATION_ALCHEMIST_HUT, LOCATION_HOME, QUEST_CLEAR_ALCHEMIST_GARDEN,
    QUEST_CLEAR_FARMERS_FIELD,
};
use superadventure::adventure::{
    accept_quest, from_xml_str, load_or_default, load_player, load_world_from_json, save_player,
    to_xml_string, AdventureError, InventoryItem, Rules, World,
};

#[test]
fn legacy_save_loads() {
    let world = World::standard();
    let player = load_player(common::fixture_root().join("PlayerData.xml"), &world).unwrap();

    assert_eq!(player.current_hit_points, 7);
    assert_eq!(player.gold, 45);
    assert_eq!(player.experience_points, 26);
    assert_eq!(player.current_location, LOCATION_ALCHEMIST_HUT);
    assert_eq!(
        player.inventory,
        vec![
            InventoryItem::new(ITEM_RUSTY_SWORD, 1),
            InventoryItem::new(ITEM_RAT_TAIL, 2),
            InventoryItem::new(ITEM_PIECE_OF_FUR, 0),
            InventoryItem::new(ITEM_HEALING_POTION, 1),
        ]
    );
    assert_eq!(player.quests.len(), 1);
    assert!(!player.quests[0].is_completed);
}

#[test]
fn reserializing_a_loaded_save_is_stable() {
    let world = World::standard();
    let mut player = load_player(common::fixture_root().join("PlayerData.xml"), &world).unwrap();
    accept_quest(&mut player, QUEST_CLEAR_FARMERS_FIELD);

    let first = to_xml_string(&player).unwrap();
    let second = to_xml_string(&from_xml_str(&world, &first).unwrap()).unwrap();
    assert_eq!(first, second);
    assert!(first.contains(r#"IsCompleted="False""#), "{}", first);
}

#[test]
fn zero_quantity_rows_survive_a_save() {
    let world = World::standard();
    let (_tmp, path) = common::temp_save();
    let mut player = Rules::default().new_player();
    player.inventory.push(InventoryItem::new(ITEM_RAT_TAIL, 0));
    accept_quest(&mut player, QUEST_CLEAR_ALCHEMIST_GARDEN);
    player.quests[0].is_completed = true;

    save_player(&path, &player).unwrap();
    let loaded = load_player(&path, &world).unwrap();
    assert_eq!(loaded.inventory, player.inventory);
    assert_eq!(loaded.quests, player.quests);
    assert_eq!(loaded.current_hit_points, player.current_hit_points);
}

#[test]
fn truncated_save_is_reported() {
    let world = World::standard();
    let (_tmp, path) = common::temp_save();
    let full = std::fs::read_to_string(common::fixture_root().join("PlayerData.xml")).unwrap();
    std::fs::write(&path, &full[..full.len() / 2]).unwrap();

    let result = load_or_default(&path, &world, &Rules::default());
    assert!(matches!(result, Err(AdventureError::MalformedSave(_))));
}

#[test]
fn save_for_another_world_is_rejected() {
    let world = load_world_from_json(common::fixture_root().join("cellar_world.json")).unwrap();
    // Location 4 does not exist in the cellar world
    let result = load_player(common::fixture_root().join("PlayerData.xml"), &world);
    assert!(matches!(result, Err(AdventureError::MalformedSave(_))));
}

#[test]
fn fresh_player_matches_the_classic_start() {
    let (_tmp, path) = common::temp_save();
    let player = load_or_default(&path, &World::standard(), &Rules::default()).unwrap();
    assert_eq!(player.gold, 20);
    assert_eq!(player.experience_points, 0);
    assert_eq!(player.current_location, LOCATION_HOME);
    assert_eq!(player.current_hit_points, 10);
    assert_eq!(player.inventory, vec![InventoryItem::new(ITEM_RUSTY_SWORD, 1)]);
    assert!(!path.exists(), "loading alone never writes");
}
