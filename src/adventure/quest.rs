/// Quest log bookkeeping: accepting quests, checking hand-in items and
/// marking quests complete.
use serde::{Deserialize, Serialize};

use crate::adventure::inventory::{add_item_to_inventory, quantity_of, remove_item_from_inventory};
use crate::adventure::types::{Player, PlayerQuest, Quest, QuestId};
use crate::adventure::world::World;

/// How many of a completion item the player must carry to hand a quest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompletionRule {
    /// Held quantity must exceed the required quantity (legacy behaviour).
    #[default]
    StrictlyGreater,
    /// Held quantity must be at least the required quantity.
    AtLeast,
}

impl CompletionRule {
    pub fn satisfied(&self, held: u32, required: u32) -> bool {
        match self {
            CompletionRule::StrictlyGreater => held > required,
            CompletionRule::AtLeast => held >= required,
        }
    }
}

pub fn has_quest(player: &Player, quest: QuestId) -> bool {
    player.quests.iter().any(|pq| pq.quest == quest)
}

pub fn completed_quest(player: &Player, quest: QuestId) -> bool {
    player
        .quests
        .iter()
        .find(|pq| pq.quest == quest)
        .map(|pq| pq.is_completed)
        .unwrap_or(false)
}

/// Add a quest to the log. Returns false if it was already there.
pub fn accept_quest(player: &mut Player, quest: QuestId) -> bool {
    if has_quest(player, quest) {
        return false;
    }
    player.quests.push(PlayerQuest::new(quest));
    true
}

/// Check if player carries every completion item in sufficient quantity
pub fn has_all_quest_completion_items(player: &Player, quest: &Quest, rule: CompletionRule) -> bool {
    quest
        .completion_items
        .iter()
        .all(|qci| rule.satisfied(quantity_of(player, qci.item), qci.quantity))
}

pub fn remove_quest_completion_items(player: &mut Player, quest: &Quest) {
    for qci in &quest.completion_items {
        remove_item_from_inventory(player, qci.item, qci.quantity);
    }
}

pub fn mark_quest_completed(player: &mut Player, quest: QuestId) {
    if let Some(pq) = player.quests.iter_mut().find(|pq| pq.quest == quest) {
        pq.is_completed = true;
    }
}

/// Hand the quest in: take the items, pay out the rewards, flag it done.
/// Callers check ownership and completion items first.
pub fn complete_quest(player: &mut Player, quest: &Quest) {
    remove_quest_completion_items(player, quest);
    player.experience_points += quest.reward_experience_points;
    player.gold += quest.reward_gold;
    add_item_to_inventory(player, quest.reward_item);
    mark_quest_completed(player, quest.id);
}

/// Quest log for display, one line per accepted quest
pub fn format_quest_log(player: &Player, world: &World) -> Vec<String> {
    if player.quests.is_empty() {
        return vec!["No quests yet.".to_string()];
    }
    player
        .quests
        .iter()
        .map(|pq| {
            let name = world
                .quest(pq.quest)
                .map(|q| q.name.clone())
                .unwrap_or_else(|_| format!("quest #{}", pq.quest));
            let mark = if pq.is_completed { "x" } else { " " };
            format!("[{}] {}", mark, name)
        })
        .collect()
}
