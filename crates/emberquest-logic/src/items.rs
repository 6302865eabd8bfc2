//! Item kinds: wearable armor and quest items.

use crate::constants::{armor_slots, quest_items};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorSlot {
    Head,
    Chest,
}

impl ArmorSlot {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            armor_slots::HEAD => Some(Self::Head),
            armor_slots::CHEST => Some(Self::Chest),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Head => armor_slots::HEAD,
            Self::Chest => armor_slots::CHEST,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestItemKind {
    EnemyHead,
}

impl QuestItemKind {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            quest_items::ENEMY_HEAD => Some(Self::EnemyHead),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::EnemyHead => quest_items::ENEMY_HEAD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Armor { slot: ArmorSlot, armor_value: f32 },
    Quest { item: QuestItemKind },
}

impl ItemKind {
    /// The sub-kind code quest objectives match against.
    pub fn type_code(&self) -> i32 {
        match self {
            ItemKind::Armor { slot, .. } => slot.code(),
            ItemKind::Quest { item } => item.code(),
        }
    }

    pub fn is_armor(&self) -> bool {
        matches!(self, ItemKind::Armor { .. })
    }
}
