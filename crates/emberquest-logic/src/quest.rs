//! Quest and dialogue records as loaded from content files.
//!
//! The records are read-only except for each objective's `current`
//! counter and the quest `status`, which the tracker mutates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Offered but not yet accepted.
    #[default]
    Pre,
    /// Accepted; objectives are shown.
    Mid,
    /// Every objective met; waiting for turn-in.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Flagged enemies of class `target_type`.
    Enemy,
    /// A visible NPC whose unit id is `target_type`.
    Friend,
    /// Backpack armor in slot `target_type`.
    Armor,
    /// Backpack quest items of kind `target_type`.
    QuestItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub target_type: i32,
    pub required: u32,
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub name: String,
}

impl Objective {
    pub fn is_met(&self) -> bool {
        self.current >= self.required
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: u32,
    pub pickup_npc: u32,
    pub turn_in_npc: u32,
    #[serde(default)]
    pub status: QuestStatus,
    pub pre_message: String,
    pub mid_message: String,
    pub end_message: String,
    pub objectives: Vec<Objective>,
}

impl Quest {
    /// True when every objective is met. A quest with no objectives is
    /// complete as soon as it is checked.
    pub fn is_complete(&self) -> bool {
        self.objectives.iter().all(Objective::is_met)
    }

    pub fn reset_progress(&mut self) {
        self.status = QuestStatus::Pre;
        for obj in &mut self.objectives {
            obj.current = 0;
        }
    }

    /// Message for the current status.
    pub fn message(&self) -> &str {
        match self.status {
            QuestStatus::Pre => &self.pre_message,
            QuestStatus::Mid => &self.mid_message,
            QuestStatus::End => &self.end_message,
        }
    }

    /// NPC that speaks for the quest in its current status.
    pub fn active_npc(&self) -> u32 {
        match self.status {
            QuestStatus::Pre | QuestStatus::Mid => self.pickup_npc,
            QuestStatus::End => self.turn_in_npc,
        }
    }
}

/// Staged lines an NPC says outside of quests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    pub npc_id: u32,
    pub messages: Vec<String>,
}
