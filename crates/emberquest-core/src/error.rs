//! Error types for the simulation core.
//!
//! Nothing in here is fatal. Inside a tick every failure is recovered
//! locally; the variants exist so hosts and tests can see why an action
//! did nothing.

use crate::components::SpellKind;
use emberquest_logic::quest::QuestStatus;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("target no longer exists or is dead")]
    TargetInvalid,

    #[error("not enough mana: need {needed}, have {available}")]
    InsufficientResources { needed: f32, available: f32 },

    #[error("global cooldown active")]
    OnGlobalCooldown,

    #[error("{0:?} is on cooldown")]
    OnCooldown(SpellKind),

    #[error("caster is dead")]
    CasterDead,

    #[error("player is dead")]
    PlayerDead,

    #[error("out of range")]
    OutOfRange,

    #[error("nothing to loot")]
    NotLootable,

    #[error("item cannot be equipped")]
    NotEquippable,

    #[error("equipment slot already occupied")]
    SlotOccupied,

    #[error("unknown action bar slot {0}")]
    UnknownAction(u8),

    #[error(transparent)]
    Quest(#[from] QuestError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error("quest is {actual:?}, expected {expected:?}")]
    WrongStatus {
        expected: QuestStatus,
        actual: QuestStatus,
    },

    #[error("every quest in the chain is already complete")]
    ChainComplete,
}

/// Problems with level or content data.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("quest chain is empty")]
    EmptyQuestChain,

    #[error("level has no player start")]
    MissingPlayerStart,

    #[error("quest {quest_id} objective {index} requires nothing")]
    InvalidObjective { quest_id: u32, index: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}
