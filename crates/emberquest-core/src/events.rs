//! State changes the simulation reports to its host.
//!
//! Systems push into an [`EventQueue`]; the host drains it after each
//! tick to drive presentation (animations, sounds, UI refresh).

use crate::components::SpellKind;
use crate::error::SimError;
use crate::input::PlayerCommand;
use emberquest_logic::geometry::Vec2;
use emberquest_logic::units::EnemyClass;
use hecs::Entity;

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    EnemyAggro { enemy: Entity, unit_id: u32 },
    EnemyKilled { enemy: Entity, unit_id: u32, class: EnemyClass },
    EnemyRespawned { enemy: Entity, unit_id: u32 },
    PlayerDied,
    PlayerRespawned { at: Vec2 },
    SpellCast { caster: Entity, kind: SpellKind },
    SpellResolved { caster: Entity, kind: SpellKind },
    ItemLooted { item: Entity },
    ItemEquipped { item: Entity },
    ItemUnequipped { item: Entity },
    QuestActivated { index: usize, quest_id: u32 },
    QuestCompleted { quest_id: u32 },
    AllQuestsCompleted,
    GateOpened { name: String },
    CommandRejected { command: PlayerCommand, reason: SimError },
}

#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
