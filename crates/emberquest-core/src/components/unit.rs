//! Shared unit shape: identity, placement, vitals and combat state.

use emberquest_logic::facing::Facing;
use emberquest_logic::geometry::{Rect, Vec2};
use emberquest_logic::regen::Vitals;
use emberquest_logic::units::{EnemyClass, NpcKind, PlayerClass};
use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Which family a unit belongs to, with its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    Player(PlayerClass),
    Enemy(EnemyClass),
    Npc(NpcKind),
}

/// Every player, enemy and NPC carries one of these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    /// Unique within its family.
    pub unit_id: u32,
    pub kind: UnitKind,
    pub bounds: Rect,
    /// Desired heading this tick.
    pub direction: Vec2,
    /// Click-to-move destination.
    pub move_to: Option<Vec2>,
    pub move_speed: f32,
    pub vitals: Vitals,
    pub facing: Facing,
    /// Enemies: not yet counted by a quest. NPCs: currently visible.
    pub can_add_to_quest: bool,
}

impl Unit {
    pub fn new(unit_id: u32, kind: UnitKind, bounds: Rect, vitals: Vitals, move_speed: f32) -> Self {
        Self {
            unit_id,
            kind,
            bounds,
            direction: Vec2::ZERO,
            move_to: None,
            move_speed,
            vitals,
            facing: Facing::default(),
            can_add_to_quest: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.vitals.is_alive()
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, UnitKind::Enemy(_))
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }
}

/// Offensive and casting state. Players and enemies have one; NPCs don't.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Combat {
    /// Non-owning; cleared once the referent dies or disappears.
    pub target: Option<Entity>,
    pub is_attacking: bool,
    pub in_combat: bool,
    pub autohit_damage: i32,
    /// Autohit without a crit bonus.
    pub base_autohit: i32,
    /// Ticks until the next melee swing.
    pub swing_timer: f32,
    pub global_cooldown: f32,
    pub armor: f32,
    pub spell_power: f32,
    pub is_casting_spell: bool,
}

impl Combat {
    pub fn new(autohit_damage: i32) -> Self {
        Self {
            autohit_damage,
            base_autohit: autohit_damage,
            ..Self::default()
        }
    }

    pub fn stop_attacking(&mut self) {
        self.target = None;
        self.is_attacking = false;
    }
}

/// Ordered item handles a unit carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Backpack {
    pub items: Vec<Entity>,
}

impl Backpack {
    pub fn contains(&self, item: Entity) -> bool {
        self.items.contains(&item)
    }

    /// Remove `item`, returning whether it was present.
    pub fn take(&mut self, item: Entity) -> bool {
        let before = self.items.len();
        self.items.retain(|&i| i != item);
        self.items.len() != before
    }
}
