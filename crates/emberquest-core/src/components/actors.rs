//! Family-specific components for the player, enemies and NPCs.

use emberquest_logic::collision::MovePermissions;
use emberquest_logic::geometry::{Rect, Vec2};
use emberquest_logic::units::{EnemyClass, NpcKind, PlayerClass};
use hecs::Entity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub class: PlayerClass,
    pub permissions: MovePermissions,
    /// Location resolved at the end of the previous tick.
    pub last_position: Vec2,
    /// Item being looted or picked up this tick.
    pub item_target: Option<Entity>,
    /// Backpack item to equip this tick.
    pub backpack_target: Option<Entity>,
    /// Equipped item to take off this tick.
    pub char_panel_target: Option<Entity>,
    /// Corpse whose loot window is open.
    pub loot_target: Option<Entity>,
    pub has_helm: bool,
    /// Seconds until a dead player respawns.
    pub respawn_timer: f32,
    /// Dead and already announced.
    pub awaiting_respawn: bool,
    pub is_within_melee_range: bool,
}

impl Player {
    pub fn new(class: PlayerClass, location: Vec2, respawn_timer: f32) -> Self {
        Self {
            class,
            permissions: MovePermissions::default(),
            last_position: location,
            item_target: None,
            backpack_target: None,
            char_panel_target: None,
            loot_target: None,
            has_helm: false,
            respawn_timer,
            awaiting_respawn: false,
            is_within_melee_range: false,
        }
    }
}

/// Equipped items, in the order they were put on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterPanel {
    pub equipped: Vec<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub class: EnemyClass,
    /// Where the enemy was placed; evade returns here and respawns reuse it.
    pub spawn_bounds: Rect,
    /// Leaving this rectangle forces an evade.
    pub zone: Rect,
    pub is_evading: bool,
    /// On screen this tick.
    pub is_active: bool,
    /// Ticks left before respawn while dead.
    pub spawn_timer: u32,
    /// Random offset added to the attack point.
    pub target_offset: Vec2,
}

impl Enemy {
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_bounds.center()
    }

    pub fn waiting_to_spawn(&self) -> bool {
        self.spawn_timer > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Npc {
    pub kind: NpcKind,
    pub can_interact: bool,
}
