//! Map and content codes, plus fixed unit dimensions.
//!
//! Level files and quest records refer to classes, kinds and item types
//! by these integer codes. The typed enums in [`crate::units`] and
//! [`crate::items`] convert from them.

pub mod enemy_classes {
    pub const WARRIOR: i32 = 0;
    /// Reserved in level files; no archer is ever spawned.
    pub const ARCHER: i32 = 1;
    pub const MAGE: i32 = 2;
    pub const GOBLIN: i32 = 3;
    pub const BOSS: i32 = 4;
}

pub mod npc_kinds {
    pub const OLD_MAN: i32 = 0;
    pub const CITY_GUARD: i32 = 1;
    pub const FEMALE_CITIZEN: i32 = 2;
}

pub mod armor_slots {
    pub const HEAD: i32 = 1;
    pub const CHEST: i32 = 2;
}

pub mod quest_items {
    pub const ENEMY_HEAD: i32 = 1;
}

pub mod sizes {
    pub const PLAYER: f32 = 48.0;
    pub const ENEMY: f32 = 64.0;
    pub const NPC: f32 = 64.0;
    pub const ITEM: f32 = 48.0;
    pub const FIREBALL: f32 = 32.0;
}

/// Collision object name that marks an unlocked passage.
pub const OPEN_TAG: &str = "Open";
