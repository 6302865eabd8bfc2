//! Unit classes and their starting stat blocks.

use crate::constants::{enemy_classes, npc_kinds};
use serde::{Deserialize, Serialize};

/// Cosmetic player class chosen at character creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerClass {
    #[default]
    Templar,
    Prophet,
    Descendant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyClass {
    Warrior,
    Mage,
    Goblin,
    Boss,
}

impl EnemyClass {
    /// Class for a level-file code. Unknown and reserved codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            enemy_classes::WARRIOR => Some(Self::Warrior),
            enemy_classes::MAGE => Some(Self::Mage),
            enemy_classes::GOBLIN => Some(Self::Goblin),
            enemy_classes::BOSS => Some(Self::Boss),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Warrior => enemy_classes::WARRIOR,
            Self::Mage => enemy_classes::MAGE,
            Self::Goblin => enemy_classes::GOBLIN,
            Self::Boss => enemy_classes::BOSS,
        }
    }

    /// Mage and boss carry mana and cast spells.
    pub fn is_caster(self) -> bool {
        matches!(self, Self::Mage | Self::Boss)
    }

    pub fn stats(self) -> EnemyStats {
        match self {
            Self::Warrior => EnemyStats {
                total_hp: 100.0,
                total_mana: 0.0,
                autohit_damage: 3,
                move_speed: 2.0,
                spell_power: 0.0,
                carries_head: false,
            },
            Self::Mage => EnemyStats {
                total_hp: 75.0,
                total_mana: 20.0,
                autohit_damage: 1,
                move_speed: 2.0,
                spell_power: 0.0,
                carries_head: false,
            },
            Self::Goblin => EnemyStats {
                total_hp: 85.0,
                total_mana: 0.0,
                autohit_damage: 2,
                move_speed: 3.0,
                spell_power: 0.0,
                carries_head: false,
            },
            Self::Boss => EnemyStats {
                total_hp: 125.0,
                total_mana: 50.0,
                autohit_damage: 5,
                move_speed: 2.0,
                spell_power: 5.0,
                carries_head: true,
            },
        }
    }
}

/// Starting stats for a freshly spawned enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub total_hp: f32,
    pub total_mana: f32,
    pub autohit_damage: i32,
    pub move_speed: f32,
    pub spell_power: f32,
    /// Whether the corpse drops an enemy-head quest item.
    pub carries_head: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcKind {
    OldMan,
    CityGuard,
    FemaleCitizen,
}

impl NpcKind {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            npc_kinds::OLD_MAN => Some(Self::OldMan),
            npc_kinds::CITY_GUARD => Some(Self::CityGuard),
            npc_kinds::FEMALE_CITIZEN => Some(Self::FemaleCitizen),
            _ => None,
        }
    }
}
