//! Player intent for one tick, as read from the input provider.

use emberquest_logic::collision::Direction;
use emberquest_logic::geometry::Vec2;
use hecs::Entity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    /// Left click on a unit.
    SelectTarget(Entity),
    /// Right click on an enemy.
    Attack(Entity),
    ClearTarget,
    /// Action bar slot 1 is Smite, slot 2 is InstantHeal.
    ActionBar(u8),
    OpenLoot(Entity),
    CloseLoot,
    LootItem(Entity),
    PickUp(Entity),
    Equip(Entity),
    Unequip(Entity),
    AcceptQuest,
    TurnInQuest,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerInput {
    /// Click-to-move destination.
    pub move_to: Option<Vec2>,
    /// Direction keys held this tick.
    pub held: Vec<Direction>,
    pub commands: Vec<PlayerCommand>,
}

impl PlayerInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_command(command: PlayerCommand) -> Self {
        Self {
            commands: vec![command],
            ..Self::default()
        }
    }

    pub fn move_to(point: Vec2) -> Self {
        Self {
            move_to: Some(point),
            ..Self::default()
        }
    }
}
