//! Systems - per-tick logic that reads and writes components.

mod collision;
mod enemy;
mod items;
mod movement;
mod player;
mod quest;
mod regen;
mod spells;
mod visibility;

pub use collision::*;
pub use enemy::*;
pub use items::*;
pub use movement::*;
pub use player::*;
pub use quest::*;
pub use regen::*;
pub use spells::*;
pub use visibility::*;

use hecs::{Component, Entity, World};

/// Copy a component out of the world. Systems work on copies and write
/// them back, so no borrow is held across lookups of other entities.
pub(crate) fn read<T: Component + Copy>(world: &World, entity: Entity) -> Option<T> {
    world.get::<&T>(entity).ok().map(|c| *c)
}

/// Write a component back. Missing entities are ignored.
pub(crate) fn put<T: Component>(world: &World, entity: Entity, value: T) {
    if let Ok(mut slot) = world.get::<&mut T>(entity) {
        *slot = value;
    }
}

/// Whether `entity` still exists and is a living unit.
pub fn is_alive(world: &World, entity: Entity) -> bool {
    world
        .get::<&crate::components::Unit>(entity)
        .map(|u| u.is_alive())
        .unwrap_or(false)
}
