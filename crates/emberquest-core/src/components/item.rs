//! Items and where they currently live.

use emberquest_logic::geometry::Rect;
use emberquest_logic::items::ItemKind;
use hecs::Entity;

/// The single authoritative place an item is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLocation {
    Ground,
    Backpack(Entity),
    Equipped(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub item_id: u32,
    pub kind: ItemKind,
    /// Footprint while on the ground.
    pub bounds: Rect,
    pub location: ItemLocation,
}

impl Item {
    pub fn new(item_id: u32, kind: ItemKind, bounds: Rect, location: ItemLocation) -> Self {
        Self {
            item_id,
            kind,
            bounds,
            location,
        }
    }
}
