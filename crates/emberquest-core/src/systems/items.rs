//! Looting, picking up and equipping items.
//!
//! An item lives in exactly one place: the ground list, one backpack, or
//! one character panel. Every move here takes it out of the old place
//! before it goes into the new one, and only while the player is alive.

use super::{is_alive, put, read};
use crate::components::{Backpack, CharacterPanel, Combat, Item, ItemLocation, Player, Unit};
use crate::error::SimError;
use crate::events::{EventQueue, SimEvent};
use crate::input::PlayerCommand;
use emberquest_logic::config::SimConfig;
use emberquest_logic::items::{ArmorSlot, ItemKind};
use hecs::{Entity, World};
use tracing::{debug, trace};

fn require_alive(world: &World, player: Entity) -> Result<(), SimError> {
    if is_alive(world, player) {
        Ok(())
    } else {
        Err(SimError::PlayerDead)
    }
}

fn backpack_items(world: &World, owner: Entity) -> Vec<Entity> {
    world
        .get::<&Backpack>(owner)
        .map(|b| b.items.clone())
        .unwrap_or_default()
}

fn holds_same_quest_item(world: &World, player: Entity, kind: ItemKind) -> bool {
    backpack_items(world, player)
        .into_iter()
        .filter_map(|i| read::<Item>(world, i))
        .any(|i| i.kind == kind)
}

fn into_backpack(world: &World, player: Entity, item: Entity, mut record: Item) {
    if let Ok(mut pack) = world.get::<&mut Backpack>(player) {
        pack.items.push(item);
    }
    record.location = ItemLocation::Backpack(player);
    put(world, item, record);
}

/// Open the loot window on a dead enemy touching the player.
pub fn open_loot(world: &World, player: Entity, corpse: Entity) -> Result<(), SimError> {
    require_alive(world, player)?;
    let me = read::<Unit>(world, player).ok_or(SimError::TargetInvalid)?;
    let body = read::<Unit>(world, corpse).ok_or(SimError::TargetInvalid)?;
    if !body.is_enemy() || body.is_alive() {
        return Err(SimError::NotLootable);
    }
    if !body.bounds.intersects(&me.bounds) {
        return Err(SimError::OutOfRange);
    }
    let mut state = read::<Player>(world, player).ok_or(SimError::TargetInvalid)?;
    state.loot_target = Some(corpse);
    put(world, player, state);
    Ok(())
}

pub fn close_loot(world: &World, player: Entity) {
    if let Some(mut state) = read::<Player>(world, player) {
        state.loot_target = None;
        put(world, player, state);
    }
}

/// Move `item` from the open corpse into the player's backpack. Only one
/// of each quest item may be carried.
pub fn loot_item(world: &World, player: Entity, item: Entity) -> Result<(), SimError> {
    require_alive(world, player)?;
    let corpse = read::<Player>(world, player)
        .and_then(|p| p.loot_target)
        .ok_or(SimError::NotLootable)?;
    let record = read::<Item>(world, item).ok_or(SimError::TargetInvalid)?;
    if record.location != ItemLocation::Backpack(corpse) {
        return Err(SimError::NotLootable);
    }
    if matches!(record.kind, ItemKind::Quest { .. }) && holds_same_quest_item(world, player, record.kind) {
        return Err(SimError::NotLootable);
    }

    if let Ok(mut pack) = world.get::<&mut Backpack>(corpse) {
        pack.take(item);
    }
    into_backpack(world, player, item, record);
    debug!(item = record.item_id, "item looted");
    Ok(())
}

/// Take a ground item within the player's interaction area.
pub fn pick_up(
    world: &World,
    player: Entity,
    ground: &mut Vec<Entity>,
    item: Entity,
    cfg: &SimConfig,
) -> Result<(), SimError> {
    require_alive(world, player)?;
    let me = read::<Unit>(world, player).ok_or(SimError::TargetInvalid)?;
    let record = read::<Item>(world, item).ok_or(SimError::TargetInvalid)?;
    if record.location != ItemLocation::Ground || !ground.contains(&item) {
        return Err(SimError::NotLootable);
    }
    let reach = me.bounds.inflate(cfg.interaction_margin, cfg.interaction_margin);
    if !record.bounds.intersects(&reach) {
        return Err(SimError::OutOfRange);
    }

    ground.retain(|&g| g != item);
    into_backpack(world, player, item, record);
    debug!(item = record.item_id, "item picked up");
    Ok(())
}

/// Wear a backpack armor piece. Each slot holds one piece.
pub fn equip(world: &World, player: Entity, item: Entity) -> Result<(), SimError> {
    require_alive(world, player)?;
    let mut record = read::<Item>(world, item).ok_or(SimError::TargetInvalid)?;
    let ItemKind::Armor { slot, armor_value } = record.kind else {
        return Err(SimError::NotEquippable);
    };
    if record.location != ItemLocation::Backpack(player) {
        return Err(SimError::NotEquippable);
    }
    let equipped = world
        .get::<&CharacterPanel>(player)
        .map(|p| p.equipped.clone())
        .unwrap_or_default();
    let occupied = equipped
        .iter()
        .filter_map(|&e| read::<Item>(world, e))
        .any(|e| matches!(e.kind, ItemKind::Armor { slot: s, .. } if s == slot));
    if occupied {
        return Err(SimError::SlotOccupied);
    }

    if let Ok(mut pack) = world.get::<&mut Backpack>(player) {
        pack.take(item);
    }
    if let Ok(mut panel) = world.get::<&mut CharacterPanel>(player) {
        panel.equipped.push(item);
    }
    record.location = ItemLocation::Equipped(player);
    put(world, item, record);
    adjust_armor(world, player, slot, armor_value);
    debug!(item = record.item_id, ?slot, "item equipped");
    Ok(())
}

/// Take an equipped piece off and put it back in the backpack.
pub fn unequip(world: &World, player: Entity, item: Entity) -> Result<(), SimError> {
    require_alive(world, player)?;
    let record = read::<Item>(world, item).ok_or(SimError::TargetInvalid)?;
    let ItemKind::Armor { slot, armor_value } = record.kind else {
        return Err(SimError::NotEquippable);
    };
    if record.location != ItemLocation::Equipped(player) {
        return Err(SimError::NotEquippable);
    }

    if let Ok(mut panel) = world.get::<&mut CharacterPanel>(player) {
        panel.equipped.retain(|&e| e != item);
    }
    into_backpack(world, player, item, record);
    adjust_armor(world, player, slot, -armor_value);
    debug!(item = record.item_id, ?slot, "item unequipped");
    Ok(())
}

fn adjust_armor(world: &World, player: Entity, slot: ArmorSlot, delta: f32) {
    if let Some(mut combat) = read::<Combat>(world, player) {
        combat.armor += delta;
        put(world, player, combat);
    }
    if slot == ArmorSlot::Head {
        if let Some(mut state) = read::<Player>(world, player) {
            state.has_helm = delta > 0.0;
            put(world, player, state);
        }
    }
}

/// Close the loot window once the corpse is gone, alive again, or out of
/// reach.
pub fn close_stale_loot(world: &World, player: Entity) {
    let (Some(state), Some(me)) = (read::<Player>(world, player), read::<Unit>(world, player)) else {
        return;
    };
    let Some(corpse) = state.loot_target else { return };
    let still_open = read::<Unit>(world, corpse)
        .map_or(false, |body| !body.is_alive() && body.bounds.intersects(&me.bounds));
    if !still_open {
        trace!(?corpse, "loot closed");
        close_loot(world, player);
    }
}

/// Carry out the item intents the player queued this tick.
pub fn item_system(
    world: &World,
    player: Entity,
    ground: &mut Vec<Entity>,
    cfg: &SimConfig,
    events: &mut EventQueue,
) {
    let Some(mut state) = read::<Player>(world, player) else {
        return;
    };
    let pending = (
        state.item_target.take(),
        state.backpack_target.take(),
        state.char_panel_target.take(),
    );
    put(world, player, state);

    if let Some(item) = pending.0 {
        let on_ground = read::<Item>(world, item).map_or(false, |i| i.location == ItemLocation::Ground);
        let (command, result) = if on_ground {
            (PlayerCommand::PickUp(item), pick_up(world, player, ground, item, cfg))
        } else {
            (PlayerCommand::LootItem(item), loot_item(world, player, item))
        };
        report(events, command, result, SimEvent::ItemLooted { item });
    }
    if let Some(item) = pending.1 {
        let result = equip(world, player, item);
        report(events, PlayerCommand::Equip(item), result, SimEvent::ItemEquipped { item });
    }
    if let Some(item) = pending.2 {
        let result = unequip(world, player, item);
        report(events, PlayerCommand::Unequip(item), result, SimEvent::ItemUnequipped { item });
    }
}

fn report(events: &mut EventQueue, command: PlayerCommand, result: Result<(), SimError>, done: SimEvent) {
    match result {
        Ok(()) => events.push(done),
        Err(reason) => events.push(SimEvent::CommandRejected { command, reason }),
    }
}
