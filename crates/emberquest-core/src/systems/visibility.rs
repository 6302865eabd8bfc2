//! On-screen activation and NPC interaction eligibility.

use super::QuestTracker;
use crate::components::{Enemy, Npc, Unit};
use emberquest_logic::geometry::Rect;
use hecs::World;

/// Enemies are active and NPCs count for quests while they intersect the
/// viewport. Without a viewport everything counts as visible.
pub fn visibility_system(world: &mut World, viewport: Option<&Rect>) {
    let visible = |bounds: &Rect| viewport.map_or(true, |v| bounds.intersects(v));

    for (_entity, (unit, enemy)) in world.query_mut::<(&Unit, &mut Enemy)>() {
        enemy.is_active = visible(&unit.bounds);
    }
    for (_entity, (unit, _npc)) in world.query_mut::<(&mut Unit, &Npc)>() {
        unit.can_add_to_quest = visible(&unit.bounds);
    }
}

/// An NPC can be talked to when it has dialogue or speaks for the
/// current quest.
pub fn refresh_npc_interaction(world: &mut World, quests: &QuestTracker) {
    let active = quests.active_npc();
    for (_entity, (unit, npc)) in world.query_mut::<(&Unit, &mut Npc)>() {
        npc.can_interact = quests.dialogue(unit.unit_id).is_some() || active == Some(unit.unit_id);
    }
}
