//! Entity construction from a level description.

mod units;

pub use units::*;

use crate::components::ItemLocation;
use crate::level::{Level, LevelDesc};
use emberquest_logic::config::SimConfig;
use emberquest_logic::constants::sizes;
use emberquest_logic::geometry::Rect;
use emberquest_logic::units::{EnemyClass, NpcKind, PlayerClass};
use hecs::{Entity, World};
use tracing::{debug, warn};

/// Handles to everything a level spawned.
#[derive(Debug, Clone)]
pub struct Population {
    pub player: Entity,
    pub enemies: Vec<Entity>,
    pub npcs: Vec<Entity>,
    pub ground_items: Vec<Entity>,
}

/// Spawn the player, enemies, NPCs and ground items a level describes.
/// Enemies need an enemy zone under their spawn point; those without one
/// are skipped, as are unknown class codes.
pub fn populate(
    world: &mut World,
    desc: &LevelDesc,
    level: &Level,
    player_class: PlayerClass,
    cfg: &SimConfig,
) -> Option<Population> {
    let start = desc.player_start?;
    let player = spawn_player(world, player_class, start, cfg);

    let mut enemies = Vec::with_capacity(desc.enemies.len());
    let mut next_id = 1;
    for spawn in &desc.enemies {
        let unit_id = next_id;
        next_id += 1;

        let Some(class) = EnemyClass::from_code(spawn.class) else {
            warn!(code = spawn.class, unit_id, "skipping enemy with unknown class");
            continue;
        };
        let bounds = Rect::at(spawn.at, sizes::ENEMY, sizes::ENEMY);
        let Some(zone) = level.enemy_zone_for(&bounds) else {
            warn!(?class, unit_id, "skipping enemy outside every enemy zone");
            continue;
        };
        enemies.push(spawn_enemy(world, unit_id, class, bounds, zone, cfg));
    }

    let mut npcs = Vec::with_capacity(desc.npcs.len());
    for spawn in &desc.npcs {
        let Some(kind) = NpcKind::from_code(spawn.kind) else {
            warn!(code = spawn.kind, unit_id = spawn.unit_id, "skipping npc with unknown kind");
            continue;
        };
        npcs.push(spawn_npc(world, spawn.unit_id, kind, spawn.at));
    }

    let ground_items = desc
        .items
        .iter()
        .map(|spawn| {
            let bounds = Rect::at(spawn.at, sizes::ITEM, sizes::ITEM);
            spawn_item(world, spawn.item_id, spawn.kind, bounds, ItemLocation::Ground)
        })
        .collect::<Vec<_>>();

    debug!(
        enemies = enemies.len(),
        npcs = npcs.len(),
        items = ground_items.len(),
        "level populated"
    );

    Some(Population {
        player,
        enemies,
        npcs,
        ground_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Backpack, Unit};
    use crate::level::{EnemySpawn, NpcSpawn};
    use emberquest_logic::collision::MapObject;
    use emberquest_logic::geometry::Vec2;

    fn desc() -> LevelDesc {
        LevelDesc {
            enemy_zones: vec![MapObject::new("Camp", Rect::new(0.0, 0.0, 500.0, 500.0))],
            enemies: vec![
                EnemySpawn { class: 3, at: Vec2::new(100.0, 100.0) },
                EnemySpawn { class: 1, at: Vec2::new(120.0, 100.0) },
                EnemySpawn { class: 0, at: Vec2::new(900.0, 900.0) },
                EnemySpawn { class: 4, at: Vec2::new(200.0, 200.0) },
            ],
            npcs: vec![NpcSpawn { kind: 1, unit_id: 11, at: Vec2::new(0.0, 0.0) }],
            player_start: Some(Vec2::new(50.0, 50.0)),
            ..LevelDesc::default()
        }
    }

    #[test]
    fn test_populate_skips_bad_spawns() {
        let d = desc();
        let level = Level::new(&d);
        let mut world = World::new();
        let pop = populate(&mut world, &d, &level, PlayerClass::Templar, &SimConfig::default()).unwrap();
        assert_eq!(pop.enemies.len(), 2);
        assert_eq!(pop.npcs.len(), 1);

        let ids: Vec<u32> = pop
            .enemies
            .iter()
            .map(|&e| world.get::<&Unit>(e).unwrap().unit_id)
            .collect();
        // Ids count every spawn object, skipped or not.
        assert_eq!(ids, vec![1, 4]);

        let boss_pack = world.get::<&Backpack>(pop.enemies[1]).unwrap();
        assert_eq!(boss_pack.items.len(), 1);
    }

    #[test]
    fn test_populate_needs_player_start() {
        let d = LevelDesc::default();
        let level = Level::new(&d);
        let mut world = World::new();
        assert!(populate(&mut world, &d, &level, PlayerClass::Templar, &SimConfig::default()).is_none());
    }
}
